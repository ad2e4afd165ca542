//! OpenRouter gateway using the OpenAI-compatible Chat Completions API.
//!
//! Works against any endpoint that speaks the same format.

use super::{classify_status, CompletionGateway};
use crate::config::ProviderConfig;
use crate::credentials::Credential;
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Gateway for OpenRouter (or any OpenAI-compatible chat endpoint).
pub struct OpenRouterGateway {
    client: reqwest::Client,
    endpoint: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
    referer: Option<String>,
    app_title: Option<String>,
}

impl OpenRouterGateway {
    pub fn new(config: &ProviderConfig) -> Self {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
            referer: non_empty(&config.referer),
            app_title: non_empty(&config.app_title),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn no_content() -> ProviderError {
    ProviderError::Transport("no content in response".to_string())
}

#[async_trait]
impl CompletionGateway for OpenRouterGateway {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn send(
        &self,
        prompt: &str,
        model: &str,
        credential: &Credential,
    ) -> Result<String, ProviderError> {
        let start = Instant::now();

        let body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential.expose())
            .json(&body)
            .timeout(self.timeout);
        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.app_title {
            request = request.header("X-Title", title);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("request to {model} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let err = classify_status(status.as_u16(), &text);
            tracing::debug!("{model} returned HTTP {status}: {err}");
            return Err(err);
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| {
            tracing::debug!("Unparseable response from {model}: {e}");
            no_content()
        })?;

        let text = chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(no_content)?;

        tracing::debug!(
            "{model} answered in {}ms ({} chars)",
            start.elapsed().as_millis(),
            text.len()
        );
        Ok(text)
    }
}

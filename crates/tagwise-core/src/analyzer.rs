//! Single-item orchestration: walk the model tiers until one model answers.
//!
//! Free models are tried first, in order. A rate-limited free model falls
//! through to the next one silently; once the last free model is rate
//! limited, the paid tier is tried. Credential and billing failures end the
//! attempt immediately. The first successful reply wins.

use crate::config::{Config, ModelTiers};
use crate::credentials::{Credential, CredentialStore};
use crate::decode::decode;
use crate::error::{AnalyzeError, ProviderError};
use crate::events::EventSender;
use crate::gateway::{CompletionGateway, OpenRouterGateway};
use crate::prompt::build_prompt;
use crate::types::{AnalysisRequest, AnalysisResult};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Free,
    Paid,
}

impl Tier {
    fn label(self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Paid => "paid",
        }
    }
}

/// Tags one post at a time using an ordered set of model tiers.
pub struct Analyzer {
    gateway: Arc<dyn CompletionGateway>,
    credentials: Arc<dyn CredentialStore>,
    tiers: ModelTiers,
    events: EventSender,
}

impl Analyzer {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        credentials: Arc<dyn CredentialStore>,
        tiers: ModelTiers,
    ) -> Self {
        Self {
            gateway,
            credentials,
            tiers,
            events: EventSender::disabled(),
        }
    }

    /// Build an analyzer that talks to the configured provider endpoint.
    pub fn from_config(config: &Config, credentials: Arc<dyn CredentialStore>) -> Self {
        let gateway = Arc::new(OpenRouterGateway::new(&config.provider));
        Self::new(gateway, credentials, config.models.clone())
    }

    /// Route status events (e.g. tier escalation) to the given sender.
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = events;
        self
    }

    pub fn events(&self) -> &EventSender {
        &self.events
    }

    pub fn credentials(&self) -> &dyn CredentialStore {
        self.credentials.as_ref()
    }

    pub fn tiers(&self) -> &ModelTiers {
        &self.tiers
    }

    /// Tag one post.
    ///
    /// Fails with `NoCredential` before any network call if no key is
    /// configured.
    pub async fn analyze_one(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalyzeError> {
        let credential = self.credentials.get().ok_or(AnalyzeError::NoCredential)?;
        self.analyze_with(request, &credential).await
    }

    async fn analyze_with(
        &self,
        request: &AnalysisRequest,
        credential: &Credential,
    ) -> Result<AnalysisResult, AnalyzeError> {
        let prompt = build_prompt(request);
        let provider = self.gateway.name();

        for (tier, models) in [(Tier::Free, &self.tiers.free), (Tier::Paid, &self.tiers.paid)] {
            for (idx, model) in models.iter().enumerate() {
                let is_last = idx + 1 == models.len();

                match self.gateway.send(&prompt, model, credential).await {
                    Ok(text) => {
                        let result = decode(&text);
                        if result.is_fallback() {
                            tracing::warn!(
                                "{provider}/{model} replied but the output could not be parsed for {}",
                                request.url
                            );
                        } else {
                            tracing::debug!("{} tagged by {provider}/{model}", request.url);
                        }
                        return Ok(result);
                    }
                    Err(ProviderError::RateLimited) if !is_last => {
                        tracing::debug!("{provider}/{model} rate limited, trying next {} model", tier.label());
                    }
                    Err(ProviderError::RateLimited) => {
                        tracing::debug!("{provider}/{model} rate limited, {} tier exhausted", tier.label());
                        if tier == Tier::Free && !self.tiers.paid.is_empty() {
                            self.events
                                .info("Free models are busy, trying premium models...");
                        }
                    }
                    Err(err) => {
                        tracing::debug!("{provider}/{model} failed: {err}");
                        return Err(terminal_error(err));
                    }
                }
            }
        }

        Err(AnalyzeError::AllModelsFailed)
    }
}

/// Map a non-rate-limit provider failure onto the analyzer's vocabulary.
fn terminal_error(err: ProviderError) -> AnalyzeError {
    match err {
        ProviderError::Unauthorized => AnalyzeError::InvalidCredential,
        ProviderError::PaymentRequired => AnalyzeError::NoCredits,
        other => AnalyzeError::Provider(other),
    }
}

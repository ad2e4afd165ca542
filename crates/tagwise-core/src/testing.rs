//! Test doubles shared by the orchestrator tests.

use crate::credentials::Credential;
use crate::error::ProviderError;
use crate::gateway::CompletionGateway;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

type ResponseFn = dyn Fn(&str, &str) -> Result<String, ProviderError> + Send + Sync;

/// A configurable gateway that records every call.
///
/// The response factory receives `(prompt, model)`, so tests can vary the
/// outcome per item (the prompt contains the post URL) or per model.
pub(crate) struct MockGateway {
    response_fn: Box<ResponseFn>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockGateway {
    pub(crate) fn new<F>(response_fn: F) -> Self
    where
        F: Fn(&str, &str) -> Result<String, ProviderError> + Send + Sync + 'static,
    {
        Self {
            response_fn: Box::new(response_fn),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call succeeds with a well-formed tagging reply.
    pub(crate) fn always_ok() -> Self {
        Self::new(|_, _| Ok(reply(&["recipe", "home-cooking", "italian", "dinner"])))
    }

    /// Every call fails with the given error.
    pub(crate) fn always_err(err: ProviderError) -> Self {
        Self::new(move |_, _| Err(err.clone()))
    }

    /// Shared handle to the list of models called, in order.
    pub(crate) fn calls_handle(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl CompletionGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(
        &self,
        prompt: &str,
        model: &str,
        _credential: &Credential,
    ) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(model.to_string());
        (self.response_fn)(prompt, model)
    }
}

/// A model reply carrying the given tags.
pub(crate) fn reply(tags: &[&str]) -> String {
    serde_json::json!({
        "tags": tags,
        "suggestedCollection": "Saved",
        "mood": "cheerful",
        "confidence": 0.9,
    })
    .to_string()
}

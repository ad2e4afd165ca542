//! Provider gateway: one request to one model, no retries.
//!
//! All retry and fallback policy lives in the orchestrators. The gateway's
//! only job besides transport is mapping failures onto [`ProviderError`].

mod openrouter;

pub use openrouter::OpenRouterGateway;

use crate::credentials::Credential;
use crate::error::ProviderError;
use async_trait::async_trait;

/// Longest error body kept in `ProviderError::Unknown` details.
const MAX_ERROR_DETAIL: usize = 300;

/// A remote chat-completion endpoint.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the orchestrators hold an `Arc<dyn CompletionGateway>`).
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Gateway name for logging (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Send `prompt` to `model` and return the raw completion text.
    async fn send(
        &self,
        prompt: &str,
        model: &str,
        credential: &Credential,
    ) -> Result<String, ProviderError>;
}

/// Map a non-success HTTP status and its body onto the error taxonomy.
pub fn classify_status(status: u16, body: &str) -> ProviderError {
    match status {
        429 => ProviderError::RateLimited,
        401 => ProviderError::Unauthorized,
        402 => ProviderError::PaymentRequired,
        other => ProviderError::Unknown {
            status: Some(other),
            detail: truncate(body.trim(), MAX_ERROR_DETAIL),
        },
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_statuses() {
        assert_eq!(classify_status(429, "slow down"), ProviderError::RateLimited);
        assert_eq!(classify_status(401, ""), ProviderError::Unauthorized);
        assert_eq!(classify_status(402, ""), ProviderError::PaymentRequired);
    }

    #[test]
    fn test_classify_other_status_keeps_code_and_body() {
        let err = classify_status(503, " upstream overloaded \n");
        assert_eq!(
            err,
            ProviderError::Unknown {
                status: Some(503),
                detail: "upstream overloaded".to_string(),
            }
        );
        assert_eq!(err.status_code(), Some(503));
    }

    #[test]
    fn test_classify_truncates_long_bodies() {
        let body = "x".repeat(1000);
        match classify_status(500, &body) {
            ProviderError::Unknown { detail, .. } => {
                assert_eq!(detail.len(), MAX_ERROR_DETAIL + 3);
                assert!(detail.ends_with("..."));
            }
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé...");
        assert_eq!(truncate("short", 10), "short");
    }
}

//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Chat-completions endpoint (OpenAI-compatible)
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Optional `HTTP-Referer` attribution header
    pub referer: String,

    /// Optional `X-Title` attribution header
    pub app_title: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            api_key: "${OPENROUTER_API_KEY}".to_string(),
            timeout_ms: 60_000,
            temperature: 0.3,
            max_tokens: 500,
            referer: String::new(),
            app_title: "Tagwise".to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Ordered model lists. Free models are tried first; paid models only once
/// every free model has been rate limited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelTiers {
    /// Free-tier model identifiers, in the order they are tried
    pub free: Vec<String>,

    /// Paid-tier model identifiers, in the order they are tried
    pub paid: Vec<String>,
}

impl Default for ModelTiers {
    fn default() -> Self {
        Self {
            free: vec![
                "meta-llama/llama-3.3-70b-instruct:free".to_string(),
                "google/gemini-2.0-flash-exp:free".to_string(),
                "mistralai/mistral-7b-instruct:free".to_string(),
            ],
            paid: vec![
                "openai/gpt-4o-mini".to_string(),
                "anthropic/claude-3-haiku".to_string(),
            ],
        }
    }
}

impl ModelTiers {
    pub fn new(free: Vec<String>, paid: Vec<String>) -> Self {
        Self { free, paid }
    }

    /// Total number of models across both tiers.
    pub fn len(&self) -> usize {
        self.free.len() + self.paid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty() && self.paid.is_empty()
    }
}

/// Pacing and retry schedule for batch runs.
///
/// Only the shape matters (escalating backoff, a cooldown after a streak of
/// failures, one bulk retry); the numbers are tunable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Pause after each successful item
    pub courtesy_delay_ms: u64,

    /// Base backoff after a failed item, multiplied by the failure streak
    pub failure_backoff_ms: u64,

    /// Consecutive failures that trigger the cooldown
    pub failure_threshold: u32,

    /// Cooldown length once the threshold is hit
    pub cooldown_ms: u64,

    /// Pause before the retry pass starts
    pub retry_settle_ms: u64,

    /// Pause between items in the retry pass
    pub retry_spacing_ms: u64,

    /// Emit a progress event every N successes
    pub progress_every: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            courtesy_delay_ms: 1000,
            failure_backoff_ms: 2000,
            failure_threshold: 5,
            cooldown_ms: 30_000,
            retry_settle_ms: 5000,
            retry_spacing_ms: 3000,
            progress_every: 5,
        }
    }
}

impl BatchConfig {
    /// A schedule with every delay set to zero. Used by tests and dry runs.
    pub fn immediate() -> Self {
        Self {
            courtesy_delay_ms: 0,
            failure_backoff_ms: 0,
            cooldown_ms: 0,
            retry_settle_ms: 0,
            retry_spacing_ms: 0,
            ..Self::default()
        }
    }

    pub fn courtesy_delay(&self) -> Duration {
        Duration::from_millis(self.courtesy_delay_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn retry_settle(&self) -> Duration {
        Duration::from_millis(self.retry_settle_ms)
    }

    pub fn retry_spacing(&self) -> Duration {
        Duration::from_millis(self.retry_spacing_ms)
    }

    /// Backoff after a failure, scaled linearly with the current streak.
    pub fn failure_backoff(&self, consecutive_failures: u32) -> Duration {
        Duration::from_millis(
            self.failure_backoff_ms
                .saturating_mul(u64::from(consecutive_failures)),
        )
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_backoff_scales_linearly() {
        let config = BatchConfig {
            failure_backoff_ms: 2000,
            ..BatchConfig::default()
        };
        assert_eq!(config.failure_backoff(1), Duration::from_millis(2000));
        assert_eq!(config.failure_backoff(3), Duration::from_millis(6000));
    }

    #[test]
    fn test_immediate_schedule_keeps_thresholds() {
        let config = BatchConfig::immediate();
        assert_eq!(config.cooldown_ms, 0);
        assert_eq!(config.failure_backoff(4), Duration::ZERO);
        assert_eq!(config.failure_threshold, 5);
        assert_eq!(config.progress_every, 5);
    }

    #[test]
    fn test_default_tiers_have_free_models_first() {
        let tiers = ModelTiers::default();
        assert!(tiers.free.iter().all(|m| m.ends_with(":free")));
        assert!(!tiers.paid.is_empty());
        assert_eq!(tiers.len(), 5);
    }
}

//! Error types for Tagwise.
//!
//! Errors are layered the same way the orchestration is: the provider gateway
//! speaks [`ProviderError`], the single-item orchestrator narrows that into the
//! small [`AnalyzeError`] vocabulary, and configuration has its own
//! [`ConfigError`]. None of them ever carry the API credential.

use thiserror::Error;

/// Top-level error type for Tagwise operations.
#[derive(Error, Debug)]
pub enum TagwiseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tagging a single item failed
    #[error("Analysis error: {0}")]
    Analyze(#[from] AnalyzeError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failure of a single call to a completion provider.
///
/// This is a closed set: the orchestrators match on the variant and never
/// inspect message text to decide what to do next.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// HTTP 429
    #[error("rate limited by provider")]
    RateLimited,

    /// HTTP 401
    #[error("provider rejected the API key")]
    Unauthorized,

    /// HTTP 402
    #[error("provider requires payment (no credits left)")]
    PaymentRequired,

    /// Network failure, timeout, or a 2xx response without usable content
    #[error("transport error: {0}")]
    Transport(String),

    /// Any other non-success response. `status` is the original HTTP status.
    #[error("provider error{}: {detail}", fmt_status(.status))]
    Unknown { status: Option<u16>, detail: String },
}

impl ProviderError {
    /// Original HTTP status code, if the failure came from an HTTP response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RateLimited => Some(429),
            Self::Unauthorized => Some(401),
            Self::PaymentRequired => Some(402),
            Self::Transport(_) => None,
            Self::Unknown { status, .. } => *status,
        }
    }
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Error vocabulary of the single-item orchestrator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    /// No API key is configured
    #[error("No API key configured. Add an OpenRouter API key to start tagging.")]
    NoCredential,

    /// The provider rejected the configured key
    #[error("Invalid API key. Check the key in your settings.")]
    InvalidCredential,

    /// The paid tier was reached but the account has no credits
    #[error("Out of credits for premium models. Add credits or wait for the free tier to reset.")]
    NoCredits,

    /// Every model in both tiers was rate limited or unavailable
    #[error("All models are busy right now. Try again later.")]
    AllModelsFailed,

    /// A provider failure the orchestrator does not reinterpret
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl AnalyzeError {
    /// Whether this error must stop a whole batch rather than just the current item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NoCredential | Self::InvalidCredential)
    }
}

/// Convenience type alias for Tagwise results.
pub type Result<T> = std::result::Result<T, TagwiseError>;

//! Tagwise Core - AI tagging for saved posts with tiered model fallback.
//!
//! Tagwise takes a post's URL and caption and asks a chat-completion model for
//! structured tags. It is built to keep going when providers misbehave:
//! free models are tried before paid ones, rate limits fall through to the
//! next model, unparseable replies degrade to a low-confidence fallback, and
//! batches pace themselves and retry failures once.
//!
//! # Architecture
//!
//! ```text
//! BatchRunner → Analyzer → CompletionGateway → provider
//!                  │
//!                  └─ build_prompt / decode
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tagwise_core::{AnalysisRequest, Analyzer, Config, ConfigCredentials};
//!
//! #[tokio::main]
//! async fn main() -> tagwise_core::Result<()> {
//!     let config = Config::load()?;
//!     let credentials = Arc::new(ConfigCredentials::new(&config.provider));
//!     let analyzer = Analyzer::from_config(&config, credentials);
//!
//!     let request = AnalysisRequest::new("https://instagram.com/p/abc", None);
//!     let result = analyzer.analyze_one(&request).await?;
//!     println!("Tags: {:?}", result.tags);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod analyzer;
pub mod batch;
pub mod config;
pub mod credentials;
pub mod decode;
pub mod error;
pub mod events;
pub mod gateway;
pub mod prompt;
pub mod types;

#[cfg(test)]
mod testing;

// Re-exports for convenient access
pub use analyzer::Analyzer;
pub use batch::{BatchOutcome, BatchPhase, BatchRunner, BatchStatus};
pub use config::Config;
pub use credentials::{ConfigCredentials, Credential, CredentialStore, StaticCredentials};
pub use decode::decode;
pub use error::{AnalyzeError, ConfigError, ProviderError, Result, TagwiseError};
pub use events::{event_channel, Event, EventKind, EventSender};
pub use gateway::{CompletionGateway, OpenRouterGateway};
pub use prompt::build_prompt;
pub use types::{AnalysisRequest, AnalysisResult, BatchItem};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_analyzer_from_default_config() {
        let config = Config::default();
        let analyzer = Analyzer::from_config(&config, std::sync::Arc::new(StaticCredentials::none()));
        assert_eq!(analyzer.tiers(), &config.models);
        assert!(!analyzer.credentials().has_credential());
    }
}

//! Subcommand implementations.

pub mod analyze;
pub mod batch;
pub mod config;

use std::sync::Arc;
use tagwise_core::{Config, ConfigCredentials, CredentialStore, StaticCredentials};

/// Pick the credential source: an explicit `--api-key` wins over config/env.
pub(crate) fn credential_store(config: &Config, api_key: Option<&str>) -> Arc<dyn CredentialStore> {
    match api_key {
        Some(key) => Arc::new(StaticCredentials::new(key)),
        None => Arc::new(ConfigCredentials::new(&config.provider)),
    }
}

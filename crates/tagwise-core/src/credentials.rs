//! API credential lookup.
//!
//! The orchestrators never read keys from the environment or config directly;
//! they are handed a [`CredentialStore`] at construction.

use crate::config::ProviderConfig;
use std::fmt;

/// An API key. `Debug` and `Display` never print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret, for building the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Source of the API credential.
pub trait CredentialStore: Send + Sync {
    /// Current credential, or `None` if none is configured.
    fn get(&self) -> Option<Credential>;

    /// Whether a credential is configured.
    fn has_credential(&self) -> bool {
        self.get().is_some()
    }
}

/// A fixed credential (or a fixed absence of one).
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Option<Credential>);

impl StaticCredentials {
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        if secret.trim().is_empty() {
            Self(None)
        } else {
            Self(Some(Credential::new(secret)))
        }
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl CredentialStore for StaticCredentials {
    fn get(&self) -> Option<Credential> {
        self.0.clone()
    }
}

/// Reads `provider.api_key` from config, resolving `${ENV_VAR}` references
/// on every lookup so a key exported after startup is picked up.
#[derive(Debug, Clone)]
pub struct ConfigCredentials {
    api_key: String,
}

impl ConfigCredentials {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
        }
    }
}

impl CredentialStore for ConfigCredentials {
    fn get(&self) -> Option<Credential> {
        resolve_env_var(&self.api_key)
            .filter(|key| !key.trim().is_empty())
            .map(Credential::new)
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok()
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

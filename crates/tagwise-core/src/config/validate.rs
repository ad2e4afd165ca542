//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.endpoint must not be empty".into(),
            ));
        }
        if self.provider.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "provider.timeout_ms must be > 0".into(),
            ));
        }
        if self.provider.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "provider.max_tokens must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ConfigError::ValidationError(
                "provider.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.models.is_empty() {
            return Err(ConfigError::ValidationError(
                "models must list at least one free or paid model".into(),
            ));
        }
        if self
            .models
            .free
            .iter()
            .chain(&self.models.paid)
            .any(|m| m.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(
                "models must not contain blank model ids".into(),
            ));
        }
        if self.batch.failure_threshold == 0 {
            return Err(ConfigError::ValidationError(
                "batch.failure_threshold must be > 0".into(),
            ));
        }
        if self.batch.progress_every == 0 {
            return Err(ConfigError::ValidationError(
                "batch.progress_every must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.provider.timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_temperature() {
        let mut config = Config::default();
        config.provider.temperature = 2.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));

        config.provider.temperature = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_validate_rejects_no_models() {
        let mut config = Config::default();
        config.models.free.clear();
        config.models.paid.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn test_validate_allows_empty_paid_tier() {
        let mut config = Config::default();
        config.models.paid.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_model_id() {
        let mut config = Config::default();
        config.models.paid.push("  ".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("blank"));
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let mut config = Config::default();
        config.batch.failure_threshold = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("failure_threshold"));
    }

    #[test]
    fn test_validate_rejects_zero_progress_interval() {
        let mut config = Config::default();
        config.batch.progress_every = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("progress_every"));
    }
}

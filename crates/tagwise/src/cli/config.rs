//! The `tagwise config` command for configuration management.

use clap::{Args, Subcommand};
use dialoguer::Password;
use std::path::Path;
use tagwise_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Store the provider API key in the config file
    SetKey {
        /// The key; prompted for (hidden) when omitted
        key: Option<String>,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let mut config = Config::load()?;
            if !config.provider.api_key.starts_with("${") && !config.provider.api_key.is_empty() {
                config.provider.api_key = "<redacted>".to_string();
            }
            let toml = config.to_toml()?;
            println!("{}", toml);
        }

        ConfigCommand::Path => {
            let path = Config::default_path();
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            // Write default config
            let config = Config::default();
            let toml = config.to_toml()?;
            std::fs::write(&path, toml)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }

        ConfigCommand::SetKey { key } => {
            let key = match key {
                Some(key) => key,
                None => Password::new()
                    .with_prompt("OpenRouter API key")
                    .interact()?,
            };
            if key.trim().is_empty() {
                anyhow::bail!("API key must not be empty");
            }

            let path = Config::default_path();
            save_key_to_config(&path, key.trim())?;
            println!("API key saved to {}", path.display());
        }
    }

    Ok(())
}

/// Write `provider.api_key` into the config file, preserving existing comments.
fn save_key_to_config(config_path: &Path, key: &str) -> anyhow::Result<()> {
    let content = if config_path.exists() {
        std::fs::read_to_string(config_path)?
    } else {
        String::new()
    };

    let mut doc: toml_edit::DocumentMut = content.parse()?;

    if !doc.contains_key("provider") {
        doc["provider"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["provider"]["api_key"] = toml_edit::value(key);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, doc.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_key_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        save_key_to_config(&path, "sk-or-new").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.provider.api_key, "sk-or-new");
    }

    #[test]
    fn test_save_key_preserves_comments_and_other_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "# my tagging setup\n[provider]\napi_key = \"old\"\ntimeout_ms = 1234\n\n[batch]\ncooldown_ms = 10\n",
        )
        .unwrap();

        save_key_to_config(&path, "sk-or-new").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# my tagging setup"));
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.provider.api_key, "sk-or-new");
        assert_eq!(config.provider.timeout_ms, 1234);
        assert_eq!(config.batch.cooldown_ms, 10);
    }

    #[test]
    fn test_save_key_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[provider\n").unwrap();

        assert!(save_key_to_config(&path, "sk").is_err());
        // The broken file is left untouched.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[provider\n");
    }
}

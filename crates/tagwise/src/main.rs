//! Tagwise CLI - Tag saved posts with AI models, falling back from free to paid tiers.
//!
//! Tagwise asks chat-completion models for structured tags (tags, a suggested
//! collection, mood, confidence) for each post's URL and caption. It keeps
//! going through rate limits and flaky models, and retries failed posts once.
//!
//! # Usage
//!
//! ```bash
//! # Tag a single post
//! tagwise analyze https://instagram.com/p/abc --caption "Sunday pasta night"
//!
//! # Tag a whole export (JSON array or JSONL of {id, url, caption})
//! tagwise batch posts.jsonl --output tags.jsonl
//!
//! # Store the API key in the config file
//! tagwise config set-key
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Tagwise - Tag saved posts with AI models, falling back from free to paid tiers.
#[derive(Parser, Debug)]
#[command(name = "tagwise")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Tag a single post
    Analyze(cli::analyze::AnalyzeArgs),

    /// Tag every post in a JSON or JSONL file
    Batch(cli::batch::BatchArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match tagwise_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `tagwise config path`."
            );
            tagwise_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Tagwise v{}", tagwise_core::VERSION);

    match cli.command {
        Commands::Analyze(args) => cli::analyze::execute(args, config).await,
        Commands::Batch(args) => cli::batch::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

//! The `tagwise analyze` command for tagging one post.

use clap::Args;
use tagwise_core::{AnalysisRequest, Analyzer, Config, EventKind};

use super::credential_store;

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// URL of the post
    pub url: String,

    /// Caption text of the post
    #[arg(short, long)]
    pub caption: Option<String>,

    /// API key (overrides config and OPENROUTER_API_KEY)
    #[arg(long, env = "TAGWISE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs, config: Config) -> anyhow::Result<()> {
    if args.url.trim().is_empty() {
        anyhow::bail!("URL must not be empty");
    }

    let (events, mut rx) = tagwise_core::event_channel();
    let analyzer = Analyzer::from_config(&config, credential_store(&config, args.api_key.as_deref()))
        .with_events(events);

    let request = AnalysisRequest::new(args.url, args.caption);
    let outcome = analyzer.analyze_one(&request).await;

    while let Ok(event) = rx.try_recv() {
        if event.kind == EventKind::Info {
            eprintln!("{}", event.message);
        }
    }

    let result = outcome?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        args: AnalyzeArgs,
    }

    #[test]
    fn test_args_parse() {
        let cli = TestCli::try_parse_from([
            "analyze",
            "https://instagram.com/p/abc",
            "--caption",
            "Sunday pasta night",
            "--pretty",
        ])
        .unwrap();
        assert_eq!(cli.args.url, "https://instagram.com/p/abc");
        assert_eq!(cli.args.caption.as_deref(), Some("Sunday pasta night"));
        assert!(cli.args.pretty);
    }
}

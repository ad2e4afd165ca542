//! The `tagwise batch` command: tag a file of posts with progress and streaming output.

mod input;
mod output;

use clap::Args;
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tagwise_core::{Analyzer, BatchOutcome, BatchRunner, BatchStatus, Config, Event, EventKind};
use tokio::sync::mpsc::UnboundedReceiver;

use super::credential_store;
use input::{load_items, without_done};
use output::{load_existing_ids, RecordWriter, TaggedRecord};

/// Arguments for the `batch` command.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// JSON array or JSONL file of {id, url, caption} posts
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output JSONL file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip posts whose id already appears in the output file
    #[arg(long, requires = "output")]
    pub skip_existing: bool,

    /// API key (overrides config and OPENROUTER_API_KEY)
    #[arg(long, env = "TAGWISE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

/// Execute the batch command.
pub async fn execute(args: BatchArgs, config: Config) -> anyhow::Result<()> {
    let input_path = expand_path(&args.input);
    let output_path = args.output.as_deref().map(expand_path);

    let mut items = load_items(&input_path)?;
    if args.skip_existing {
        if let Some(path) = &output_path {
            let done = load_existing_ids(path)?;
            let before = items.len();
            items = without_done(items, &done);
            if before > items.len() {
                tracing::info!("Skipping {} posts already tagged", before - items.len());
            }
        }
    }

    let (events, rx) = tagwise_core::event_channel();
    let analyzer = Analyzer::from_config(&config, credential_store(&config, args.api_key.as_deref()))
        .with_events(events);
    let runner = BatchRunner::new(analyzer, config.batch.clone());

    let writer: Box<dyn Write> = match &output_path {
        Some(path) => {
            let file = if args.skip_existing && path.exists() {
                std::fs::OpenOptions::new().append(true).open(path)?
            } else {
                File::create(path)?
            };
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout().lock()),
    };
    let mut records = RecordWriter::new(writer);
    let mut write_error: Option<anyhow::Error> = None;

    let progress = create_progress_bar(items.len() as u64);
    let relay = tokio::spawn(relay_events(rx, progress.clone()));
    let start_time = Instant::now();

    let outcome = runner
        .analyze_batch(&items, |item, result| {
            progress.inc(1);
            if write_error.is_none() {
                if let Err(e) = records.write(&TaggedRecord::new(item, result)) {
                    write_error = Some(e);
                }
            }
        })
        .await;

    // Dropping the runner closes the event channel so the relay task ends.
    drop(runner);
    relay.await?;
    progress.finish_and_clear();

    if let Some(e) = write_error {
        return Err(e.context("Failed to write tagged posts"));
    }

    print_summary(&outcome, start_time.elapsed());

    if let BatchStatus::Aborted(err) = &outcome.status {
        anyhow::bail!("Batch stopped: {err}");
    }
    Ok(())
}

/// Forward orchestrator events to the terminal without disturbing the bar.
async fn relay_events(mut rx: UnboundedReceiver<Event>, progress: ProgressBar) {
    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Progress => progress.set_message(event.message),
            EventKind::Error => progress.println(format!("  error: {}", event.message)),
            EventKind::Info | EventKind::Success => progress.println(format!("  {}", event.message)),
        }
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}

fn create_progress_bar(total: u64) -> ProgressBar {
    use indicatif::ProgressStyle;

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after the batch.
fn print_summary(outcome: &BatchOutcome, elapsed: std::time::Duration) {
    let status = match &outcome.status {
        BatchStatus::Empty => "nothing to do",
        BatchStatus::Completed => "completed",
        BatchStatus::PartialSuccess => "partial",
        BatchStatus::NothingProcessed => "nothing tagged",
        BatchStatus::Aborted(_) => "aborted",
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Status:       {:>8}", status);
    eprintln!("    Tagged:       {:>8}", outcome.processed);
    if !outcome.remaining.is_empty() {
        eprintln!("    Untagged:     {:>8}", outcome.remaining.len());
    }
    if outcome.retried {
        eprintln!("    Retry pass:   {:>8}", "yes");
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", outcome.total);
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("  ====================================");
}

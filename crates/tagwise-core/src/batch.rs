//! Batch orchestration: tag many posts one after another.
//!
//! A batch runs as a small state machine:
//!
//! ```text
//! NotStarted → Running ─┬─→ Finished
//!                       ├─→ Retrying ─┬─→ Finished
//!                       │             └─→ Aborted
//!                       └─→ Aborted
//! ```
//!
//! Items are processed strictly sequentially so rate limits aren't amplified
//! and the failure streak means what it says. Credential errors abort the
//! whole run. Every other failure is recorded, paced with an escalating
//! backoff, and retried exactly once after the main pass.

use crate::analyzer::Analyzer;
use crate::config::BatchConfig;
use crate::error::AnalyzeError;
use crate::events::EventSender;
use crate::types::{AnalysisResult, BatchItem};
use serde::Serialize;
use std::time::Duration;

/// Where a batch run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPhase {
    NotStarted,
    Running,
    Retrying,
    Aborted,
    Finished,
}

/// How a batch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    /// There was nothing to do
    Empty,
    /// Every item was tagged
    Completed,
    /// Some items were tagged, some are left over
    PartialSuccess,
    /// No item could be tagged, without any fatal error
    NothingProcessed,
    /// Stopped early by a fatal error
    Aborted(AnalyzeError),
}

/// Final report of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub status: BatchStatus,
    /// Number of items in the batch
    pub total: usize,
    /// Items tagged successfully (main pass plus retry pass)
    pub processed: usize,
    /// Ids of items left untagged, in input order
    pub remaining: Vec<String>,
    /// Whether the retry pass ran
    pub retried: bool,
    /// Terminal phase: `Finished` or `Aborted`
    pub phase: BatchPhase,
}

impl BatchOutcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self.status, BatchStatus::Aborted(_))
    }
}

/// Ephemeral state of one run. Owned by the running future, never shared.
#[derive(Debug)]
struct BatchRun {
    total: usize,
    processed: usize,
    consecutive_failures: u32,
    /// Indices of failed items, in the order they failed
    failed: Vec<usize>,
    /// Index of the first item not yet visited
    next: usize,
    phase: BatchPhase,
    retried: bool,
}

impl BatchRun {
    fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            consecutive_failures: 0,
            failed: Vec::new(),
            next: 0,
            phase: BatchPhase::NotStarted,
            retried: false,
        }
    }

    fn unvisited(&self) -> usize {
        self.total - self.next
    }

    /// Every item is either processed, failed, or not yet visited.
    fn check_invariant(&self) {
        debug_assert_eq!(
            self.processed + self.unvisited() + self.failed.len(),
            self.total,
            "batch accounting drifted: {self:?}"
        );
    }
}

/// Drives a list of posts through an [`Analyzer`].
pub struct BatchRunner {
    analyzer: Analyzer,
    config: BatchConfig,
}

impl BatchRunner {
    pub fn new(analyzer: Analyzer, config: BatchConfig) -> Self {
        Self { analyzer, config }
    }

    fn events(&self) -> &EventSender {
        self.analyzer.events()
    }

    /// Tag every item, calling `apply` for each successful result.
    ///
    /// Never fails: fatal conditions are reported through the returned
    /// outcome's status, everything else through its counts.
    pub async fn analyze_batch<F>(&self, items: &[BatchItem], mut apply: F) -> BatchOutcome
    where
        F: FnMut(&BatchItem, &AnalysisResult),
    {
        let mut run = BatchRun::new(items.len());

        if items.is_empty() {
            self.events().info("No posts to analyze.");
            return BatchOutcome {
                status: BatchStatus::Empty,
                total: 0,
                processed: 0,
                remaining: Vec::new(),
                retried: false,
                phase: BatchPhase::Finished,
            };
        }

        if !self.analyzer.credentials().has_credential() {
            let err = AnalyzeError::NoCredential;
            self.events().error(err.to_string());
            run.phase = BatchPhase::Aborted;
            return self.finish(run, items, Some(err));
        }

        run.phase = BatchPhase::Running;
        self.events()
            .info(format!("Analyzing {} posts...", run.total));

        // Main pass
        while run.next < run.total {
            let idx = run.next;
            let item = &items[idx];
            run.next += 1;

            match self.analyzer.analyze_one(&item.request).await {
                Ok(result) => {
                    self.record_success(&mut run, item, &result, &mut apply);
                    if run.next < run.total {
                        pause(self.config.courtesy_delay()).await;
                    }
                }
                Err(err) if err.is_fatal() => {
                    // The aborted item was never completed; count it as unvisited.
                    run.next = idx;
                    run.phase = BatchPhase::Aborted;
                    run.check_invariant();
                    self.events().error(err.to_string());
                    return self.finish(run, items, Some(err));
                }
                Err(err) => {
                    tracing::warn!("Could not tag {} ({}): {err}", item.id, item.request.url);
                    run.failed.push(idx);
                    run.consecutive_failures += 1;

                    if run.consecutive_failures >= self.config.failure_threshold {
                        self.events().info(format!(
                            "{} posts failed in a row, cooling down for {}s...",
                            run.consecutive_failures,
                            self.config.cooldown_ms / 1000
                        ));
                        pause(self.config.cooldown()).await;
                        run.consecutive_failures = 0;
                    } else {
                        pause(self.config.failure_backoff(run.consecutive_failures)).await;
                    }
                }
            }
            run.check_invariant();
        }

        // Retry pass, at most once
        if !run.failed.is_empty() {
            run.phase = BatchPhase::Retrying;
            run.retried = true;
            self.events().info(format!(
                "Retrying {} posts that couldn't be tagged...",
                run.failed.len()
            ));
            pause(self.config.retry_settle()).await;

            let pending = run.failed.clone();
            for (attempt, idx) in pending.into_iter().enumerate() {
                if attempt > 0 {
                    pause(self.config.retry_spacing()).await;
                }
                let item = &items[idx];

                match self.analyzer.analyze_one(&item.request).await {
                    Ok(result) => {
                        run.failed.retain(|&f| f != idx);
                        self.record_success(&mut run, item, &result, &mut apply);
                    }
                    Err(err) if err.is_fatal() => {
                        run.phase = BatchPhase::Aborted;
                        self.events().error(err.to_string());
                        return self.finish(run, items, Some(err));
                    }
                    Err(err) => {
                        tracing::warn!("Giving up on {} after retry: {err}", item.id);
                    }
                }
                run.check_invariant();
            }
        }

        run.phase = BatchPhase::Finished;
        self.finish(run, items, None)
    }

    fn record_success<F>(
        &self,
        run: &mut BatchRun,
        item: &BatchItem,
        result: &AnalysisResult,
        apply: &mut F,
    ) where
        F: FnMut(&BatchItem, &AnalysisResult),
    {
        run.processed += 1;
        run.consecutive_failures = 0;
        apply(item, result);

        // A zero interval disables progress events.
        let every = self.config.progress_every;
        if every > 0 && run.processed % every == 0 {
            self.events().progress(format!(
                "Analyzed {} of {} posts...",
                run.processed, run.total
            ));
        }
    }

    fn finish(
        &self,
        run: BatchRun,
        items: &[BatchItem],
        abort: Option<AnalyzeError>,
    ) -> BatchOutcome {
        let mut remaining_idx: Vec<usize> = run.failed.clone();
        remaining_idx.extend(run.next..run.total);
        remaining_idx.sort_unstable();
        let remaining: Vec<String> = remaining_idx
            .into_iter()
            .map(|idx| items[idx].id.clone())
            .collect();

        let status = match abort {
            Some(err) => {
                if run.processed > 0 {
                    self.events().info(format!(
                        "Stopped after analyzing {} of {} posts.",
                        run.processed, run.total
                    ));
                }
                BatchStatus::Aborted(err)
            }
            None if remaining.is_empty() => {
                self.events()
                    .success(format!("Analyzed all {} posts.", run.processed));
                BatchStatus::Completed
            }
            None if run.processed == 0 => {
                self.events().error(
                    "Couldn't analyze any posts. The AI models may be busy, try again later.",
                );
                BatchStatus::NothingProcessed
            }
            None => {
                self.events().success(format!(
                    "Analyzed {} of {} posts. {} couldn't be tagged, try again later.",
                    run.processed,
                    run.total,
                    remaining.len()
                ));
                BatchStatus::PartialSuccess
            }
        };

        tracing::debug!(
            "Batch ended in phase {:?}: {} processed, {} remaining",
            run.phase,
            run.processed,
            remaining.len()
        );

        BatchOutcome {
            status,
            total: run.total,
            processed: run.processed,
            remaining,
            retried: run.retried,
            phase: run.phase,
        }
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

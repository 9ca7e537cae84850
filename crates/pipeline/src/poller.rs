//! Status polling for the jobs of a submitted comic.
//!
//! [`PollingController`] runs synchronized rounds: every round queries each
//! still-pending job concurrently, applies results as they arrive, and then
//! waits `interval` before the next round. A job leaves the pending set once
//! it reaches a terminal status.
//!
//! Polling ends when
//! - every job is terminal ([`PollOutcome::Completed`]),
//! - any status query fails, which stops polling for *all* jobs
//!   ([`PollOutcome::Failed`]),
//! - the [`CancellationToken`] fires ([`PollOutcome::Cancelled`]), or
//! - the round or duration budget runs out ([`PollOutcome::TimedOut`]).
//!
//! Progress is broadcast as [`PollEvent`]s. Call
//! [`PollingController::subscribe`] before [`PollingController::run`] to
//! receive them.

use std::sync::Arc;
use std::time::Duration;

use comicgen_core::comic::{Comic, PanelViewState};
use comicgen_core::job::{Job, JobStatus};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::broadcast;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::sources::{JobStatusSource, SourceError};

/// Broadcast channel capacity for poll events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Message shown to users when a status query fails.
pub const STATUS_ERROR_MESSAGE: &str = "Error checking generation status";

/// Tunable parameters for a polling run.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between the end of one round and the start of the next.
    pub interval: Duration,
    /// Maximum number of rounds, if bounded.
    pub max_rounds: Option<u32>,
    /// Maximum wall-clock time, if bounded.
    pub max_duration: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_rounds: None,
            max_duration: Some(Duration::from_secs(600)),
        }
    }
}

/// How a polling run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Every job reached a terminal status.
    Completed,
    /// A status query failed; carries the underlying error text.
    Failed(String),
    /// The cancellation token fired.
    Cancelled,
    /// The round or duration budget was exhausted with jobs still pending.
    TimedOut,
}

impl PollOutcome {
    /// Flattened message for display, if the run did not complete.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Completed => None,
            Self::Failed(_) => Some(STATUS_ERROR_MESSAGE),
            Self::Cancelled => Some("Image generation was cancelled"),
            Self::TimedOut => Some("Image generation is taking too long"),
        }
    }
}

/// Progress notifications emitted while polling.
#[derive(Debug, Clone)]
pub enum PollEvent {
    /// A round is about to query `pending` jobs.
    RoundStarted { round: u32, pending: usize },
    /// A fresh status arrived for a panel's job.
    JobUpdated { panel_index: usize, status: JobStatus },
    /// A panel's image became available.
    PanelReady {
        panel_index: usize,
        image_url: String,
    },
    /// Polling stopped.
    Finished { outcome: PollOutcome, rounds: u32 },
}

/// Final state of a polling run.
#[derive(Debug, Clone)]
pub struct PollReport {
    pub outcome: PollOutcome,
    /// Number of rounds that were started.
    pub rounds: u32,
    /// View state per panel, in panel order.
    pub panels: Vec<PanelViewState>,
}

/// Drives the jobs of a comic to completion.
pub struct PollingController {
    source: Arc<dyn JobStatusSource>,
    config: PollConfig,
    event_tx: broadcast::Sender<PollEvent>,
}

/// Result of a single round.
enum RoundResult {
    Done,
    Failed { panel_index: usize, error: SourceError },
    Cancelled,
    DeadlinePassed,
}

impl PollingController {
    pub fn new(source: Arc<dyn JobStatusSource>, config: PollConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            source,
            config,
            event_tx,
        }
    }

    /// Subscribe to progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<PollEvent> {
        self.event_tx.subscribe()
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Poll until every job of `comic` is terminal or polling is stopped.
    pub async fn run(&self, comic: &Comic, cancel: CancellationToken) -> PollReport {
        let mut panels = comic.view_state();
        let started = Instant::now();
        let deadline = self.config.max_duration.map(|max| started + max);
        let mut rounds = 0u32;

        // Jobs can already be finished when handed over.
        for (panel_index, view) in panels.iter_mut().enumerate() {
            let job = view.job.clone();
            self.apply(panel_index, view, job);
        }

        let outcome = loop {
            if cancel.is_cancelled() {
                break PollOutcome::Cancelled;
            }

            let pending: Vec<usize> = panels
                .iter()
                .enumerate()
                .filter(|(_, view)| !view.job.is_terminal())
                .map(|(i, _)| i)
                .collect();

            if pending.is_empty() {
                break PollOutcome::Completed;
            }

            if self.budget_exhausted(rounds, started) {
                tracing::warn!(rounds, pending = pending.len(), "Polling budget exhausted");
                break PollOutcome::TimedOut;
            }

            if rounds > 0 {
                tokio::select! {
                    _ = cancel.cancelled() => break PollOutcome::Cancelled,
                    _ = sleep_until_deadline(deadline) => {
                        tracing::warn!(rounds, pending = pending.len(), "Polling deadline passed");
                        break PollOutcome::TimedOut;
                    }
                    _ = tokio::time::sleep(self.config.interval) => {}
                }
            }

            rounds += 1;
            let _ = self.event_tx.send(PollEvent::RoundStarted {
                round: rounds,
                pending: pending.len(),
            });
            tracing::debug!(round = rounds, pending = pending.len(), "Polling round started");

            match self.poll_round(&mut panels, &pending, &cancel, deadline).await {
                RoundResult::Done => {}
                RoundResult::Cancelled => break PollOutcome::Cancelled,
                RoundResult::DeadlinePassed => {
                    tracing::warn!(round = rounds, "Polling deadline passed with status queries in flight");
                    break PollOutcome::TimedOut;
                }
                RoundResult::Failed { panel_index, error } => {
                    tracing::error!(
                        round = rounds,
                        panel_index,
                        job_id = %panels[panel_index].job.id,
                        error = %error,
                        "Status query failed, stopping all polling",
                    );
                    break PollOutcome::Failed(error.to_string());
                }
            }
        };

        tracing::info!(?outcome, rounds, "Polling finished");
        let _ = self.event_tx.send(PollEvent::Finished {
            outcome: outcome.clone(),
            rounds,
        });

        PollReport {
            outcome,
            rounds,
            panels,
        }
    }

    // ---- private helpers ----

    fn budget_exhausted(&self, rounds: u32, started: Instant) -> bool {
        let rounds_spent = self.config.max_rounds.is_some_and(|max| rounds >= max);
        let time_spent = self
            .config
            .max_duration
            .is_some_and(|max| started.elapsed() >= max);
        rounds_spent || time_spent
    }

    /// Query every pending job concurrently, applying results in the order
    /// they resolve. The first error, cancellation or the deadline abandons
    /// the rest of the round.
    async fn poll_round(
        &self,
        panels: &mut [PanelViewState],
        pending: &[usize],
        cancel: &CancellationToken,
        deadline: Option<Instant>,
    ) -> RoundResult {
        let mut in_flight: FuturesUnordered<_> = pending
            .iter()
            .map(|&panel_index| {
                let source = Arc::clone(&self.source);
                let handle = panels[panel_index].job.id.clone();
                async move { (panel_index, source.job_status(&handle).await) }
            })
            .collect();

        let expired = sleep_until_deadline(deadline);
        tokio::pin!(expired);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return RoundResult::Cancelled,
                _ = &mut expired => return RoundResult::DeadlinePassed,
                next = in_flight.next() => match next {
                    None => return RoundResult::Done,
                    Some((panel_index, Ok(job))) => {
                        self.apply(panel_index, &mut panels[panel_index], job);
                    }
                    Some((panel_index, Err(error))) => {
                        return RoundResult::Failed { panel_index, error };
                    }
                },
            }
        }
    }

    /// Record a fresh snapshot and announce a newly available image.
    fn apply(&self, panel_index: usize, view: &mut PanelViewState, job: Job) {
        let status = job.status;
        let job_id = job.id.clone();

        if let Some(image_url) = view.apply(job) {
            tracing::info!(panel_index, job_id = %job_id, "Panel image ready");
            let _ = self.event_tx.send(PollEvent::PanelReady {
                panel_index,
                image_url: image_url.to_string(),
            });
        } else if status.is_terminal() && view.image_url.is_none() {
            tracing::info!(panel_index, job_id = %job_id, %status, "Panel job ended without an image");
        }

        let _ = self.event_tx.send(PollEvent::JobUpdated {
            panel_index,
            status,
        });
    }
}

/// Resolves at `deadline`, or never when there is none.
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

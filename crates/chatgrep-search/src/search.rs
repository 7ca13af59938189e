//! The per-channel paging loop.
//!
//! Each channel is searched newest page first, starting at the page holding
//! the window's last instant. Every page runs as two concurrent tasks joined
//! by bounded queues:
//!
//! ```text
//! PageStream::pump ──records──▶ run_filter_stage ──accepted──▶ LineSink
//! ```
//!
//! The loop waits for both tasks before looking at the page's outcome, so the
//! shared counters are complete whenever an event is reported.

use chatgrep_fetch::{ArchiveApi, ArchiveClient, FetchError, PageDescriptor, PageStream, UserRef};
use chatgrep_filter::{Classifier, PageOutcome, run_filter_stage};
use chatgrep_types::{
    ChatgrepError, MatchConfig, OutcomeCategory, ProgressSnapshot, ProgressState,
};
use chrono::TimeDelta;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{LineSink, Reporter, SearchEvent};

/// Tunables for the page pipeline.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Capacity of each handoff queue, in records.
    pub queue_capacity: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { queue_capacity: 64 }
    }
}

/// What to search: an instance, its channels, and the endpoint family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPlan {
    /// Instance base URL.
    pub base_url: String,
    /// Channels, searched in order.
    pub channels: Vec<String>,
    /// Page per-user logs of this user instead of whole-channel logs.
    pub user: Option<UserRef>,
}

impl SearchPlan {
    /// Builds the paging API for one channel of the plan.
    #[must_use]
    pub fn api_for(&self, channel: &str) -> ArchiveApi {
        match &self.user {
            Some(user) => ArchiveApi::user(&self.base_url, channel, user.clone()),
            None => ArchiveApi::channel(&self.base_url, channel),
        }
    }
}

/// Why a channel's search stopped.
#[derive(Debug)]
pub enum ChannelOutcome {
    /// The channel's history was consumed back past the window start.
    StoppedAtWindowStart,
    /// The result cutoff was met.
    StoppedAtCutoff,
    /// A page fetch failed; the channel was abandoned.
    StoppedOnError(FetchError),
    /// The run was cancelled from outside.
    Interrupted,
}

impl ChannelOutcome {
    /// Returns true if the channel stopped on a fetch failure.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::StoppedOnError(_))
    }
}

/// Outcome of a whole run.
#[derive(Debug)]
pub struct RunSummary {
    /// Channels that were searched, with how each one stopped.
    pub channels: Vec<(String, ChannelOutcome)>,
    /// Final counters.
    pub progress: ProgressSnapshot,
}

impl RunSummary {
    /// Number of channels abandoned on a fetch failure.
    #[must_use]
    pub fn failed_channels(&self) -> usize {
        self.channels.iter().filter(|(_, o)| o.is_error()).count()
    }
}

/// How one page ended, seen from the paging loop.
#[derive(Debug)]
enum PageResult {
    Done(PageOutcome),
    Failed(FetchError),
}

/// Runs searches against one archive client.
#[derive(Debug)]
pub struct Searcher {
    client: ArchiveClient,
    config: Arc<MatchConfig>,
    options: SearchOptions,
    progress: Arc<ProgressState>,
    shutdown: CancellationToken,
}

impl Searcher {
    /// Creates a searcher. Progress counters start now.
    #[must_use]
    pub fn new(client: ArchiveClient, config: MatchConfig, options: SearchOptions) -> Self {
        Self {
            client,
            config: Arc::new(config),
            options,
            progress: Arc::new(ProgressState::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that interrupts the run when cancelled. Each page's own token is
    /// a child of it.
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// The run's counters.
    #[must_use]
    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    /// The run's match configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Searches every channel of `plan` in order and reports the summary.
    ///
    /// Channels never run concurrently. A fetch failure only ends its own
    /// channel. Once the cutoff is met, the remaining channels are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails or a pipeline task dies; lines
    /// already written stay written.
    pub async fn run<R, S>(
        &self,
        plan: &SearchPlan,
        reporter: &mut R,
        sink: &mut S,
    ) -> Result<RunSummary, ChatgrepError>
    where
        R: Reporter + ?Sized,
        S: LineSink + ?Sized,
    {
        let mut channels = Vec::with_capacity(plan.channels.len());

        for (index, channel) in plan.channels.iter().enumerate() {
            if self.config.cutoff_reached(self.progress.accepted()) {
                tracing::info!(
                    skipped = plan.channels.len() - index,
                    "result cutoff met, skipping remaining channels"
                );
                break;
            }
            if self.shutdown.is_cancelled() {
                break;
            }

            let snapshot = self.progress.snapshot();
            reporter.report(&SearchEvent::NextChannel {
                found: snapshot.found(),
                channel: channel.clone(),
                current_channel_num: index,
                count_channels: plan.channels.len(),
                progress: snapshot,
            });

            let api = plan.api_for(channel);
            let outcome = self.search_channel(&api, reporter, sink).await?;
            tracing::info!(%channel, ?outcome, "channel finished");
            channels.push((channel.clone(), outcome));
        }

        let progress = self.progress.snapshot();
        reporter.report(&SearchEvent::SummaryFinished {
            results: progress.total_results,
            progress,
        });
        Ok(RunSummary { channels, progress })
    }

    /// Pages backward through one channel until a stop condition.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails or a pipeline task dies.
    pub async fn search_channel<R, S>(
        &self,
        api: &ArchiveApi,
        reporter: &mut R,
        sink: &mut S,
    ) -> Result<ChannelOutcome, ChatgrepError>
    where
        R: Reporter + ?Sized,
        S: LineSink + ?Sized,
    {
        let window = self.config.window;
        let step = api.approximate_step();
        let total_steps = estimate_steps(window.duration(), step);
        let channel = api.channel_name().to_string();
        let mut date = window.last_instant();

        loop {
            if self.shutdown.is_cancelled() {
                return Ok(ChannelOutcome::Interrupted);
            }
            if api.page_precedes(date, window.start) {
                tracing::debug!(%channel, %date, "paged past window start");
                return Ok(ChannelOutcome::StoppedAtWindowStart);
            }

            let snapshot = self.progress.snapshot();
            reporter.report(&SearchEvent::NextStep {
                found: snapshot.found(),
                channel: channel.clone(),
                next_date: date.to_rfc3339(),
                total_steps,
                left_steps: estimate_steps(date - window.start, step),
                progress: snapshot,
            });

            let page = api.describe(date);
            match self.process_page(&page, sink).await? {
                PageResult::Failed(error) => {
                    tracing::warn!(%channel, url = %page.url, %error, "page fetch failed");
                    reporter.report(&SearchEvent::FetchError {
                        channel,
                        error: error.to_string(),
                        progress: self.progress.snapshot(),
                    });
                    return Ok(ChannelOutcome::StoppedOnError(error));
                }
                PageResult::Done(PageOutcome::Terminal(OutcomeCategory::MaxCountReached)) => {
                    return Ok(ChannelOutcome::StoppedAtCutoff);
                }
                PageResult::Done(PageOutcome::Terminal(_)) => {
                    return Ok(ChannelOutcome::StoppedAtWindowStart);
                }
                PageResult::Done(PageOutcome::Abandoned) => {
                    return Ok(ChannelOutcome::Interrupted);
                }
                PageResult::Done(PageOutcome::Exhausted) => date = page.next_date,
            }
        }
    }

    /// Runs fetch and filter for one page, draining accepted lines into `sink`.
    async fn process_page<S>(
        &self,
        page: &PageDescriptor,
        sink: &mut S,
    ) -> Result<PageResult, ChatgrepError>
    where
        S: LineSink + ?Sized,
    {
        let stream = match PageStream::open(&self.client, &page.url).await {
            Ok(stream) => stream,
            Err(error) => return Ok(PageResult::Failed(error)),
        };

        let cancel = self.shutdown.child_token();
        let capacity = self.options.queue_capacity.max(1);
        let (raw_tx, raw_rx) = mpsc::channel(capacity);
        let (accepted_tx, mut accepted_rx) = mpsc::channel(capacity);

        let fetch = tokio::spawn(stream.pump(
            raw_tx,
            cancel.clone(),
            Arc::clone(&self.progress),
        ));
        let classifier = Classifier::new(Arc::clone(&self.config), self.progress.accepted());
        let filter = tokio::spawn(run_filter_stage(
            classifier,
            raw_rx,
            accepted_tx,
            cancel.clone(),
            Arc::clone(&self.progress),
        ));

        let mut written = Ok(());
        while let Some(record) = accepted_rx.recv().await {
            if let Err(e) = sink.write_line(&record.raw) {
                written = Err(e);
                cancel.cancel();
                break;
            }
        }
        drop(accepted_rx);

        let report = filter
            .await
            .map_err(|e| ChatgrepError::Task(e.to_string()))?;
        let fetched = fetch
            .await
            .map_err(|e| ChatgrepError::Task(e.to_string()))?;
        written?;
        sink.flush()?;

        tracing::debug!(
            url = %page.url,
            per_user = page.per_user,
            outcome = ?report.outcome,
            examined = report.tally.total(),
            accepted = report.tally.get(OutcomeCategory::Accepted),
            "page finished"
        );

        // A terminal decision wins over a body error it caused or raced with.
        match (report.outcome, fetched) {
            (outcome @ PageOutcome::Terminal(_), _) | (outcome, Ok(_)) => {
                Ok(PageResult::Done(outcome))
            }
            (_, Err(error)) => Ok(PageResult::Failed(error)),
        }
    }
}

/// Pages of length `step` needed to cover `span`, never negative.
fn estimate_steps(span: TimeDelta, step: TimeDelta) -> f64 {
    let step = step.num_milliseconds().max(1);
    let span = span.num_milliseconds().max(0);
    ((span + step - 1) / step) as f64
}

//! The concurrent filter stage.

use chatgrep_types::{OutcomeCategory, OutcomeCounts, ProgressState, Record};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::Classifier;

/// How a page's filter stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The fetcher closed its queue; paging may continue.
    Exhausted,
    /// A terminal category was resolved; the channel must stop.
    Terminal(OutcomeCategory),
    /// The sink stopped accepting records.
    Abandoned,
}

impl PageOutcome {
    /// Returns true if paging must stop after this page.
    #[must_use]
    pub const fn stops_channel(&self) -> bool {
        !matches!(self, Self::Exhausted)
    }
}

/// Result of one page's filter stage.
#[derive(Debug, Clone, Copy)]
pub struct StageReport {
    /// How the stage ended.
    pub outcome: PageOutcome,
    /// Outcomes of the records examined on this page.
    pub tally: OutcomeCounts,
    /// Acceptances in the run after this page.
    pub accepted: u64,
}

/// Classifies records from `input` until the queue closes or a terminal
/// category is resolved.
///
/// Every examined record is counted in `progress`. Accepted records are
/// forwarded to `output` in input order. On a terminal category `cancel` is
/// set and `input` is closed, so the fetcher stops at its next line boundary.
/// If the page ends right after the cutoff was met, the outcome is still
/// [`OutcomeCategory::MaxCountReached`].
pub async fn run_filter_stage(
    mut classifier: Classifier,
    mut input: mpsc::Receiver<Record>,
    output: mpsc::Sender<Record>,
    cancel: CancellationToken,
    progress: Arc<ProgressState>,
) -> StageReport {
    let mut outcome = PageOutcome::Exhausted;

    while let Some(record) = input.recv().await {
        let category = classifier.evaluate(&record);
        progress.record_outcome(category);

        if category.is_terminal() {
            tracing::debug!(%category, "terminal record");
            outcome = PageOutcome::Terminal(category);
            break;
        }
        if category == OutcomeCategory::Accepted && output.send(record).await.is_err() {
            outcome = PageOutcome::Abandoned;
            break;
        }
    }

    if outcome == PageOutcome::Exhausted && classifier.cutoff_reached() {
        outcome = PageOutcome::Terminal(OutcomeCategory::MaxCountReached);
    }
    if outcome.stops_channel() {
        cancel.cancel();
        input.close();
    }

    StageReport {
        outcome,
        tally: *classifier.tally(),
        accepted: classifier.accepted(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatgrep_types::{MatchConfig, TimeWindow};
    use chrono::{TimeZone, Utc};

    fn config(pattern: &str, max: u64) -> Arc<MatchConfig> {
        let window = TimeWindow::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
        )
        .unwrap();
        Arc::new(MatchConfig::new(window, pattern).unwrap().with_max_results(max))
    }

    fn record(day: u32, text: &str) -> Record {
        let ts = Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap();
        Record::parse(format!(
            "@tmi-sent-ts={} :a!a@a PRIVMSG #c :{text}",
            ts.timestamp_millis()
        ))
    }

    async fn run(
        config: Arc<MatchConfig>,
        records: Vec<Record>,
    ) -> (StageReport, Vec<String>, CancellationToken, Arc<ProgressState>) {
        let (in_tx, in_rx) = mpsc::channel(4);
        let (out_tx, mut out_rx) = mpsc::channel(4);
        let cancel = CancellationToken::new();
        let progress = Arc::new(ProgressState::new());

        let feeder = tokio::spawn(async move {
            for r in records {
                if in_tx.send(r).await.is_err() {
                    break;
                }
            }
        });
        let stage = tokio::spawn(run_filter_stage(
            Classifier::new(config, 0),
            in_rx,
            out_tx,
            cancel.clone(),
            Arc::clone(&progress),
        ));

        let mut accepted = Vec::new();
        while let Some(r) = out_rx.recv().await {
            accepted.push(String::from_utf8(r.raw).unwrap());
        }
        let report = stage.await.unwrap();
        feeder.await.unwrap();
        (report, accepted, cancel, progress)
    }

    #[tokio::test]
    async fn test_exhausted_page_forwards_matches_in_order() {
        let records = vec![record(2, "one"), record(2, "skip"), record(1, "two")];
        let (report, accepted, cancel, progress) = run(config("^t|^o", 0), records).await;

        assert_eq!(report.outcome, PageOutcome::Exhausted);
        assert_eq!(accepted.len(), 2);
        assert!(accepted[0].ends_with(":one"));
        assert!(accepted[1].ends_with(":two"));
        assert!(!cancel.is_cancelled());
        assert_eq!(progress.snapshot().total_results.total(), 3);
        assert_eq!(report.tally.total(), 3);
    }

    #[tokio::test]
    async fn test_date_before_start_cancels() {
        let mut records = vec![record(2, "a"), record(1, "b")];
        let old = Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap();
        records.push(Record::parse(format!(
            "@tmi-sent-ts={} :a!a@a PRIVMSG #c :old",
            old.timestamp_millis()
        )));
        records.extend((0..50).map(|_| record(1, "never examined")));

        let (report, accepted, cancel, progress) = run(config("", 0), records).await;

        assert_eq!(
            report.outcome,
            PageOutcome::Terminal(OutcomeCategory::DateBeforeStart)
        );
        assert_eq!(accepted.len(), 2);
        assert!(cancel.is_cancelled());
        assert_eq!(progress.count(OutcomeCategory::DateBeforeStart), 1);
        assert_eq!(progress.snapshot().total_results.total(), 3);
    }

    #[tokio::test]
    async fn test_cutoff_stops_after_five() {
        let records: Vec<_> = (0..10).map(|_| record(2, "match")).collect();
        let (report, accepted, cancel, progress) = run(config("", 5), records).await;

        assert_eq!(accepted.len(), 5);
        assert_eq!(
            report.outcome,
            PageOutcome::Terminal(OutcomeCategory::MaxCountReached)
        );
        assert_eq!(progress.count(OutcomeCategory::MaxCountReached), 1);
        assert_eq!(progress.accepted(), 5);
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_cutoff_met_on_last_record() {
        let records: Vec<_> = (0..3).map(|_| record(2, "match")).collect();
        let (report, accepted, _cancel, progress) = run(config("", 3), records).await;

        assert_eq!(accepted.len(), 3);
        assert_eq!(
            report.outcome,
            PageOutcome::Terminal(OutcomeCategory::MaxCountReached)
        );
        assert_eq!(progress.count(OutcomeCategory::MaxCountReached), 0);
        assert_eq!(report.accepted, 3);
    }

    #[tokio::test]
    async fn test_sink_gone_abandons() {
        let (in_tx, in_rx) = mpsc::channel(4);
        let (out_tx, out_rx) = mpsc::channel(1);
        drop(out_rx);
        in_tx.send(record(2, "x")).await.unwrap();
        drop(in_tx);

        let cancel = CancellationToken::new();
        let report = run_filter_stage(
            Classifier::new(config("", 0), 0),
            in_rx,
            out_tx,
            cancel.clone(),
            Arc::new(ProgressState::new()),
        )
        .await;
        assert_eq!(report.outcome, PageOutcome::Abandoned);
        assert!(cancel.is_cancelled());
    }
}

//! Progress events emitted during a search.

use chatgrep_types::{OutcomeCounts, ProgressSnapshot};
use serde::Serialize;

/// An event at a page or channel boundary.
///
/// Serializes as a JSON object tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SearchEvent {
    /// A channel's search is about to start.
    #[serde(rename = "nextChannel")]
    NextChannel {
        /// Accepted records so far.
        found: u64,
        /// The channel about to be searched.
        channel: String,
        /// Zero-based position of the channel in the run.
        current_channel_num: usize,
        /// Number of channels in the run.
        count_channels: usize,
        /// Counters at this point.
        progress: ProgressSnapshot,
    },

    /// A page is about to be fetched.
    #[serde(rename = "nextStep")]
    NextStep {
        /// Accepted records so far.
        found: u64,
        /// The channel being searched.
        channel: String,
        /// The page date, RFC 3339.
        next_date: String,
        /// Estimated pages for the whole window.
        total_steps: f64,
        /// Estimated pages left, this one included.
        left_steps: f64,
        /// Counters at this point.
        progress: ProgressSnapshot,
    },

    /// A page fetch failed and the channel was abandoned.
    #[serde(rename = "fetchError")]
    FetchError {
        /// The channel that failed.
        channel: String,
        /// The error message.
        error: String,
        /// Counters at this point.
        progress: ProgressSnapshot,
    },

    /// The run is over.
    #[serde(rename = "summaryFinished")]
    SummaryFinished {
        /// Final per-category counts.
        results: OutcomeCounts,
        /// Final counters.
        progress: ProgressSnapshot,
    },
}

impl SearchEvent {
    /// The counters carried by the event.
    #[must_use]
    pub const fn progress(&self) -> &ProgressSnapshot {
        match self {
            Self::NextChannel { progress, .. }
            | Self::NextStep { progress, .. }
            | Self::FetchError { progress, .. }
            | Self::SummaryFinished { progress, .. } => progress,
        }
    }
}

/// Receives search events.
pub trait Reporter {
    /// Handles one event.
    fn report(&mut self, event: &SearchEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _event: &SearchEvent) {}
}

/// Collects events, mostly useful in tests.
impl Reporter for Vec<SearchEvent> {
    fn report(&mut self, event: &SearchEvent) {
        self.push(event.clone());
    }
}

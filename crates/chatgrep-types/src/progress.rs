//! Progress counters shared by the pipeline stages.
//!
//! Each field has exactly one writer: the fetch stage owns the byte and line
//! counters, the filter stage owns the per-category counters. Readers take a
//! [`ProgressSnapshot`] between pages, after both stages of the page have been
//! joined, so no increment issued by a finished page is ever missed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::{OutcomeCategory, OutcomeCounts};

/// Cumulative progress of a whole run.
///
/// Created once per run and shared (behind an `Arc`) with every page's stages.
/// Counters only ever grow.
#[derive(Debug)]
pub struct ProgressState {
    begin_time: DateTime<Utc>,
    started: Instant,
    count_bytes: AtomicU64,
    count_lines: AtomicU64,
    results: [AtomicU64; OutcomeCategory::COUNT],
}

impl ProgressState {
    /// Creates zeroed counters stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            begin_time: Utc::now(),
            started: Instant::now(),
            count_bytes: AtomicU64::new(0),
            count_lines: AtomicU64::new(0),
            results: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Records one line read from a page body. Called by the fetch stage only.
    pub fn record_line(&self, bytes: usize) {
        self.count_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
        self.count_lines.fetch_add(1, Ordering::Relaxed);
    }

    /// Records the outcome of one classified record. Called by the filter stage only.
    pub fn record_outcome(&self, category: OutcomeCategory) {
        self.results[category.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the current count for a category.
    #[must_use]
    pub fn count(&self, category: OutcomeCategory) -> u64 {
        self.results[category.index()].load(Ordering::Relaxed)
    }

    /// Returns the number of accepted records so far.
    #[must_use]
    pub fn accepted(&self) -> u64 {
        self.count(OutcomeCategory::Accepted)
    }

    /// Returns the cumulative number of lines read.
    #[must_use]
    pub fn lines(&self) -> u64 {
        self.count_lines.load(Ordering::Relaxed)
    }

    /// Returns the cumulative number of bytes read.
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.count_bytes.load(Ordering::Relaxed)
    }

    /// Wall-clock time when the run started.
    #[must_use]
    pub const fn begin_time(&self) -> DateTime<Utc> {
        self.begin_time
    }

    /// Time elapsed since the run started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Copies the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        let counts = std::array::from_fn(|i| self.results[i].load(Ordering::Relaxed));
        ProgressSnapshot {
            count_lines: self.lines(),
            count_bytes: self.bytes(),
            total_results: OutcomeCounts::from_array(counts),
            begin_time: self.begin_time,
        }
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time copy of [`ProgressState`], as carried by report events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    /// Cumulative number of lines read.
    pub count_lines: u64,
    /// Cumulative number of bytes read.
    pub count_bytes: u64,
    /// Per-category outcome counts.
    pub total_results: OutcomeCounts,
    /// When the run started.
    pub begin_time: DateTime<Utc>,
}

impl ProgressSnapshot {
    /// Returns the number of accepted records.
    #[must_use]
    pub const fn found(&self) -> u64 {
        self.total_results.get(OutcomeCategory::Accepted)
    }

    /// Average line length in bytes, or `None` if no lines were read.
    #[must_use]
    pub const fn average_line_length(&self) -> Option<u64> {
        match self.count_lines {
            0 => None,
            lines => Some(self.count_bytes / lines),
        }
    }
}

//! Search orchestration for chatgrep.
//!
//! - [`Searcher`] - Runs the per-channel paging loop
//! - [`SearchPlan`] - Which instance, channels and endpoint family to search
//! - [`SearchEvent`] / [`Reporter`] - Progress events for a reporting layer
//! - [`LineSink`] - Where accepted lines go

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/chatgrep/chatgrep/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod report;
mod search;
mod sink;

pub use report::{NullReporter, Reporter, SearchEvent};
pub use search::{ChannelOutcome, RunSummary, SearchOptions, SearchPlan, Searcher};
pub use sink::{LineSink, WriterSink};

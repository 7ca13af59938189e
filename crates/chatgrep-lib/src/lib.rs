//! Search chat-log archives for matching lines.
//!
//! This is a facade crate that re-exports functionality from the chatgrep
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use chatgrep_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let start = parse_timestamp("start", "2024-01-01")?;
//!     let window = TimeWindow::until_now(start)?;
//!     let config = MatchConfig::new(window, "(?i)hello")?.with_max_results(10);
//!
//!     let client = ArchiveClient::with_defaults()?;
//!     let searcher = Searcher::new(client, config, SearchOptions::default());
//!     let plan = SearchPlan {
//!         base_url: "http://localhost:8025".into(),
//!         channels: vec!["pajlada".into()],
//!         user: None,
//!     };
//!
//!     let mut sink = WriterSink::new(std::io::stdout().lock());
//!     let summary = searcher.run(&plan, &mut NullReporter, &mut sink).await?;
//!     eprintln!("found {}", summary.progress.found());
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/chatgrep/chatgrep/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use chatgrep_types::*;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use chatgrep_fetch::{
    ArchiveApi, ArchiveChannel, ArchiveClient, ClientConfig, FetchError, PageDescriptor,
    PageStream, PumpSummary, UserRef,
};

// Re-export classification
#[cfg(feature = "filter")]
pub use chatgrep_filter::{Classifier, PageOutcome, StageReport, run_filter_stage};

// Re-export orchestration
#[cfg(feature = "search")]
pub use chatgrep_search::{
    ChannelOutcome, LineSink, NullReporter, Reporter, RunSummary, SearchEvent, SearchOptions,
    SearchPlan, Searcher, WriterSink,
};

/// Prelude module for convenient imports.
///
/// ```
/// use chatgrep_lib::prelude::*;
/// ```
pub mod prelude {
    pub use chatgrep_types::{
        ChatgrepError, ConfigError, MatchConfig, OutcomeCategory, OutcomeCounts,
        ProgressSnapshot, ProgressState, Record, Result, TimeWindow, UserMatch, parse_timestamp,
    };

    #[cfg(feature = "fetch")]
    pub use chatgrep_fetch::{ArchiveApi, ArchiveClient, ClientConfig, FetchError, UserRef};

    #[cfg(feature = "filter")]
    pub use chatgrep_filter::Classifier;

    #[cfg(feature = "search")]
    pub use chatgrep_search::{
        ChannelOutcome, LineSink, NullReporter, Reporter, RunSummary, SearchEvent,
        SearchOptions, SearchPlan, Searcher, WriterSink,
    };
}

//! Record classification for chatgrep.
//!
//! - [`Classifier`] - Resolves one record to one [`OutcomeCategory`]
//! - [`run_filter_stage`] - Drives a classifier between two queues for one page
//!
//! [`OutcomeCategory`]: chatgrep_types::OutcomeCategory

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/chatgrep/chatgrep/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod classifier;
mod stage;

pub use classifier::Classifier;
pub use stage::{PageOutcome, StageReport, run_filter_stage};

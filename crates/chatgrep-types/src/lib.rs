//! Core types for the chatgrep chat-log search tool.
//!
//! This crate provides the fundamental data structures used throughout chatgrep:
//!
//! - [`Record`] - One archive line with the fields extracted for filtering
//! - [`OutcomeCategory`] - The closed set of classification outcomes
//! - [`MatchConfig`] - Immutable per-run filter configuration
//! - [`TimeWindow`] - The `[start, end)` range a search covers
//! - [`ProgressState`] - Counters shared by the pipeline stages

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/chatgrep/chatgrep/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod outcome;
mod progress;
mod record;
mod window;

pub use config::{MatchConfig, UserMatch};
pub use error::{ChatgrepError, ConfigError, Result};
pub use outcome::{OutcomeCategory, OutcomeCounts};
pub use progress::{ProgressSnapshot, ProgressState};
pub use record::{Record, RecordMeta};
pub use window::{TimeWindow, parse_timestamp};

//! Error types for chatgrep.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for chatgrep operations.
pub type Result<T> = std::result::Result<T, ChatgrepError>;

/// Errors that can occur while setting up or running a search.
#[derive(Error, Debug)]
pub enum ChatgrepError {
    /// The search configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A pipeline task panicked or was aborted.
    #[error("pipeline task failed: {0}")]
    Task(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors detected before any page is fetched.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A regular expression failed to compile.
    #[error("invalid {field} regex: {source}")]
    InvalidPattern {
        /// Which option carried the pattern.
        field: &'static str,
        /// The underlying compile error.
        #[source]
        source: regex::Error,
    },

    /// A timestamp could not be parsed.
    #[error("{field}: invalid time: {input}")]
    InvalidTime {
        /// Which option carried the timestamp.
        field: &'static str,
        /// The rejected input.
        input: String,
    },

    /// The window start is not before its end.
    #[error("invalid time window: {start} is not before {end}")]
    InvalidWindow {
        /// The window start.
        start: DateTime<Utc>,
        /// The window end.
        end: DateTime<Utc>,
    },

    /// Two options contradict each other.
    #[error("{0}")]
    Conflict(String),
}

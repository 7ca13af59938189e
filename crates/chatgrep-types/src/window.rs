//! Search window and timestamp parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::ConfigError;

/// The `[start, end)` range of timestamps a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Window start (inclusive).
    pub start: DateTime<Utc>,
    /// Window end (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new window, validating that start < end.
    ///
    /// # Errors
    ///
    /// Returns an error if start >= end.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ConfigError> {
        if start >= end {
            return Err(ConfigError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a window from `start` up to the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is not in the past.
    pub fn until_now(start: DateTime<Utc>) -> Result<Self, ConfigError> {
        Self::new(start, Utc::now())
    }

    /// Returns true if the timestamp lies before the window start.
    #[must_use]
    pub fn is_before_start(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp < self.start
    }

    /// Returns true if the timestamp lies at or after the window end.
    #[must_use]
    pub fn is_after_end(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.end
    }

    /// The last millisecond still inside the window.
    ///
    /// Archive timestamps have millisecond resolution, so the page holding this
    /// instant is the newest page a search needs.
    #[must_use]
    pub fn last_instant(&self) -> DateTime<Utc> {
        (self.end - TimeDelta::milliseconds(1)).max(self.start)
    }

    /// Returns the length of the window.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Parses a user-supplied timestamp.
///
/// Accepted forms, tried in order:
/// - `2024-01-02 15:04:05` (UTC)
/// - `2024-01-02 15:04:05-07:00`
/// - RFC 3339 (`2024-01-02T15:04:05Z`)
/// - `2024-01-02` (midnight UTC)
///
/// # Errors
///
/// Returns [`ConfigError::InvalidTime`] naming `field` if no form matches.
pub fn parse_timestamp(field: &'static str, input: &str) -> Result<DateTime<Utc>, ConfigError> {
    let input = input.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Some(midnight) = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }
    Err(ConfigError::InvalidTime {
        field,
        input: input.to_string(),
    })
}

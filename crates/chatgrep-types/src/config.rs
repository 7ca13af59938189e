//! Per-run match configuration.

use regex::Regex;

use crate::{ConfigError, TimeWindow};

/// How a username is compared.
#[derive(Debug, Clone, Default)]
pub enum UserMatch {
    /// No comparison is made.
    #[default]
    Disabled,
    /// Case-insensitive equality with the stored (lower-cased) name.
    Exact(String),
    /// Regular expression match.
    Regex(Regex),
}

impl UserMatch {
    /// Exact, case-insensitive match. An empty name disables matching.
    #[must_use]
    pub fn exact(name: &str) -> Self {
        if name.is_empty() {
            Self::Disabled
        } else {
            Self::Exact(name.to_lowercase())
        }
    }

    /// Regex match. An empty pattern disables matching.
    ///
    /// # Errors
    ///
    /// Returns an error naming `field` if the pattern does not compile.
    pub fn regex(field: &'static str, pattern: &str) -> Result<Self, ConfigError> {
        if pattern.is_empty() {
            return Ok(Self::Disabled);
        }
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|source| ConfigError::InvalidPattern { field, source })
    }

    /// Returns true unless matching is disabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Returns true if the username satisfies this matcher.
    ///
    /// A disabled matcher never matches; a missing username never matches.
    #[must_use]
    pub fn matches(&self, username: Option<&str>) -> bool {
        let Some(username) = username else {
            return false;
        };
        match self {
            Self::Disabled => false,
            Self::Exact(name) => username.to_lowercase() == *name,
            Self::Regex(regex) => regex.is_match(username),
        }
    }
}

/// Immutable filter configuration for one run.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// The window records must fall into.
    pub window: TimeWindow,
    /// Allowed type tags (upper-cased). Empty allows every type.
    pub message_types: Vec<String>,
    /// Positive username match.
    pub user: UserMatch,
    /// Negative username match; a hit excludes the record.
    pub not_user: UserMatch,
    /// Message text pattern. Always applied; the empty pattern matches everything.
    pub text: Regex,
    /// Maximum accepted records for the run, 0 for unlimited.
    pub max_results: u64,
}

impl MatchConfig {
    /// Creates a configuration matching message text against `text_pattern`
    /// inside `window`, with every other filter disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile.
    pub fn new(window: TimeWindow, text_pattern: &str) -> Result<Self, ConfigError> {
        let text = Regex::new(text_pattern).map_err(|source| ConfigError::InvalidPattern {
            field: "message",
            source,
        })?;
        Ok(Self {
            window,
            message_types: Vec::new(),
            user: UserMatch::Disabled,
            not_user: UserMatch::Disabled,
            text,
            max_results: 0,
        })
    }

    /// Restricts accepted type tags. Blank entries are ignored.
    #[must_use]
    pub fn with_message_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.message_types = types
            .into_iter()
            .map(|t| t.as_ref().trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    /// Sets the positive username match.
    #[must_use]
    pub fn with_user(mut self, user: UserMatch) -> Self {
        self.user = user;
        self
    }

    /// Sets the negative username match.
    #[must_use]
    pub fn with_not_user(mut self, not_user: UserMatch) -> Self {
        self.not_user = not_user;
        self
    }

    /// Sets the result cutoff (0 for unlimited).
    #[must_use]
    pub const fn with_max_results(mut self, max_results: u64) -> Self {
        self.max_results = max_results;
        self
    }

    /// Returns true if `command` passes the type allow-list.
    #[must_use]
    pub fn allows_type(&self, command: &str) -> bool {
        self.message_types.is_empty()
            || self
                .message_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(command))
    }

    /// Returns true if `accepted` records satisfy the cutoff.
    #[must_use]
    pub const fn cutoff_reached(&self, accepted: u64) -> bool {
        self.max_results != 0 && accepted >= self.max_results
    }
}

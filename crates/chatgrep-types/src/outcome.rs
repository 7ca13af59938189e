//! Classification outcomes and their tallies.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// The category a classified record falls into.
///
/// Every examined record resolves to exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeCategory {
    /// The record passed every filter.
    Accepted,
    /// The record is older than the window start. Terminal: the channel's
    /// history has been consumed past the window.
    DateBeforeStart,
    /// The record is at or after the window end.
    DateAfterEnd,
    /// The record's type tag is not in the allow-list, or the line is malformed.
    TypeMismatch,
    /// The username failed the positive match or hit the negative match.
    UserMismatch,
    /// The message text did not match the pattern.
    TextMismatch,
    /// The result cutoff was already satisfied. Terminal.
    MaxCountReached,
}

impl OutcomeCategory {
    /// Number of categories.
    pub const COUNT: usize = 7;

    /// Every category, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Accepted,
        Self::DateBeforeStart,
        Self::DateAfterEnd,
        Self::TypeMismatch,
        Self::UserMismatch,
        Self::TextMismatch,
        Self::MaxCountReached,
    ];

    /// Position of this category in a counter array.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Accepted => 0,
            Self::DateBeforeStart => 1,
            Self::DateAfterEnd => 2,
            Self::TypeMismatch => 3,
            Self::UserMismatch => 4,
            Self::TextMismatch => 5,
            Self::MaxCountReached => 6,
        }
    }

    /// Returns true if this category ends the paging loop for a channel.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::DateBeforeStart | Self::MaxCountReached)
    }

    /// Returns the category name used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::DateBeforeStart => "DateBeforeStart",
            Self::DateAfterEnd => "DateAfterEnd",
            Self::TypeMismatch => "TypeMismatch",
            Self::UserMismatch => "UserMismatch",
            Self::TextMismatch => "TextMismatch",
            Self::MaxCountReached => "MaxCountReached",
        }
    }
}

impl std::fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Per-category counters, indexed by [`OutcomeCategory::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts([u64; OutcomeCategory::COUNT]);

impl OutcomeCounts {
    /// Creates a zeroed tally.
    #[must_use]
    pub const fn new() -> Self {
        Self([0; OutcomeCategory::COUNT])
    }

    /// Creates a tally from raw counts in index order.
    #[must_use]
    pub const fn from_array(counts: [u64; OutcomeCategory::COUNT]) -> Self {
        Self(counts)
    }

    /// Returns the count for a category.
    #[must_use]
    pub const fn get(&self, category: OutcomeCategory) -> u64 {
        self.0[category.index()]
    }

    /// Adds one to a category.
    pub const fn increment(&mut self, category: OutcomeCategory) {
        self.0[category.index()] += 1;
    }

    /// Sum over all categories, i.e. the number of records examined.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// Iterates over `(category, count)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (OutcomeCategory, u64)> + '_ {
        OutcomeCategory::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
    }
}

impl Serialize for OutcomeCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(OutcomeCategory::COUNT))?;
        for (category, count) in self.iter() {
            map.serialize_entry(category.as_str(), &count)?;
        }
        map.end()
    }
}

//! Archive page URLs and backward paging.
//!
//! Archives expose two page granularities:
//!
//! - channel-wide logs, one page per calendar day:
//!   `{instance}/channel/{channel}/{year}/{month}/{day}?raw&reverse`
//! - per-user logs, one page per calendar month:
//!   `{instance}/channel/{channel}/user/{user}/{year}/{month}?raw&reverse`
//!   (or `/userid/{id}/` when addressing the user by id)
//!
//! Month and day are not zero-padded. `reverse` makes every page newest-first.

use chrono::{DateTime, Datelike, Months, NaiveTime, TimeDelta, Utc};

/// How a per-user page addresses its user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    /// By login name.
    Name(String),
    /// By numeric user id.
    Id(String),
}

/// The archive endpoint family used for one channel's search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveApi {
    /// Every record of the channel, one day per page.
    Channel {
        /// Instance base URL without trailing slash.
        base_url: String,
        /// Channel name.
        channel: String,
    },
    /// One user's records in the channel, one month per page.
    User {
        /// Instance base URL without trailing slash.
        base_url: String,
        /// Channel name.
        channel: String,
        /// The user.
        user: UserRef,
    },
}

/// One resolved page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    /// The URL to fetch.
    pub url: String,
    /// The date this page was resolved for.
    pub date: DateTime<Utc>,
    /// The date to resolve the following (older) page for.
    pub next_date: DateTime<Utc>,
    /// Whether this is a per-user page.
    pub per_user: bool,
}

impl ArchiveApi {
    /// Channel-wide paging.
    #[must_use]
    pub fn channel(base_url: &str, channel: impl Into<String>) -> Self {
        Self::Channel {
            base_url: base_url.trim_end_matches('/').to_string(),
            channel: channel.into(),
        }
    }

    /// Per-user paging.
    #[must_use]
    pub fn user(base_url: &str, channel: impl Into<String>, user: UserRef) -> Self {
        Self::User {
            base_url: base_url.trim_end_matches('/').to_string(),
            channel: channel.into(),
            user,
        }
    }

    /// The channel being paged.
    #[must_use]
    pub fn channel_name(&self) -> &str {
        match self {
            Self::Channel { channel, .. } | Self::User { channel, .. } => channel,
        }
    }

    /// Returns true for the per-user variant.
    #[must_use]
    pub const fn is_user_variant(&self) -> bool {
        matches!(self, Self::User { .. })
    }

    /// Returns the request target for the page containing `date`, and whether
    /// it is a per-user page.
    #[must_use]
    pub fn page_for(&self, date: DateTime<Utc>) -> (String, bool) {
        let url = match self {
            Self::Channel { base_url, channel } => format!(
                "{base_url}/channel/{channel}/{}/{}/{}?raw&reverse",
                date.year(),
                date.month(),
                date.day()
            ),
            Self::User {
                base_url,
                channel,
                user,
            } => {
                let (segment, user) = match user {
                    UserRef::Name(name) => ("user", name),
                    UserRef::Id(id) => ("userid", id),
                };
                format!(
                    "{base_url}/channel/{channel}/{segment}/{user}/{}/{}?raw&reverse",
                    date.year(),
                    date.month()
                )
            }
        };
        (url, self.is_user_variant())
    }

    /// Returns the date of the page preceding the one containing `date`:
    /// exactly one day earlier for channel pages, one calendar month earlier
    /// for user pages (clamped to the end of shorter months).
    #[must_use]
    pub fn previous_page(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        let previous = match self {
            Self::Channel { .. } => date.checked_sub_signed(TimeDelta::days(1)),
            Self::User { .. } => date.checked_sub_months(Months::new(1)),
        };
        previous.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Resolves the page for `date` together with the next page's date.
    #[must_use]
    pub fn describe(&self, date: DateTime<Utc>) -> PageDescriptor {
        let (url, per_user) = self.page_for(date);
        PageDescriptor {
            url,
            date,
            next_date: self.previous_page(date),
            per_user,
        }
    }

    /// Nominal page length, for progress estimates only.
    #[must_use]
    pub fn approximate_step(&self) -> TimeDelta {
        match self {
            Self::Channel { .. } => TimeDelta::hours(24),
            Self::User { .. } => TimeDelta::days(30),
        }
    }

    /// Start of the page period containing `date` (midnight, or midnight of the
    /// first of the month).
    #[must_use]
    pub fn page_start(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        let day = match self {
            Self::Channel { .. } => date.date_naive(),
            Self::User { .. } => date.date_naive().with_day(1).unwrap_or(date.date_naive()),
        };
        day.and_time(NaiveTime::MIN).and_utc()
    }

    /// Returns true if the page containing `date` lies entirely before `start`.
    #[must_use]
    pub fn page_precedes(&self, date: DateTime<Utc>, start: DateTime<Utc>) -> bool {
        self.page_start(date) < self.page_start(start)
    }
}

//! Record classification.

use chatgrep_types::{MatchConfig, OutcomeCategory, OutcomeCounts, Record};
use std::sync::Arc;

/// Streaming record classifier.
///
/// Checks are applied in a fixed priority order, so each record lands in
/// exactly one category:
///
/// 1. cutoff already satisfied → [`OutcomeCategory::MaxCountReached`]
/// 2. unparseable line → [`OutcomeCategory::TypeMismatch`]
/// 3. before the window → [`OutcomeCategory::DateBeforeStart`]
/// 4. at or after the window end → [`OutcomeCategory::DateAfterEnd`]
/// 5. type not allowed → [`OutcomeCategory::TypeMismatch`]
/// 6. negative user hit, or positive user miss → [`OutcomeCategory::UserMismatch`]
/// 7. text pattern miss → [`OutcomeCategory::TextMismatch`]
/// 8. otherwise [`OutcomeCategory::Accepted`]
#[derive(Debug)]
pub struct Classifier {
    config: Arc<MatchConfig>,
    accepted: u64,
    tally: OutcomeCounts,
}

impl Classifier {
    /// Creates a classifier that has already seen `accepted` acceptances
    /// earlier in the run.
    #[must_use]
    pub const fn new(config: Arc<MatchConfig>, accepted: u64) -> Self {
        Self {
            config,
            accepted,
            tally: OutcomeCounts::new(),
        }
    }

    /// Classifies one record and counts it.
    pub fn evaluate(&mut self, record: &Record) -> OutcomeCategory {
        let category = self.categorize(record);
        if category == OutcomeCategory::Accepted {
            self.accepted += 1;
        }
        self.tally.increment(category);
        category
    }

    fn categorize(&self, record: &Record) -> OutcomeCategory {
        let config = &*self.config;

        if self.cutoff_reached() {
            return OutcomeCategory::MaxCountReached;
        }
        let Some(meta) = &record.meta else {
            return OutcomeCategory::TypeMismatch;
        };
        if config.window.is_before_start(meta.timestamp) {
            return OutcomeCategory::DateBeforeStart;
        }
        if config.window.is_after_end(meta.timestamp) {
            return OutcomeCategory::DateAfterEnd;
        }
        if !config.allows_type(&meta.command) {
            return OutcomeCategory::TypeMismatch;
        }

        let username = meta.username.as_deref();
        if config.not_user.matches(username)
            || (config.user.is_enabled() && !config.user.matches(username))
        {
            return OutcomeCategory::UserMismatch;
        }

        if !config.text.is_match(&meta.text) {
            return OutcomeCategory::TextMismatch;
        }
        OutcomeCategory::Accepted
    }

    /// Returns true once the configured cutoff has been met.
    #[must_use]
    pub fn cutoff_reached(&self) -> bool {
        self.config.cutoff_reached(self.accepted)
    }

    /// Acceptances so far in the run, including the seed.
    #[must_use]
    pub const fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Outcomes of the records this classifier evaluated.
    #[must_use]
    pub const fn tally(&self) -> &OutcomeCounts {
        &self.tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatgrep_types::{TimeWindow, UserMatch};
    use chrono::{DateTime, TimeZone, Utc};

    fn window() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn record(ts: DateTime<Utc>, command: &str, user: &str, text: &str) -> Record {
        Record::parse(format!(
            "@tmi-sent-ts={} :{user}!{user}@{user}.tmi.twitch.tv {command} #chan :{text}",
            ts.timestamp_millis()
        ))
    }

    fn classifier(config: MatchConfig) -> Classifier {
        Classifier::new(Arc::new(config), 0)
    }

    fn base() -> MatchConfig {
        MatchConfig::new(window(), "").unwrap()
    }

    #[test]
    fn test_accepts_everything_in_window_by_default() {
        let mut c = classifier(base());
        let category = c.evaluate(&record(at(2, 12), "PRIVMSG", "foo", "hello"));
        assert_eq!(category, OutcomeCategory::Accepted);
        assert_eq!(c.accepted(), 1);
    }

    #[test]
    fn test_window_boundaries() {
        let mut c = classifier(base());
        assert_eq!(
            c.evaluate(&record(Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap(), "PRIVMSG", "a", "x")),
            OutcomeCategory::DateBeforeStart
        );
        assert_eq!(
            c.evaluate(&record(at(1, 0), "PRIVMSG", "a", "x")),
            OutcomeCategory::Accepted
        );
        assert_eq!(
            c.evaluate(&record(at(3, 0), "PRIVMSG", "a", "x")),
            OutcomeCategory::DateAfterEnd
        );
    }

    #[test]
    fn test_malformed_is_type_mismatch() {
        let mut c = classifier(base());
        assert_eq!(
            c.evaluate(&Record::parse("not an irc line")),
            OutcomeCategory::TypeMismatch
        );
    }

    #[test]
    fn test_type_allow_list() {
        let mut c = classifier(base().with_message_types(["PRIVMSG"]));
        assert_eq!(
            c.evaluate(&record(at(2, 0), "USERNOTICE", "a", "sub")),
            OutcomeCategory::TypeMismatch
        );
        assert_eq!(
            c.evaluate(&record(at(2, 0), "PRIVMSG", "a", "msg")),
            OutcomeCategory::Accepted
        );
    }

    #[test]
    fn test_exact_user() {
        let mut c = classifier(base().with_user(UserMatch::exact("Foo")));
        assert_eq!(
            c.evaluate(&record(at(2, 0), "PRIVMSG", "foo", "x")),
            OutcomeCategory::Accepted
        );
        assert_eq!(
            c.evaluate(&record(at(2, 0), "PRIVMSG", "bar", "x")),
            OutcomeCategory::UserMismatch
        );
    }

    #[test]
    fn test_negative_user_only() {
        let mut c = classifier(base().with_not_user(UserMatch::regex("notuser", "bot$").unwrap()));
        assert_eq!(
            c.evaluate(&record(at(2, 0), "PRIVMSG", "spambot", "x")),
            OutcomeCategory::UserMismatch
        );
        assert_eq!(
            c.evaluate(&record(at(2, 0), "PRIVMSG", "human", "x")),
            OutcomeCategory::Accepted
        );
    }

    #[test]
    fn test_negative_wins_over_positive() {
        let config = base()
            .with_user(UserMatch::regex("user", "^a").unwrap())
            .with_not_user(UserMatch::exact("alice"));
        let mut c = classifier(config);
        assert_eq!(
            c.evaluate(&record(at(2, 0), "PRIVMSG", "alice", "x")),
            OutcomeCategory::UserMismatch
        );
        assert_eq!(
            c.evaluate(&record(at(2, 0), "PRIVMSG", "anna", "x")),
            OutcomeCategory::Accepted
        );
    }

    #[test]
    fn test_text_pattern() {
        let mut c = classifier(MatchConfig::new(window(), "(?i)kappa").unwrap());
        assert_eq!(
            c.evaluate(&record(at(2, 0), "PRIVMSG", "a", "nice KAPPA")),
            OutcomeCategory::Accepted
        );
        assert_eq!(
            c.evaluate(&record(at(2, 0), "PRIVMSG", "a", "hello")),
            OutcomeCategory::TextMismatch
        );
    }

    #[test]
    fn test_priority_date_before_type() {
        let mut c = classifier(base().with_message_types(["PRIVMSG"]));
        assert_eq!(
            c.evaluate(&record(Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap(), "CLEARCHAT", "a", "x")),
            OutcomeCategory::DateBeforeStart
        );
    }

    #[test]
    fn test_cutoff_applies_to_next_record() {
        let mut c = classifier(base().with_max_results(5));
        for _ in 0..5 {
            assert_eq!(
                c.evaluate(&record(at(2, 0), "PRIVMSG", "a", "x")),
                OutcomeCategory::Accepted
            );
        }
        assert!(c.cutoff_reached());
        assert_eq!(
            c.evaluate(&record(at(2, 0), "PRIVMSG", "a", "x")),
            OutcomeCategory::MaxCountReached
        );
        assert_eq!(c.accepted(), 5);
    }

    #[test]
    fn test_seeded_cutoff() {
        let mut c = Classifier::new(Arc::new(base().with_max_results(3)), 3);
        assert_eq!(
            c.evaluate(&record(at(2, 0), "PRIVMSG", "a", "x")),
            OutcomeCategory::MaxCountReached
        );
    }

    #[test]
    fn test_tally_sums_to_evaluated() {
        let mut c = classifier(
            MatchConfig::new(window(), "yes")
                .unwrap()
                .with_message_types(["PRIVMSG"])
                .with_max_results(2),
        );
        let records = [
            record(at(2, 0), "PRIVMSG", "a", "yes"),
            record(at(2, 0), "PRIVMSG", "a", "no"),
            record(at(2, 0), "NOTICE", "a", "yes"),
            Record::parse("junk"),
            record(at(2, 0), "PRIVMSG", "a", "yes"),
            record(at(2, 0), "PRIVMSG", "a", "yes"),
        ];
        for r in &records {
            c.evaluate(r);
        }
        let tally = c.tally();
        assert_eq!(tally.total(), records.len() as u64);
        assert_eq!(tally.get(OutcomeCategory::Accepted), 2);
        assert_eq!(tally.get(OutcomeCategory::TextMismatch), 1);
        assert_eq!(tally.get(OutcomeCategory::TypeMismatch), 2);
        assert_eq!(tally.get(OutcomeCategory::MaxCountReached), 1);
    }
}

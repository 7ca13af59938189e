//! Benchmark fixtures for chatgrep.
//!
//! Generates archive-shaped raw lines so the parsing and classification hot
//! path can be measured without a running archive.

use chatgrep_lib::{ConfigError, MatchConfig, TimeWindow};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// Users cycled through by the generated lines.
const USERS: [&str; 4] = ["pajlada", "forsen", "nightbot", "supibot"];

/// Message bodies cycled through by the generated lines.
const TEXTS: [&str; 3] = [
    "hello chat how is everyone doing",
    "!ping",
    "that was a really long stream yesterday, good times",
];

/// The instant the generated day starts at.
#[must_use]
pub fn day_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// One raw archive line.
#[must_use]
pub fn raw_line(index: usize, timestamp: DateTime<Utc>) -> String {
    let user = USERS[index % USERS.len()];
    let text = TEXTS[index % TEXTS.len()];
    let ts = timestamp.timestamp_millis();

    if index % 50 == 49 {
        return format!(
            "@room-id=11148817;target-user-id=1;tmi-sent-ts={ts} :tmi.twitch.tv CLEARCHAT #pajlada :{user}"
        );
    }

    format!(
        "@badge-info=;badges=;color=#FF0000;display-name={user};emotes=;id={index};\
         mod=0;room-id=11148817;subscriber=0;tmi-sent-ts={ts};turbo=0;user-id={index};\
         user-type= :{user}!{user}@{user}.tmi.twitch.tv PRIVMSG #pajlada :{text}"
    )
}

/// `count` lines spread evenly across one day, newest first.
#[must_use]
pub fn day_of_lines(count: usize) -> Vec<String> {
    let start = day_start();
    let spacing = TimeDelta::milliseconds(86_400_000 / count.max(1) as i64);
    (0..count)
        .rev()
        .map(|i| raw_line(i, start + spacing * i as i32))
        .collect()
}

/// A configuration that exercises every filter stage.
///
/// # Errors
///
/// Returns an error if the window or pattern is rejected.
pub fn busy_config() -> Result<MatchConfig, ConfigError> {
    let window = TimeWindow::new(day_start(), day_start() + TimeDelta::days(1))?;
    Ok(MatchConfig::new(window, r"(?i)\bstream\b")?
        .with_message_types(["PRIVMSG", "USERNOTICE"])
        .with_not_user(chatgrep_lib::UserMatch::exact("nightbot")))
}

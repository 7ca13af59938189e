//! Archive records.
//!
//! Archive pages hold one raw IRC line per record, with IRCv3 message tags:
//!
//! ```text
//! @badges=;login=foo;tmi-sent-ts=1704067200000 :foo!foo@foo.tmi.twitch.tv PRIVMSG #chan :hi there
//! ```
//!
//! Only the fields the filters need are extracted; the raw line is kept
//! verbatim for output.

use chrono::{DateTime, Utc};

/// One line of an archive page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The line exactly as received, without its terminator. Not
    /// necessarily valid UTF-8.
    pub raw: Vec<u8>,
    /// Extracted fields, or `None` if the line could not be parsed.
    pub meta: Option<RecordMeta>,
}

/// Fields extracted from a well-formed archive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeta {
    /// When the message was sent (`tmi-sent-ts` tag).
    pub timestamp: DateTime<Utc>,
    /// The IRC command, e.g. `PRIVMSG` or `USERNOTICE`.
    pub command: String,
    /// The user the record is about, if any.
    pub username: Option<String>,
    /// The trailing parameter, empty when absent.
    pub text: String,
}

impl Record {
    /// Parses a raw archive line.
    ///
    /// Never fails: lines that cannot be parsed yield a record without
    /// [`RecordMeta`]. Invalid UTF-8 is replaced for field extraction only;
    /// `raw` keeps the original bytes.
    #[must_use]
    pub fn parse(raw: impl Into<Vec<u8>>) -> Self {
        let raw = raw.into();
        let meta = parse_meta(&String::from_utf8_lossy(&raw));
        Self { raw, meta }
    }

    /// Returns true if the line could not be parsed.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        self.meta.is_none()
    }
}

fn parse_meta(raw: &str) -> Option<RecordMeta> {
    let mut rest = raw.trim_end_matches(['\r', '\n']);

    let mut sent_ts = None;
    let mut login = None;
    if let Some(tagged) = rest.strip_prefix('@') {
        let (tags, after) = tagged.split_once(' ')?;
        for tag in tags.split(';') {
            let (key, value) = tag.split_once('=').unwrap_or((tag, ""));
            match key {
                "tmi-sent-ts" => sent_ts = value.parse::<i64>().ok(),
                "login" if !value.is_empty() => login = Some(unescape_tag_value(value)),
                _ => {}
            }
        }
        rest = after.trim_start_matches(' ');
    }

    let mut nick = None;
    if let Some(prefixed) = rest.strip_prefix(':') {
        let (prefix, after) = prefixed.split_once(' ')?;
        // Server prefixes carry no `!user@host` part.
        nick = prefix.split_once('!').map(|(nick, _)| nick);
        rest = after.trim_start_matches(' ');
    }

    let (command, params) = rest.split_once(' ').unwrap_or((rest, ""));
    if command.is_empty() {
        return None;
    }

    let trailing = params
        .strip_prefix(':')
        .or_else(|| params.split_once(" :").map(|(_, trailing)| trailing));

    let username = match (login, command) {
        (Some(login), _) => Some(login),
        (None, "CLEARCHAT") => trailing.filter(|t| !t.is_empty()).map(str::to_string),
        (None, _) => nick.map(str::to_string),
    };

    let timestamp = DateTime::from_timestamp_millis(sent_ts?)?;

    Some(RecordMeta {
        timestamp,
        command: command.to_string(),
        username,
        text: trailing.unwrap_or_default().to_string(),
    })
}

/// Reverses IRCv3 tag value escaping.
fn unescape_tag_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(':') => out.push(';'),
            Some('s') => out.push(' '),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PRIVMSG: &str = "@badge-info=;badges=;color=#FF0000;display-name=Foo;id=abc;\
        room-id=11148817;tmi-sent-ts=1704067200000;user-id=123 \
        :foo!foo@foo.tmi.twitch.tv PRIVMSG #pajlada :hello there: world";

    #[test]
    fn test_parse_privmsg() {
        let record = Record::parse(PRIVMSG);
        let meta = record.meta.as_ref().unwrap();

        assert_eq!(meta.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(meta.command, "PRIVMSG");
        assert_eq!(meta.username.as_deref(), Some("foo"));
        assert_eq!(meta.text, "hello there: world");
        assert_eq!(record.raw, PRIVMSG.as_bytes());
    }

    #[test]
    fn test_parse_usernotice_uses_login_tag() {
        let line = "@login=some\\suser;msg-id=sub;tmi-sent-ts=1704067200000 \
            :tmi.twitch.tv USERNOTICE #pajlada :thanks";
        let meta = Record::parse(line).meta.unwrap();
        assert_eq!(meta.command, "USERNOTICE");
        assert_eq!(meta.username.as_deref(), Some("some user"));
        assert_eq!(meta.text, "thanks");
    }

    #[test]
    fn test_parse_clearchat_target() {
        let line = "@ban-duration=600;room-id=1;tmi-sent-ts=1704067200000 \
            :tmi.twitch.tv CLEARCHAT #pajlada :baduser";
        let meta = Record::parse(line).meta.unwrap();
        assert_eq!(meta.username.as_deref(), Some("baduser"));

        let clear_all = "@room-id=1;tmi-sent-ts=1704067200000 :tmi.twitch.tv CLEARCHAT #pajlada";
        let meta = Record::parse(clear_all).meta.unwrap();
        assert_eq!(meta.username, None);
        assert_eq!(meta.text, "");
    }

    #[test]
    fn test_parse_server_message_has_no_user() {
        let line = "@tmi-sent-ts=1704067200000 :tmi.twitch.tv ROOMSTATE #pajlada";
        let meta = Record::parse(line).meta.unwrap();
        assert_eq!(meta.command, "ROOMSTATE");
        assert_eq!(meta.username, None);
    }

    #[test]
    fn test_malformed_lines() {
        assert!(Record::parse("").is_malformed());
        assert!(Record::parse("garbage without tags").is_malformed());
        assert!(Record::parse("@tmi-sent-ts=notanumber :a!a@a PRIVMSG #c :x").is_malformed());
        assert!(Record::parse("@tmi-sent-ts=1704067200000").is_malformed());
        assert!(Record::parse(":a!a@a PRIVMSG #c :no timestamp").is_malformed());
    }

    #[test]
    fn test_trailing_newline_is_ignored() {
        let record = Record::parse(format!("{PRIVMSG}\r\n"));
        assert_eq!(record.meta.unwrap().text, "hello there: world");
    }

    #[test]
    fn test_invalid_utf8_kept_verbatim() {
        let mut line = b"@tmi-sent-ts=1704067200000 :a!a@a PRIVMSG #c :caf".to_vec();
        line.push(0xE9);
        let record = Record::parse(line.clone());

        assert_eq!(record.raw, line);
        assert_eq!(record.meta.unwrap().text, "caf\u{FFFD}");
    }

    #[test]
    fn test_unescape_tag_value() {
        assert_eq!(unescape_tag_value("a\\sb\\:c\\\\d"), "a b;c\\d");
        assert_eq!(unescape_tag_value("trailing\\"), "trailing");
    }
}

//! Time expressions in command arguments.
//!
//! `close 2h30m The issue has been resolved.` splits into a point in time
//! and a residual message. Accepted forms: relative durations (`2m30s`,
//! `in 5 hours`, `1 day, 3 hours`), RFC 3339 timestamps, and plain text with
//! no time at all.

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ModmailError, Result};

/// A time expression split into its resolved point in time and trailing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTime {
    pub when: DateTime<Utc>,
    /// Text after the time expression, `None` when empty
    pub residual: Option<String>,
}

/// Parser for free-form time arguments.
pub trait TimeExpression: Send + Sync {
    fn parse(&self, text: &str, now: DateTime<Utc>) -> Result<ParsedTime>;
}

/// Default parser for relative durations and RFC 3339 timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserFriendlyTime;

static DURATION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(\d{1,9})\s*([a-z]+)[\s,]*(?:and\s+)?")
        .expect("invalid duration token regex")
});

fn unit_seconds(unit: &str) -> Option<i64> {
    let seconds = match unit.to_ascii_lowercase().as_str() {
        "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600,
        "d" | "day" | "days" => 86_400,
        "w" | "wk" | "wks" | "week" | "weeks" => 604_800,
        "mo" | "month" | "months" => 2_592_000,
        "y" | "yr" | "yrs" | "year" | "years" => 31_536_000,
        _ => return None,
    };
    Some(seconds)
}

/// Consume leading duration tokens, returning total seconds and the rest.
fn take_duration(text: &str) -> Option<(i64, &str)> {
    let mut rest = text;
    let mut total: i64 = 0;
    let mut matched = false;

    while let Some(captures) = DURATION_TOKEN.captures(rest) {
        let Some(seconds) = unit_seconds(&captures[2]) else {
            break;
        };
        let amount: i64 = captures[1].parse().ok()?;
        total = total.checked_add(amount.checked_mul(seconds)?)?;
        matched = true;
        rest = &rest[captures[0].len()..];
    }

    matched.then_some((total, rest))
}

fn residual(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl TimeExpression for UserFriendlyTime {
    fn parse(&self, text: &str, now: DateTime<Utc>) -> Result<ParsedTime> {
        let text = text.trim();

        let (first, after_first) = text
            .split_once(char::is_whitespace)
            .unwrap_or((text, ""));
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(first) {
            return Ok(ParsedTime {
                when: timestamp.with_timezone(&Utc),
                residual: residual(after_first),
            });
        }

        let (relative, body) = match text.get(..3) {
            Some(head) if head.eq_ignore_ascii_case("in ") => (true, text[3..].trim_start()),
            _ => (false, text),
        };

        match take_duration(body) {
            Some((seconds, rest)) => {
                let when = Duration::try_seconds(seconds)
                    .and_then(|delta| now.checked_add_signed(delta))
                    .ok_or_else(|| ModmailError::UnparseableTime(text.to_string()))?;
                Ok(ParsedTime {
                    when,
                    residual: residual(rest),
                })
            }
            None if relative => Err(ModmailError::UnparseableTime(text.to_string())),
            None => Ok(ParsedTime {
                when: now,
                residual: residual(text),
            }),
        }
    }
}

/// Render the distance to `when` as e.g. `2 hours and 30 minutes`.
pub fn human_timedelta(when: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let total = (when - now).num_seconds().abs();
    if total == 0 {
        return "now".to_string();
    }

    const UNITS: [(&str, i64); 4] = [
        ("day", 86_400),
        ("hour", 3_600),
        ("minute", 60),
        ("second", 1),
    ];

    let mut remaining = total;
    let mut parts = Vec::new();
    for (name, size) in UNITS {
        let count = remaining / size;
        remaining %= size;
        if count > 0 {
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{} {}{}", count, name, plural));
        }
    }

    match parts.len() {
        1 => parts.remove(0),
        _ => {
            let last = parts.pop().unwrap_or_default();
            format!("{} and {}", parts.join(", "), last)
        }
    }
}

//! Log Paginator - previous threads of a user, grouped by day.
//!
//! A single forward pass over the archive (oldest first): closed logs are
//! grouped per calendar day, and day groups are packed into pages of at most
//! [`MAX_FIELDS_PER_PAGE`] groups.

use chrono::{DateTime, Utc};

use crate::error::{ModmailError, Result};
use crate::models::{DayGroup, LogPage, LogRecord};

pub const MAX_FIELDS_PER_PAGE: usize = 3;

const SNIPPET_LIMIT: usize = 50;
const SNIPPET_KEEP: usize = 47;
const NO_CONTENT: &str = "No content";

/// Presentation inputs for [`paginate_logs`].
#[derive(Debug, Clone)]
pub struct LogPageContext {
    pub username: String,
    pub icon_url: String,
    /// Viewer base URL, without trailing slash
    pub log_base_url: String,
    /// Self-hosted viewers address logs by key only
    pub selfhosted: bool,
}

impl LogPageContext {
    fn log_url(&self, record: &LogRecord) -> String {
        if self.selfhosted {
            format!("{}/logs/{}", self.log_base_url, record.key)
        } else {
            let user = record
                .user_id
                .map(|id| id.to_string())
                .unwrap_or_default();
            format!("{}/{}/{}", self.log_base_url, user, record.key)
        }
    }
}

/// Shorten a first message to a one-line preview.
pub fn truncate_snippet(content: &str) -> String {
    if content.chars().count() > SNIPPET_LIMIT {
        let kept: String = content.chars().take(SNIPPET_KEEP).collect();
        format!("{}...", kept.trim_end())
    } else if content.is_empty() {
        NO_CONTENT.to_string()
    } else {
        content.to_string()
    }
}

fn day_label(at: &DateTime<Utc>) -> String {
    at.format("%d %b %Y").to_string()
}

fn format_line(record: &LogRecord, ctx: &LogPageContext) -> String {
    let snippet = truncate_snippet(record.first_message.as_deref().unwrap_or_default());
    format!(
        "[`[{}][closed-by:{}]`]({}) - {}",
        record.created_at.format("%H:%M"),
        record.closer_name,
        ctx.log_url(record),
        snippet
    )
}

/// Group the closed logs of a user into display pages.
///
/// `records` must be sorted by `created_at`, oldest first. Fails with
/// [`ModmailError::NoLogs`] when no record is closed.
pub fn paginate_logs(records: &[LogRecord], ctx: &LogPageContext) -> Result<Vec<LogPage>> {
    let closed: Vec<&LogRecord> = records.iter().filter(|record| !record.open).collect();
    if closed.is_empty() {
        return Err(ModmailError::NoLogs);
    }

    let mut groups: Vec<DayGroup> = Vec::new();
    for record in closed {
        let label = day_label(&record.created_at);
        let line = format_line(record, ctx);
        match groups.last_mut() {
            Some(current) if current.day_label == label => current.lines.push(line),
            _ => groups.push(DayGroup {
                day_label: label,
                lines: vec![line],
            }),
        }
    }

    let pages = groups
        .chunks(MAX_FIELDS_PER_PAGE)
        .enumerate()
        .map(|(index, fields)| LogPage {
            author_name: if index == 0 {
                format!("{} - Previous Logs", ctx.username)
            } else {
                "Previous Logs".to_string()
            },
            icon_url: ctx.icon_url.clone(),
            fields: fields.to_vec(),
        })
        .collect();

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ctx() -> LogPageContext {
        LogPageContext {
            username: "alice#0001".to_string(),
            icon_url: "https://cdn.example/alice.png".to_string(),
            log_base_url: "https://logs.modmail.tk".to_string(),
            selfhosted: false,
        }
    }

    fn record(key: &str, day: u32, hour: u32, open: bool) -> LogRecord {
        LogRecord {
            key: key.to_string(),
            user_id: Some(42),
            created_at: Utc.with_ymd_and_hms(2024, 5, day, hour, 15, 0).unwrap(),
            closer_name: "mod".to_string(),
            first_message: Some(format!("help with {}", key)),
            open,
        }
    }

    #[test]
    fn test_truncate_long_snippet() {
        let content = "a".repeat(60);
        let snippet = truncate_snippet(&content);
        assert_eq!(snippet, format!("{}...", "a".repeat(47)));
    }

    #[test]
    fn test_short_snippet_unchanged() {
        let content = "b".repeat(40);
        assert_eq!(truncate_snippet(&content), content);
        assert_eq!(truncate_snippet(&"c".repeat(50)), "c".repeat(50));
    }

    #[test]
    fn test_truncate_strips_trailing_whitespace() {
        let content = format!("{}{}", "x".repeat(45), " ".repeat(10));
        assert_eq!(truncate_snippet(&content), format!("{}...", "x".repeat(45)));
    }

    #[test]
    fn test_empty_snippet() {
        assert_eq!(truncate_snippet(""), "No content");
    }

    #[test]
    fn test_no_closed_logs() {
        let records = vec![record("k1", 1, 9, true)];
        assert!(matches!(
            paginate_logs(&records, &ctx()),
            Err(ModmailError::NoLogs)
        ));
        assert!(matches!(paginate_logs(&[], &ctx()), Err(ModmailError::NoLogs)));
    }

    #[test]
    fn test_groups_by_day() {
        let mut records = Vec::new();
        for hour in 0..4 {
            records.push(record(&format!("a{}", hour), 1, 8 + hour, false));
        }
        for hour in 0..3 {
            records.push(record(&format!("b{}", hour), 2, 8 + hour, false));
        }

        let pages = paginate_logs(&records, &ctx()).unwrap();
        assert_eq!(pages.len(), 1);
        let fields = &pages[0].fields;
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].day_label, "01 May 2024");
        assert_eq!(fields[0].lines.len(), 4);
        assert_eq!(fields[1].day_label, "02 May 2024");
        assert_eq!(fields[1].lines.len(), 3);
    }

    #[test]
    fn test_open_logs_are_skipped() {
        let records = vec![
            record("a", 1, 8, false),
            record("b", 1, 9, true),
            record("c", 2, 9, false),
        ];

        let pages = paginate_logs(&records, &ctx()).unwrap();
        let lines: usize = pages[0].fields.iter().map(|f| f.lines.len()).sum();
        assert_eq!(lines, 2);
        assert!(!pages[0].fields[0].value().contains("/b)"));
    }

    #[test]
    fn test_pages_hold_three_days() {
        let records: Vec<LogRecord> = (1..=7)
            .map(|day| record(&format!("d{}", day), day, 10, false))
            .collect();

        let pages = paginate_logs(&records, &ctx()).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].fields.len(), 3);
        assert_eq!(pages[1].fields.len(), 3);
        assert_eq!(pages[2].fields.len(), 1);
        assert_eq!(pages[0].author_name, "alice#0001 - Previous Logs");
        assert_eq!(pages[1].author_name, "Previous Logs");
        assert_eq!(pages[2].icon_url, "https://cdn.example/alice.png");
    }

    #[test]
    fn test_line_format_hosted_and_selfhosted() {
        let records = vec![record("key1", 3, 14, false)];

        let pages = paginate_logs(&records, &ctx()).unwrap();
        assert_eq!(
            pages[0].fields[0].lines[0],
            "[`[14:15][closed-by:mod]`](https://logs.modmail.tk/42/key1) - help with key1"
        );

        let selfhosted = LogPageContext {
            log_base_url: "https://logs.example.com".to_string(),
            selfhosted: true,
            ..ctx()
        };
        let pages = paginate_logs(&records, &selfhosted).unwrap();
        assert!(
            pages[0].fields[0].lines[0].contains("(https://logs.example.com/logs/key1)")
        );
    }

    #[test]
    fn test_missing_first_message() {
        let mut entry = record("k", 3, 14, false);
        entry.first_message = None;

        let pages = paginate_logs(&[entry], &ctx()).unwrap();
        assert!(pages[0].fields[0].lines[0].ends_with(" - No content"));
    }

    #[test]
    fn test_restartable() {
        let records: Vec<LogRecord> = (1..=4)
            .map(|day| record(&format!("d{}", day), day, 10, false))
            .collect();
        assert_eq!(
            paginate_logs(&records, &ctx()).unwrap(),
            paginate_logs(&records, &ctx()).unwrap()
        );
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A past thread as exported by the log archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub key: String,
    #[serde(default)]
    pub user_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub closer_name: String,
    /// Content of the first message of the thread, if it had any.
    #[serde(default)]
    pub first_message: Option<String>,
    pub open: bool,
}

/// All log lines of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayGroup {
    pub day_label: String,
    pub lines: Vec<String>,
}

impl DayGroup {
    /// Field body as displayed: one line per log.
    pub fn value(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPage {
    pub author_name: String,
    pub icon_url: String,
    pub fields: Vec<DayGroup>,
}

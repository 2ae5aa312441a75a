use serde::{Deserialize, Serialize};
use std::fmt;

/// Which per-thread mention list an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionSet {
    /// Pinged on the next inbound message only.
    Notify,
    /// Pinged on every inbound message until unsubscribed.
    Subscribe,
}

impl MentionSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notify => "notify",
            Self::Subscribe => "subscribe",
        }
    }
}

impl fmt::Display for MentionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque mention token: `<@id>`, `<@&role>`, `@here` or `@everyone`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MentionEntry(String);

impl MentionEntry {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn user(id: u64) -> Self {
        Self(format!("<@{}>", id))
    }

    pub fn role(id: u64) -> Self {
        Self(format!("<@&{}>", id))
    }

    pub fn here() -> Self {
        Self("@here".to_string())
    }

    pub fn everyone() -> Self {
        Self("@everyone".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MentionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

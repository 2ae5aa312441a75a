//! Reply types produced by the command layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message level for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl MessageLevel {
    /// Get emoji representation for the message level
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Info => "ℹ️",
            Self::Success => "✅",
            Self::Warning => "⚠️",
            Self::Error => "❌",
        }
    }
}

/// Named block of text inside a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Author line of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyAuthor {
    pub name: String,
    pub icon_url: Option<String>,
}

/// Structured reply to a thread channel.
///
/// Carries what the transport needs to render a card; rendering itself is
/// left to the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Channel the reply is addressed to
    pub channel_id: u64,
    /// Message body (markdown)
    pub content: String,
    /// Message level for formatting
    pub level: MessageLevel,
    /// Optional title/header
    pub title: Option<String>,
    pub author: Option<ReplyAuthor>,
    pub fields: Vec<ReplyField>,
    pub footer: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl OutboundMessage {
    /// Create a new outbound message
    pub fn new(channel_id: u64, content: impl Into<String>) -> Self {
        Self {
            channel_id,
            content: content.into(),
            level: MessageLevel::Info,
            title: None,
            author: None,
            fields: Vec::new(),
            footer: None,
            timestamp: None,
        }
    }

    /// Set message level
    pub fn with_level(mut self, level: MessageLevel) -> Self {
        self.level = level;
        self
    }

    /// Set title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(ReplyAuthor {
            name: name.into(),
            icon_url,
        });
        self
    }

    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(ReplyField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Create a success message
    pub fn success(channel_id: u64, content: impl Into<String>) -> Self {
        Self::new(channel_id, content).with_level(MessageLevel::Success)
    }

    /// Create an error message
    pub fn error(channel_id: u64, content: impl Into<String>) -> Self {
        Self::new(channel_id, content).with_level(MessageLevel::Error)
    }

    /// Create a warning message
    pub fn warning(channel_id: u64, content: impl Into<String>) -> Self {
        Self::new(channel_id, content).with_level(MessageLevel::Warning)
    }

    /// Format the message as plain text with an emoji prefix based on level
    pub fn formatted_content(&self) -> String {
        let emoji = self.level.emoji();
        let mut out = match &self.title {
            Some(title) => format!("{} *{}*\n\n{}", emoji, title, self.content),
            None => format!("{} {}", emoji, self.content),
        };
        if let Some(author) = &self.author {
            out = format!("{}\n{}", author.name, out);
        }
        for field in &self.fields {
            out.push_str(&format!("\n\n*{}*\n{}", field.name, field.value));
        }
        if let Some(footer) = &self.footer {
            out.push_str(&format!("\n\n_{}_", footer));
        }
        out
    }
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// A single reply.
    Reply(OutboundMessage),
    /// Replies meant to be browsed one page at a time.
    Paginated(Vec<OutboundMessage>),
    /// The command message should be marked as done.
    Acknowledged,
    /// Nothing to show; the effect is visible elsewhere.
    Silent,
}

impl CommandOutcome {
    /// All replies carried by this outcome.
    pub fn messages(&self) -> Vec<&OutboundMessage> {
        match self {
            Self::Reply(message) => vec![message],
            Self::Paginated(pages) => pages.iter().collect(),
            Self::Acknowledged | Self::Silent => Vec::new(),
        }
    }

    /// Level of the first reply, if any.
    pub fn level(&self) -> Option<MessageLevel> {
        self.messages().first().map(|message| message.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_level_emoji() {
        assert_eq!(MessageLevel::Info.emoji(), "ℹ️");
        assert_eq!(MessageLevel::Success.emoji(), "✅");
        assert_eq!(MessageLevel::Warning.emoji(), "⚠️");
        assert_eq!(MessageLevel::Error.emoji(), "❌");
    }

    #[test]
    fn test_outbound_message_formatting() {
        let msg = OutboundMessage::success(7, "Thread closes in 5 minutes")
            .with_title("Scheduled close")
            .with_field("Message", "Thanks!", false)
            .with_footer("Closing will be cancelled if a thread message is sent.");
        let formatted = msg.formatted_content();
        assert!(formatted.contains("✅"));
        assert!(formatted.contains("*Scheduled close*"));
        assert!(formatted.contains("*Message*\nThanks!"));
        assert!(formatted.ends_with("_Closing will be cancelled if a thread message is sent._"));
    }

    #[test]
    fn test_outcome_messages() {
        let pages = CommandOutcome::Paginated(vec![
            OutboundMessage::new(1, "a"),
            OutboundMessage::new(1, "b"),
        ]);
        assert_eq!(pages.messages().len(), 2);
        assert!(CommandOutcome::Acknowledged.messages().is_empty());
        assert_eq!(
            CommandOutcome::Reply(OutboundMessage::error(1, "x")).level(),
            Some(MessageLevel::Error)
        );
    }
}

use serde::{Deserialize, Serialize};

/// The parts of a message embed used to link relayed messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedMeta {
    /// Author link; its last path segment is the id of the mirrored message.
    pub author_url: Option<String>,
    pub footer_text: Option<String>,
}

/// A message from a thread channel's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub id: u64,
    pub author_id: u64,
    pub content: String,
    #[serde(default)]
    pub embeds: Vec<EmbedMeta>,
}

impl ChannelMessage {
    pub fn new(id: u64, author_id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            author_id,
            content: content.into(),
            embeds: Vec::new(),
        }
    }

    pub fn with_embed(mut self, embed: EmbedMeta) -> Self {
        self.embeds.push(embed);
        self
    }
}

//! User references as they appear in command arguments.

use serde::{Deserialize, Serialize};

/// Avatar shown for users whose avatar is unknown.
pub const DEFAULT_AVATAR_URL: &str = "https://cdn.discordapp.com/embed/avatars/0.png";

/// A user argument after resolution.
///
/// Guild members and plain users carry profile data; a raw id is all that is
/// known about users the bot cannot see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRef {
    Member {
        id: u64,
        name: String,
        discriminator: Option<String>,
        nick: Option<String>,
        avatar_url: Option<String>,
    },
    User {
        id: u64,
        name: String,
        discriminator: Option<String>,
        avatar_url: Option<String>,
    },
    RawId(u64),
}

impl UserRef {
    /// Build a plain user without avatar or discriminator.
    pub fn user(id: u64, name: impl Into<String>) -> Self {
        Self::User {
            id,
            name: name.into(),
            discriminator: None,
            avatar_url: None,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Self::Member { id, .. } | Self::User { id, .. } => *id,
            Self::RawId(id) => *id,
        }
    }

    /// Name shown in headers: nickname, then `name#discriminator`, then id.
    pub fn display_name(&self) -> String {
        match self {
            Self::Member {
                nick: Some(nick), ..
            } => nick.clone(),
            Self::Member {
                name,
                discriminator,
                ..
            }
            | Self::User {
                name,
                discriminator,
                ..
            } => match discriminator {
                Some(disc) => format!("{}#{}", name, disc),
                None => name.clone(),
            },
            Self::RawId(id) => id.to_string(),
        }
    }

    pub fn icon_url(&self) -> &str {
        match self {
            Self::Member { avatar_url, .. } | Self::User { avatar_url, .. } => {
                avatar_url.as_deref().unwrap_or(DEFAULT_AVATAR_URL)
            }
            Self::RawId(_) => DEFAULT_AVATAR_URL,
        }
    }

    /// Mention token; unresolved ids are rendered as code.
    pub fn mention(&self) -> String {
        match self {
            Self::RawId(id) => format!("`{}`", id),
            other => format!("<@{}>", other.id()),
        }
    }
}

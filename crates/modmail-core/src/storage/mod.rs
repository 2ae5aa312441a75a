//! Typed storage wrappers over `modmail_storage`.

mod blocked;
mod mention;
mod snippet;

pub use blocked::BlockedUserStorage;
pub use mention::MentionSetStorage;
pub use snippet::SnippetStorage;

use anyhow::Result;
use modmail_storage::ConfigStorage;
use std::path::Path;

/// Typed view of the modmail database.
#[derive(Clone)]
pub struct Storage {
    pub config: ConfigStorage,
    pub mentions: MentionSetStorage,
    pub blocked: BlockedUserStorage,
    pub snippets: SnippetStorage,
}

impl Storage {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_raw(modmail_storage::Storage::new(path)?))
    }

    pub fn from_raw(inner: modmail_storage::Storage) -> Self {
        Self {
            config: inner.config,
            mentions: MentionSetStorage::new(inner.mentions),
            blocked: BlockedUserStorage::new(inner.blocked),
            snippets: SnippetStorage::new(inner.snippets),
        }
    }
}

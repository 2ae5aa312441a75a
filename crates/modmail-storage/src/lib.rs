//! Modmail Storage - Low-level storage abstraction layer
//!
//! This crate provides the persistence layer for the modmail bot, using redb
//! as the embedded database. It exposes byte-level APIs; typed wrappers live
//! in modmail-core next to the models they persist.
//!
//! # Tables
//!
//! - `system_config` - Bot configuration
//! - `thread_mentions` - Per-thread notify/subscribe sets
//! - `blocked_users` - Users barred from opening threads
//! - `snippets` - Canned replies

pub mod blocked;
pub mod config;
pub mod mention;
pub mod snippet;

mod keyed_table;

use anyhow::Result;
use redb::Database;
use std::path::Path;
use std::sync::Arc;

pub use blocked::BlockedStorage;
pub use config::{BotConfig, ConfigStorage};
pub use mention::MentionStorage;
pub use keyed_table::{KeyedTable, RawTable};
pub use snippet::SnippetStorage;

/// Central storage manager that initializes all storage subsystems
#[derive(Clone)]
pub struct Storage {
    pub config: ConfigStorage,
    pub mentions: MentionStorage,
    pub blocked: BlockedStorage,
    pub snippets: SnippetStorage,
}

impl Storage {
    /// Create a new storage instance at the given path.
    ///
    /// This will create the database file if it doesn't exist and initialize
    /// all required tables.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let db = Arc::new(Database::create(path.as_ref())?);
        tracing::debug!(path = %path.as_ref().display(), "Opened modmail database");
        Self::from_db(db)
    }

    /// Build the storage subsystems on top of an already opened database.
    pub fn from_db(db: Arc<Database>) -> Result<Self> {
        let config = ConfigStorage::new(db.clone())?;
        let mentions = MentionStorage::new(db.clone())?;
        let blocked = BlockedStorage::new(db.clone())?;
        let snippets = SnippetStorage::new(db)?;

        Ok(Self {
            config,
            mentions,
            blocked,
            snippets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyedTable;
    use tempfile::tempdir;

    #[test]
    fn test_storage_reopen_keeps_data() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("modmail.db");

        {
            let storage = Storage::new(&db_path).unwrap();
            storage.snippets.put_raw("hi", b"Hello there!").unwrap();
            storage.config.set_prefix("!").unwrap();
        }

        let storage = Storage::new(&db_path).unwrap();
        assert_eq!(
            storage.snippets.get_raw("hi").unwrap(),
            Some(b"Hello there!".to_vec())
        );
        assert_eq!(storage.config.load().unwrap().prefix, "!");
    }
}

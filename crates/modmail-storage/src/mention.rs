//! Mention set storage - byte-level API for per-thread mention lists.
//!
//! Holds the `notify` and `subscribe` sets of every open thread.

use crate::define_keyed_table;

define_keyed_table! {
    /// Low-level mention set storage with byte-level API.
    ///
    /// Key format is defined by the modmail-core wrapper and should be stable:
    /// `{set}:{thread_id}`. Values are JSON arrays of mention tokens.
    pub struct MentionStorage { table: "thread_mentions" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyedTable;
    use redb::Database;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_put_get_delete_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let storage = MentionStorage::new(db).unwrap();

        let key = "subscribe:42";
        let value = br#"["<@1>","@here"]"#;
        storage.put_raw(key, value).unwrap();

        let fetched = storage.get_raw(key).unwrap().unwrap();
        assert_eq!(fetched, value);

        let deleted = storage.delete(key).unwrap();
        assert!(deleted);
        assert!(storage.get_raw(key).unwrap().is_none());
    }

    #[test]
    fn test_scan_prefix() {
        let temp_dir = tempdir().unwrap();
        let db = Arc::new(Database::create(temp_dir.path().join("test.db")).unwrap());
        let storage = MentionStorage::new(db).unwrap();

        storage.put_raw("notify:1", b"[]").unwrap();
        storage.put_raw("subscribe:1", b"[]").unwrap();
        storage.put_raw("subscribe:2", b"[]").unwrap();

        let subscribed = storage.scan_prefix_raw("subscribe:").unwrap();
        assert_eq!(subscribed.len(), 2);
        assert_eq!(storage.list_raw().unwrap().len(), 3);
    }
}

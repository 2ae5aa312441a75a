//! Typed mention set storage wrapper.

use anyhow::Result;
use modmail_storage::KeyedTable;

use crate::models::{MentionEntry, MentionSet};

#[derive(Debug, Clone)]
pub struct MentionSetStorage {
    inner: modmail_storage::MentionStorage,
}

impl MentionSetStorage {
    pub fn new(inner: modmail_storage::MentionStorage) -> Self {
        Self { inner }
    }

    /// Entries of one set, in insertion order.
    pub fn get(&self, set: MentionSet, thread_id: u64) -> Result<Vec<MentionEntry>> {
        match self.inner.get_raw(&set_key(set, thread_id))? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replace one set; an empty list removes the key.
    pub fn put(&self, set: MentionSet, thread_id: u64, entries: &[MentionEntry]) -> Result<()> {
        let key = set_key(set, thread_id);
        if entries.is_empty() {
            self.inner.delete(&key)?;
            return Ok(());
        }
        let payload = serde_json::to_vec(entries)?;
        self.inner.put_raw(&key, &payload)
    }

    /// Thread ids that have a non-empty set of the given kind.
    pub fn threads(&self, set: MentionSet) -> Result<Vec<u64>> {
        let prefix = format!("{}:", set.as_str());
        let mut ids = Vec::new();
        for (key, _) in self.inner.scan_prefix_raw(&prefix)? {
            if let Ok(id) = key[prefix.len()..].parse() {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}

fn set_key(set: MentionSet, thread_id: u64) -> String {
    format!("{}:{}", set.as_str(), thread_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use redb::Database;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_sets_are_independent() {
        let temp_dir = tempdir().unwrap();
        let db = Arc::new(Database::create(temp_dir.path().join("test.db")).unwrap());
        let storage =
            MentionSetStorage::new(modmail_storage::MentionStorage::new(db).unwrap());

        storage
            .put(MentionSet::Notify, 5, &[MentionEntry::user(1)])
            .unwrap();
        storage
            .put(MentionSet::Subscribe, 5, &[MentionEntry::here(), MentionEntry::user(2)])
            .unwrap();

        assert_eq!(
            storage.get(MentionSet::Notify, 5).unwrap(),
            vec![MentionEntry::user(1)]
        );
        assert_eq!(
            storage.get(MentionSet::Subscribe, 5).unwrap(),
            vec![MentionEntry::here(), MentionEntry::user(2)]
        );
        assert_eq!(storage.threads(MentionSet::Subscribe).unwrap(), vec![5]);

        storage.put(MentionSet::Notify, 5, &[]).unwrap();
        assert!(storage.get(MentionSet::Notify, 5).unwrap().is_empty());
        assert!(storage.threads(MentionSet::Notify).unwrap().is_empty());
    }
}

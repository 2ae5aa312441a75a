//! Typed blocked user storage wrapper.

use anyhow::Result;
use modmail_storage::KeyedTable;

use crate::models::BlockEntry;

#[derive(Debug, Clone)]
pub struct BlockedUserStorage {
    inner: modmail_storage::BlockedStorage,
}

impl BlockedUserStorage {
    pub fn new(inner: modmail_storage::BlockedStorage) -> Self {
        Self { inner }
    }

    pub fn get(&self, user_id: u64) -> Result<Option<BlockEntry>> {
        match self.inner.get_raw(&user_id.to_string())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Store `entry` unless the user is already present. Returns false if so.
    pub fn insert_new(&self, entry: &BlockEntry) -> Result<bool> {
        let payload = serde_json::to_vec(entry)?;
        self.inner.insert_new_raw(&entry.user_id.to_string(), &payload)
    }

    pub fn remove(&self, user_id: u64) -> Result<bool> {
        self.inner.delete(&user_id.to_string())
    }

    pub fn list(&self) -> Result<Vec<BlockEntry>> {
        let mut out = Vec::new();
        for (_key, bytes) in self.inner.list_raw()? {
            let entry: BlockEntry = serde_json::from_slice(&bytes)?;
            out.push(entry);
        }
        out.sort_by_key(|entry| entry.user_id);
        Ok(out)
    }
}

//! Users whose direct messages are not relayed into threads.

use tracing::info;

use crate::error::{ModmailError, Result};
use crate::models::{BlockEntry, UserRef};
use crate::storage::BlockedUserStorage;

pub struct Blocklist {
    storage: BlockedUserStorage,
}

impl Blocklist {
    pub fn new(storage: BlockedUserStorage) -> Self {
        Self { storage }
    }

    /// Check and insert happen in one write transaction, so concurrent calls
    /// for the same user report success once.
    pub fn block(&self, user: &UserRef, reason: Option<String>) -> Result<BlockEntry> {
        let entry = BlockEntry {
            user_id: user.id(),
            reason,
        };
        if !self.storage.insert_new(&entry)? {
            return Err(ModmailError::AlreadyBlocked(user.mention()));
        }
        info!(user_id = entry.user_id, "User blocked");
        Ok(entry)
    }

    pub fn unblock(&self, user: &UserRef) -> Result<BlockEntry> {
        let Some(entry) = self.storage.get(user.id())? else {
            return Err(ModmailError::NotBlocked(user.mention()));
        };

        if !self.storage.remove(user.id())? {
            return Err(ModmailError::NotBlocked(user.mention()));
        }
        info!(user_id = entry.user_id, "User unblocked");
        Ok(entry)
    }

    pub fn is_blocked(&self, user_id: u64) -> Result<bool> {
        Ok(self.storage.get(user_id)?.is_some())
    }

    /// Blocked users ordered by id.
    pub fn list(&self) -> Result<Vec<BlockEntry>> {
        Ok(self.storage.list()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use tempfile::tempdir;

    fn blocklist() -> (Blocklist, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let storage = Storage::new(temp_dir.path().join("test.db")).unwrap();
        (Blocklist::new(storage.blocked.clone()), temp_dir)
    }

    #[test]
    fn test_block_twice() {
        let (blocklist, _temp_dir) = blocklist();
        let user = UserRef::user(8, "spammer");

        let entry = blocklist.block(&user, Some("spam".to_string())).unwrap();
        assert_eq!(entry.reason.as_deref(), Some("spam"));
        assert!(blocklist.is_blocked(8).unwrap());

        let err = blocklist.block(&user, None).unwrap_err();
        assert!(matches!(err, ModmailError::AlreadyBlocked(who) if who == "<@8>"));
    }

    #[test]
    fn test_concurrent_block_succeeds_once() {
        let (blocklist, _temp_dir) = blocklist();
        let user = UserRef::user(8, "spammer");

        let successes = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| blocklist.block(&user, None).is_ok()))
                .collect();
            handles
                .into_iter()
                .filter_map(|handle| handle.join().ok())
                .filter(|blocked| *blocked)
                .count()
        });
        assert_eq!(successes, 1);
    }

    #[test]
    fn test_unblock() {
        let (blocklist, _temp_dir) = blocklist();
        let user = UserRef::RawId(9);

        let err = blocklist.unblock(&user).unwrap_err();
        assert!(matches!(err, ModmailError::NotBlocked(who) if who == "`9`"));

        blocklist.block(&user, None).unwrap();
        blocklist.unblock(&user).unwrap();
        assert!(!blocklist.is_blocked(9).unwrap());
    }

    #[test]
    fn test_list_sorted() {
        let (blocklist, _temp_dir) = blocklist();
        for id in [30, 4, 12] {
            blocklist.block(&UserRef::RawId(id), None).unwrap();
        }

        let ids: Vec<u64> = blocklist
            .list()
            .unwrap()
            .iter()
            .map(|e| e.user_id)
            .collect();
        assert_eq!(ids, vec![4, 12, 30]);
    }
}

pub mod backref;
pub mod channel;
pub mod error;
pub mod logs;
pub mod mention;
pub mod models;
pub mod moderation;
pub mod paths;
pub mod runtime;
pub mod scheduler;
pub mod storage;
pub mod time;

#[cfg(any(test, feature = "test-utils"))]
pub mod testkit;

pub use error::{ModmailError, Result};
pub use models::*;
pub use runtime::{Collaborators, CommandDispatcher};

use std::path::Path;
use std::sync::Arc;
use storage::Storage;
use tracing::{info, warn};

/// Opened modmail database shared by the bot and the admin CLI.
pub struct ModmailCore {
    pub storage: Arc<Storage>,
}

impl ModmailCore {
    pub fn open(db_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let db_path = db_path.as_ref();
        let storage = Arc::new(Storage::new(db_path)?);

        let config = storage.config.load()?;
        if let Err(e) = config.validate() {
            warn!("Stored bot config is invalid: {}", e);
        }

        info!("Opened modmail database at {}", db_path.display());
        Ok(Self { storage })
    }

    /// Build a command dispatcher over this database.
    pub fn dispatcher(&self, collaborators: Collaborators) -> CommandDispatcher {
        CommandDispatcher::new(&self.storage, collaborators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::CommandOutcome;
    use crate::testkit::{
        MockLogArchive, MockMessageHistory, MockRoleResolver, MockThreadRegistry,
        MockUserDirectory,
    };
    use crate::time::UserFriendlyTime;

    #[tokio::test]
    async fn test_open_and_dispatch() {
        let temp_dir = tempfile::tempdir().unwrap();
        let core = ModmailCore::open(temp_dir.path().join("modmail.db")).unwrap();

        let dispatcher = core.dispatcher(Collaborators {
            threads: Arc::new(MockThreadRegistry::new()),
            roles: Arc::new(MockRoleResolver::new()),
            users: Arc::new(MockUserDirectory::new()),
            logs: Arc::new(MockLogArchive::new()),
            history: Arc::new(MockMessageHistory::new()),
            time: Arc::new(UserFriendlyTime),
        });

        let outcome = dispatcher
            .handle(1, &UserRef::user(2, "mod"), "?snippets add hi Hello")
            .await
            .unwrap();
        assert!(matches!(outcome, CommandOutcome::Reply(_)));
        assert_eq!(core.storage.snippets.list().unwrap().len(), 1);
    }
}

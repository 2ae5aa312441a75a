//! Mention Registry - who gets pinged when a thread receives a message.
//!
//! Each thread has two ordered sets of mention tokens. `notify` entries are
//! pinged once, on the next inbound message; `subscribe` entries are pinged on
//! every inbound message until removed. Mutations go through one async lock,
//! so every read-modify-write of a set is atomic.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::channel::RoleResolver;
use crate::error::{ModmailError, Result};
use crate::models::{MentionEntry, MentionSet, UserRef};
use crate::scheduler::CloseListener;
use crate::storage::MentionSetStorage;

/// Outcome of [`MentionRegistry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Outcome of [`MentionRegistry::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotPresent,
}

/// Resolve the mention a `notify`/`subscribe` argument refers to.
///
/// No argument means the invoking moderator; `here` and `everyone` map to the
/// broadcast tokens; anything else must name a role.
pub async fn resolve_mention(
    raw_role_arg: Option<&str>,
    default_actor: &UserRef,
    roles: &dyn RoleResolver,
) -> Result<MentionEntry> {
    let argument = match raw_role_arg.map(str::trim) {
        None | Some("") => return Ok(MentionEntry::user(default_actor.id())),
        Some(argument) => argument,
    };

    if argument.eq_ignore_ascii_case("here") {
        return Ok(MentionEntry::here());
    }
    if argument.eq_ignore_ascii_case("everyone") {
        return Ok(MentionEntry::everyone());
    }

    roles
        .resolve_role(argument)
        .await?
        .ok_or_else(|| ModmailError::RoleNotFound(argument.to_string()))
}

pub struct MentionRegistry {
    storage: MentionSetStorage,
    write_lock: Mutex<()>,
}

impl MentionRegistry {
    pub fn new(storage: MentionSetStorage) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Add `entry` to a set; adding an entry twice is a no-op.
    pub async fn add(
        &self,
        thread_id: u64,
        set: MentionSet,
        entry: MentionEntry,
    ) -> Result<AddOutcome> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.storage.get(set, thread_id)?;
        if entries.contains(&entry) {
            return Ok(AddOutcome::AlreadyPresent);
        }

        debug!("Adding {} to {} set of thread {}", entry, set, thread_id);
        entries.push(entry);
        self.storage.put(set, thread_id, &entries)?;
        Ok(AddOutcome::Added)
    }

    pub async fn remove(
        &self,
        thread_id: u64,
        set: MentionSet,
        entry: &MentionEntry,
    ) -> Result<RemoveOutcome> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.storage.get(set, thread_id)?;
        let Some(position) = entries.iter().position(|e| e == entry) else {
            return Ok(RemoveOutcome::NotPresent);
        };

        debug!("Removing {} from {} set of thread {}", entry, set, thread_id);
        entries.remove(position);
        self.storage.put(set, thread_id, &entries)?;
        Ok(RemoveOutcome::Removed)
    }

    pub async fn list(&self, thread_id: u64, set: MentionSet) -> Result<Vec<MentionEntry>> {
        Ok(self.storage.get(set, thread_id)?)
    }

    /// Mentions to ping for an inbound message, consuming the notify set.
    ///
    /// Subscribers come first, followed by one-shot entries that are not
    /// also subscribed.
    pub async fn take_inbound_mentions(&self, thread_id: u64) -> Result<Vec<MentionEntry>> {
        let _guard = self.write_lock.lock().await;
        let mut mentions = self.storage.get(MentionSet::Subscribe, thread_id)?;
        let notify = self.storage.get(MentionSet::Notify, thread_id)?;

        if !notify.is_empty() {
            self.storage.put(MentionSet::Notify, thread_id, &[])?;
        }
        for entry in notify {
            if !mentions.contains(&entry) {
                mentions.push(entry);
            }
        }
        Ok(mentions)
    }

    /// Forget both sets of a thread.
    pub async fn clear_thread(&self, thread_id: u64) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.storage.put(MentionSet::Notify, thread_id, &[])?;
        self.storage.put(MentionSet::Subscribe, thread_id, &[])?;
        Ok(())
    }
}

/// Closed threads take their mention sets with them.
#[async_trait]
impl CloseListener for MentionRegistry {
    async fn thread_closed(&self, thread_id: u64) {
        if let Err(e) = self.clear_thread(thread_id).await {
            warn!("Failed to clear mentions of closed thread {}: {}", thread_id, e);
        }
    }
}

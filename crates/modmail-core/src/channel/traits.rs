//! Collaborator Trait Definitions
//!
//! The command layer reaches the chat platform and the log archive only
//! through these traits, so the transport can be swapped or mocked.

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::models::{ChannelMessage, CloseRequest, LogRecord, MentionEntry, Thread, UserRef};

/// Owner of the thread objects and their channels.
///
/// # Example
///
/// ```ignore
/// #[async_trait]
/// impl ThreadRegistry for GatewayThreads {
///     async fn find_by_channel(&self, channel_id: u64) -> Result<Option<Thread>> {
///         Ok(self.by_channel.get(&channel_id).cloned())
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait ThreadRegistry: Send + Sync {
    /// Thread bound to the given channel
    async fn find_by_channel(&self, channel_id: u64) -> Result<Option<Thread>>;

    /// Open thread of the given recipient
    async fn find_by_recipient(&self, user_id: u64) -> Result<Option<Thread>>;

    /// Open a new thread with `recipient`, started by `creator`
    async fn create(&self, recipient: &UserRef, creator: &UserRef) -> Result<Thread>;

    /// Close a thread now
    async fn close(&self, thread_id: u64, request: CloseRequest) -> Result<()>;

    /// Relay a moderator reply to the recipient
    async fn reply(&self, thread_id: u64, author: &UserRef, content: &str) -> Result<()>;

    /// Edit a relayed message, identified by the id of the recipient-side copy
    async fn edit_message(&self, thread_id: u64, linked_message_id: &str, content: &str)
    -> Result<()>;
}

/// Role lookup by id, mention or name.
#[async_trait]
pub trait RoleResolver: Send + Sync {
    async fn resolve_role(&self, argument: &str) -> Result<Option<MentionEntry>>;
}

/// User lookup for command arguments.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a mention, id or name to a member or user
    async fn resolve_user(&self, argument: &str) -> Result<Option<UserRef>>;

    /// Look up a user by id
    async fn get_user(&self, user_id: u64) -> Result<Option<UserRef>>;
}

/// Archive of past threads.
#[async_trait]
pub trait LogArchive: Send + Sync {
    /// Logs of a user, oldest first
    async fn get_user_logs(&self, user_id: u64) -> Result<Vec<LogRecord>>;
}

/// Channel history access.
pub trait MessageHistory: Send + Sync {
    /// Messages of a channel, newest first, at most `limit` of them.
    ///
    /// The stream is consumed lazily so callers can stop early.
    fn history(&self, channel_id: u64, limit: usize) -> BoxStream<'_, ChannelMessage>;
}

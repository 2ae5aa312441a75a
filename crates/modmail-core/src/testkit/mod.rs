//! In-memory collaborators for tests.
//!
//! Enabled under `cfg(test)` and by the `test-utils` feature for downstream
//! integration tests.

use anyhow::Result;
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::channel::{LogArchive, MessageHistory, RoleResolver, ThreadRegistry, UserDirectory};
use crate::models::{ChannelMessage, CloseRequest, LogRecord, MentionEntry, Thread, UserRef};

/// Thread registry that records every call.
pub struct MockThreadRegistry {
    threads: Arc<Mutex<Vec<Thread>>>,
    next_id: AtomicU64,
    pub closed: Arc<Mutex<Vec<(u64, CloseRequest)>>>,
    pub replies: Arc<Mutex<Vec<(u64, u64, String)>>>,
    pub edits: Arc<Mutex<Vec<(u64, String, String)>>>,
}

impl MockThreadRegistry {
    pub fn new() -> Self {
        Self {
            threads: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1_000),
            closed: Arc::new(Mutex::new(Vec::new())),
            replies: Arc::new(Mutex::new(Vec::new())),
            edits: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn add_thread(&self, thread: Thread) {
        self.threads.lock().await.push(thread);
    }

    pub async fn close_count(&self, thread_id: u64) -> usize {
        self.closed
            .lock()
            .await
            .iter()
            .filter(|(id, _)| *id == thread_id)
            .count()
    }

    pub async fn thread_count(&self) -> usize {
        self.threads.lock().await.len()
    }
}

impl Default for MockThreadRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ThreadRegistry for MockThreadRegistry {
    async fn find_by_channel(&self, channel_id: u64) -> Result<Option<Thread>> {
        let threads = self.threads.lock().await;
        Ok(threads.iter().find(|t| t.channel_id == channel_id).cloned())
    }

    async fn find_by_recipient(&self, user_id: u64) -> Result<Option<Thread>> {
        let threads = self.threads.lock().await;
        Ok(threads.iter().find(|t| t.recipient.id() == user_id).cloned())
    }

    async fn create(&self, recipient: &UserRef, _creator: &UserRef) -> Result<Thread> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let thread = Thread::new(id, id + 1, recipient.clone());
        self.threads.lock().await.push(thread.clone());
        Ok(thread)
    }

    async fn close(&self, thread_id: u64, request: CloseRequest) -> Result<()> {
        self.closed.lock().await.push((thread_id, request));
        self.threads.lock().await.retain(|t| t.id != thread_id);
        Ok(())
    }

    async fn reply(&self, thread_id: u64, author: &UserRef, content: &str) -> Result<()> {
        self.replies
            .lock()
            .await
            .push((thread_id, author.id(), content.to_string()));
        Ok(())
    }

    async fn edit_message(
        &self,
        thread_id: u64,
        linked_message_id: &str,
        content: &str,
    ) -> Result<()> {
        self.edits.lock().await.push((
            thread_id,
            linked_message_id.to_string(),
            content.to_string(),
        ));
        Ok(())
    }
}

/// Role lookup over a fixed name -> id table.
#[derive(Default)]
pub struct MockRoleResolver {
    roles: HashMap<String, u64>,
}

impl MockRoleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, name: &str, id: u64) -> Self {
        self.roles.insert(name.to_lowercase(), id);
        self
    }
}

#[async_trait]
impl RoleResolver for MockRoleResolver {
    async fn resolve_role(&self, argument: &str) -> Result<Option<MentionEntry>> {
        let wanted = argument.trim().to_lowercase();
        let found = self.roles.iter().find(|(name, id)| {
            **name == wanted || id.to_string() == wanted || format!("<@&{}>", id) == wanted
        });
        Ok(found.map(|(_, id)| MentionEntry::role(*id)))
    }
}

/// User lookup over a fixed set of users.
#[derive(Default)]
pub struct MockUserDirectory {
    users: Vec<UserRef>,
}

impl MockUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: UserRef) -> Self {
        self.users.push(user);
        self
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn resolve_user(&self, argument: &str) -> Result<Option<UserRef>> {
        let wanted = argument.trim();
        Ok(self
            .users
            .iter()
            .find(|user| {
                user.mention() == wanted
                    || user.id().to_string() == wanted
                    || user.display_name().eq_ignore_ascii_case(wanted)
            })
            .cloned())
    }

    async fn get_user(&self, user_id: u64) -> Result<Option<UserRef>> {
        Ok(self.users.iter().find(|user| user.id() == user_id).cloned())
    }
}

/// Log archive backed by a map of user id to records.
#[derive(Default)]
pub struct MockLogArchive {
    logs: HashMap<u64, Vec<LogRecord>>,
}

impl MockLogArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logs(mut self, user_id: u64, logs: Vec<LogRecord>) -> Self {
        self.logs.insert(user_id, logs);
        self
    }
}

#[async_trait]
impl LogArchive for MockLogArchive {
    async fn get_user_logs(&self, user_id: u64) -> Result<Vec<LogRecord>> {
        Ok(self.logs.get(&user_id).cloned().unwrap_or_default())
    }
}

/// Channel history that counts how many messages were pulled.
#[derive(Default)]
pub struct MockMessageHistory {
    channels: HashMap<u64, Vec<ChannelMessage>>,
    pub pulled: Arc<AtomicUsize>,
}

impl MockMessageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel history, newest message first.
    pub fn with_channel(mut self, channel_id: u64, messages: Vec<ChannelMessage>) -> Self {
        self.channels.insert(channel_id, messages);
        self
    }

    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }
}

impl MessageHistory for MockMessageHistory {
    fn history(&self, channel_id: u64, limit: usize) -> BoxStream<'_, ChannelMessage> {
        let messages = self.channels.get(&channel_id).cloned().unwrap_or_default();
        let pulled = self.pulled.clone();
        futures::stream::iter(messages.into_iter().take(limit))
            .inspect(move |_| {
                pulled.fetch_add(1, Ordering::SeqCst);
            })
            .boxed()
    }
}

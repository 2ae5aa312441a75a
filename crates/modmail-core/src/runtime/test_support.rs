//! Dispatcher wired to in-memory collaborators.

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tempfile::TempDir;

use super::{CommandDispatcher, Collaborators};
use crate::channel::CommandOutcome;
use crate::models::{ChannelMessage, EmbedMeta, LogRecord, Thread, UserRef};
use crate::storage::Storage;
use crate::testkit::{
    MockLogArchive, MockMessageHistory, MockRoleResolver, MockThreadRegistry, MockUserDirectory,
};
use crate::time::UserFriendlyTime;

pub struct Harness {
    pub dispatcher: CommandDispatcher,
    pub storage: Storage,
    pub threads: Arc<MockThreadRegistry>,
    pub history: Arc<MockMessageHistory>,
    pub moderator: UserRef,
    pub recipient: UserRef,
    /// Directory user without an open thread
    pub outsider: UserRef,
    pub thread_id: u64,
    pub thread_channel: u64,
    _temp_dir: TempDir,
}

fn mirrored(id: u64, footer: &str, linked: u64) -> ChannelMessage {
    ChannelMessage::new(id, 1, "").with_embed(EmbedMeta {
        author_url: Some(format!("https://discord.com/users/1/{}", linked)),
        footer_text: Some(footer.to_string()),
    })
}

fn log(key: &str, day: u32, hour: u32, open: bool) -> LogRecord {
    LogRecord {
        key: key.to_string(),
        user_id: Some(42),
        created_at: Utc.with_ymd_and_hms(2024, 6, day, hour, 5, 0).unwrap(),
        closer_name: "mod".to_string(),
        first_message: Some(format!("question {}", key)),
        open,
    }
}

impl Harness {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(temp_dir.path().join("test.db")).unwrap();

        let moderator = UserRef::user(11, "mod");
        let recipient = UserRef::Member {
            id: 42,
            name: "alice".to_string(),
            discriminator: Some("0001".to_string()),
            nick: None,
            avatar_url: Some("https://cdn.example/alice.png".to_string()),
        };
        let outsider = UserRef::user(77, "bob");

        let thread_id = 7;
        let thread_channel = 70;
        let threads = Arc::new(MockThreadRegistry::new());
        threads
            .add_thread(Thread::new(thread_id, thread_channel, recipient.clone()))
            .await;

        let history = Arc::new(MockMessageHistory::new().with_channel(
            thread_channel,
            vec![
                ChannelMessage::new(705, 42, "thanks"),
                mirrored(704, "Moderator", 9004),
                mirrored(703, "Recipient", 9003),
                mirrored(702, "Moderator", 9002),
            ],
        ));

        let logs = MockLogArchive::new().with_logs(
            42,
            vec![
                log("a1", 1, 9, false),
                log("a2", 1, 15, false),
                log("b1", 3, 10, false),
                log("c1", 4, 11, true),
            ],
        );

        let collaborators = Collaborators {
            threads: threads.clone(),
            roles: Arc::new(MockRoleResolver::new().with_role("Support", 500)),
            users: Arc::new(
                MockUserDirectory::new()
                    .with_user(moderator.clone())
                    .with_user(recipient.clone())
                    .with_user(outsider.clone()),
            ),
            logs: Arc::new(logs),
            history: history.clone(),
            time: Arc::new(UserFriendlyTime),
        };

        Self {
            dispatcher: CommandDispatcher::new(&storage, collaborators),
            storage,
            threads,
            history,
            moderator,
            recipient,
            outsider,
            thread_id,
            thread_channel,
            _temp_dir: temp_dir,
        }
    }

    /// Run a command as the moderator.
    pub async fn run(&self, channel_id: u64, content: &str) -> CommandOutcome {
        self.dispatcher
            .handle(channel_id, &self.moderator, content)
            .await
            .unwrap()
    }

    /// Run a command in the thread channel and return the single reply text.
    pub async fn reply_text(&self, content: &str) -> String {
        let outcome = self.run(self.thread_channel, content).await;
        let messages = outcome.messages();
        assert_eq!(messages.len(), 1, "expected one reply to {}", content);
        messages[0].content.clone()
    }
}

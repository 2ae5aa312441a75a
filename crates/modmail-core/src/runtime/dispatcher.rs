//! Command Dispatcher
//!
//! Entry point for moderator commands typed in channels and for inbound
//! recipient activity in thread channels.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::channel::{
    CommandOutcome, LogArchive, MessageHistory, OutboundMessage, RoleResolver, ThreadRegistry,
    UserDirectory,
};
use crate::error::{ModmailError, Result};
use crate::mention::MentionRegistry;
use crate::models::{MentionEntry, Thread, UserRef};
use crate::moderation::{Blocklist, SnippetBook};
use crate::scheduler::ClosureScheduler;
use crate::storage::Storage;
use crate::time::TimeExpression;
use modmail_storage::ConfigStorage;

use super::commands;

/// Platform-side collaborators of the dispatcher.
#[derive(Clone)]
pub struct Collaborators {
    pub threads: Arc<dyn ThreadRegistry>,
    pub roles: Arc<dyn RoleResolver>,
    pub users: Arc<dyn UserDirectory>,
    pub logs: Arc<dyn LogArchive>,
    pub history: Arc<dyn MessageHistory>,
    pub time: Arc<dyn TimeExpression>,
}

/// Invocation of a single command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Channel the command was typed in
    pub channel_id: u64,
    pub author: UserRef,
    /// Prefix in effect for this invocation
    pub prefix: String,
}

pub struct CommandDispatcher {
    pub(super) collaborators: Collaborators,
    pub(super) config: ConfigStorage,
    pub(super) scheduler: ClosureScheduler,
    pub(super) mentions: Arc<MentionRegistry>,
    pub(super) blocklist: Blocklist,
    pub(super) snippets: SnippetBook,
}

impl CommandDispatcher {
    pub fn new(storage: &Storage, collaborators: Collaborators) -> Self {
        let mentions = Arc::new(MentionRegistry::new(storage.mentions.clone()));
        Self {
            scheduler: ClosureScheduler::with_close_listener(
                collaborators.threads.clone(),
                mentions.clone(),
            ),
            mentions,
            blocklist: Blocklist::new(storage.blocked.clone()),
            snippets: SnippetBook::new(storage.snippets.clone()),
            config: storage.config.clone(),
            collaborators,
        }
    }

    pub fn scheduler(&self) -> &ClosureScheduler {
        &self.scheduler
    }

    pub fn mentions(&self) -> &MentionRegistry {
        &self.mentions
    }

    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    /// Handle a message typed by a moderator.
    ///
    /// Messages without the configured prefix are ignored. Expected command
    /// failures come back as error replies; only internal faults are `Err`.
    pub async fn handle(
        &self,
        channel_id: u64,
        author: &UserRef,
        content: &str,
    ) -> Result<CommandOutcome> {
        let prefix = self.config.load()?.prefix;
        let Some(body) = content.strip_prefix(prefix.as_str()) else {
            return Ok(CommandOutcome::Silent);
        };

        let body = body.trim();
        let (command, args) = body
            .split_once(char::is_whitespace)
            .map(|(command, args)| (command, args.trim()))
            .unwrap_or((body, ""));
        let command = command.to_lowercase();
        if command.is_empty() {
            return Ok(CommandOutcome::Silent);
        }

        debug!("Handling command: {} from {}", command, author.id());

        let ctx = CommandContext {
            channel_id,
            author: author.clone(),
            prefix,
        };

        match self.dispatch(&ctx, &command, args).await {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_user_facing() => {
                debug!("Command {} rejected: {}", command, e);
                Ok(CommandOutcome::Reply(OutboundMessage::error(
                    channel_id,
                    e.to_string(),
                )))
            }
            Err(e) => {
                warn!("Command {} failed: {}", command, e);
                Err(e)
            }
        }
    }

    async fn dispatch(
        &self,
        ctx: &CommandContext,
        command: &str,
        args: &str,
    ) -> Result<CommandOutcome> {
        match command {
            "close" => commands::cmd_close(self, ctx, args).await,
            "notify" | "alert" => commands::cmd_notify(self, ctx, args).await,
            "subscribe" | "sub" => commands::cmd_subscribe(self, ctx, args).await,
            "unsubscribe" | "unsub" => commands::cmd_unsubscribe(self, ctx, args).await,
            "logs" => commands::cmd_logs(self, ctx, args).await,
            "edit" => commands::cmd_edit(self, ctx, args).await,
            "reply" | "r" => commands::cmd_reply(self, ctx, args).await,
            "contact" => commands::cmd_contact(self, ctx, args).await,
            "block" => commands::cmd_block(self, ctx, args).await,
            "unblock" => commands::cmd_unblock(self, ctx, args).await,
            "blocked" => commands::cmd_blocked(self, ctx).await,
            "snippets" | "snippet" => commands::cmd_snippets(self, ctx, args).await,
            "help" => Ok(commands::cmd_help(ctx)),
            _ => commands::cmd_unknown(self, ctx, command).await,
        }
    }

    /// Activity hook for a message relayed into a thread.
    ///
    /// Cancels any pending close of the thread and returns the mentions the
    /// relay should ping, consuming one-shot notify entries.
    pub async fn on_thread_message(&self, thread_id: u64) -> Result<Vec<MentionEntry>> {
        self.scheduler.cancel_on_activity(thread_id).await;
        self.mentions.take_inbound_mentions(thread_id).await
    }

    /// Drop every pending close. Call when the bot disconnects; closes that
    /// were not fired are not carried over.
    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
    }

    /// Thread bound to the command channel, if any.
    pub(super) async fn current_thread(&self, ctx: &CommandContext) -> Result<Option<Thread>> {
        Ok(self
            .collaborators
            .threads
            .find_by_channel(ctx.channel_id)
            .await?)
    }

    pub(super) async fn require_thread(&self, ctx: &CommandContext) -> Result<Thread> {
        self.current_thread(ctx)
            .await?
            .ok_or(ModmailError::NotAThread)
    }

    /// Resolve a user argument: directory lookup first, then a bare id.
    pub(super) async fn lookup_user(&self, argument: &str) -> Result<Option<UserRef>> {
        if let Some(user) = self.collaborators.users.resolve_user(argument).await? {
            return Ok(Some(user));
        }
        Ok(parse_user_id(argument).map(UserRef::RawId))
    }
}

/// Accept `123`, `<@123>` and `<@!123>`.
fn parse_user_id(argument: &str) -> Option<u64> {
    let trimmed = argument.trim();
    let inner = trimmed
        .strip_prefix("<@")
        .and_then(|rest| rest.strip_suffix('>'))
        .map(|rest| rest.trim_start_matches('!'))
        .unwrap_or(trimmed);
    inner.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MessageLevel;
    use crate::runtime::test_support::Harness;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("42"), Some(42));
        assert_eq!(parse_user_id("<@42>"), Some(42));
        assert_eq!(parse_user_id("<@!42>"), Some(42));
        assert_eq!(parse_user_id("alice"), None);
    }

    #[tokio::test]
    async fn test_without_prefix_is_ignored() {
        let harness = Harness::new().await;
        let outcome = harness.run(harness.thread_channel, "close").await;
        assert_eq!(outcome, CommandOutcome::Silent);
        assert_eq!(harness.threads.close_count(harness.thread_id).await, 0);
    }

    #[tokio::test]
    async fn test_command_is_case_insensitive() {
        let harness = Harness::new().await;
        let outcome = harness.run(harness.thread_channel, "?HELP").await;
        assert_eq!(outcome.level(), Some(MessageLevel::Info));
    }

    #[tokio::test]
    async fn test_custom_prefix() {
        let harness = Harness::new().await;
        harness.storage.config.set_prefix("!").unwrap();

        assert_eq!(
            harness.run(harness.thread_channel, "?help").await,
            CommandOutcome::Silent
        );
        let outcome = harness.run(harness.thread_channel, "!help").await;
        assert!(outcome.messages()[0].content.contains("`!close"));
    }

    #[tokio::test]
    async fn test_thread_command_outside_thread() {
        let harness = Harness::new().await;
        let outcome = harness.run(999, "?close").await;

        let messages = outcome.messages();
        assert_eq!(messages[0].level, MessageLevel::Error);
        assert_eq!(messages[0].content, "This is not a modmail thread.");
        assert_eq!(messages[0].channel_id, 999);
    }

    #[tokio::test]
    async fn test_activity_cancels_close_and_returns_mentions() {
        let harness = Harness::new().await;
        harness.run(harness.thread_channel, "?sub").await;
        harness.run(harness.thread_channel, "?notify here").await;
        harness.run(harness.thread_channel, "?close 1h").await;
        assert!(harness.dispatcher.scheduler().is_scheduled(harness.thread_id).await);

        let mentions = harness
            .dispatcher
            .on_thread_message(harness.thread_id)
            .await
            .unwrap();
        assert_eq!(
            mentions,
            vec![
                MentionEntry::user(harness.moderator.id()),
                MentionEntry::here()
            ]
        );
        assert!(!harness.dispatcher.scheduler().is_scheduled(harness.thread_id).await);

        let mentions = harness
            .dispatcher
            .on_thread_message(harness.thread_id)
            .await
            .unwrap();
        assert_eq!(mentions, vec![MentionEntry::user(harness.moderator.id())]);
    }

    #[tokio::test]
    async fn test_shutdown_drops_pending_closes() {
        let harness = Harness::new().await;
        harness.run(harness.thread_channel, "?close 1s").await;

        harness.dispatcher.shutdown().await;
        assert_eq!(harness.dispatcher.scheduler().pending_count().await, 0);

        tokio::time::sleep(std::time::Duration::from_millis(1_300)).await;
        assert_eq!(harness.threads.close_count(harness.thread_id).await, 0);
    }
}

//! Command handlers.
//!
//! Each handler returns what the command produced; expected failures are
//! returned as `ModmailError` and rendered by the dispatcher.

use chrono::Utc;
use tracing::info;

use super::dispatcher::{CommandContext, CommandDispatcher};
use crate::backref::resolve_backref;
use crate::channel::{CommandOutcome, OutboundMessage};
use crate::error::{ModmailError, Result};
use crate::logs::{LogPageContext, paginate_logs};
use crate::mention::{AddOutcome, RemoveOutcome, resolve_mention};
use crate::models::{CloseRequest, MentionSet, UserRef};
use crate::scheduler::CloseListener;
use crate::time::human_timedelta;

const CLOSE_FOOTER: &str = "Closing will be cancelled if a thread message is sent.";

/// Messages scanned when looking for the reply to edit.
const EDIT_HISTORY_LIMIT: usize = 100;

const SNIPPETS_PER_PAGE: usize = 5;

/// Split off the first whitespace-separated word.
fn split_first(args: &str) -> (&str, &str) {
    args.split_once(char::is_whitespace)
        .map(|(first, rest)| (first, rest.trim()))
        .unwrap_or((args, ""))
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Close the thread now, later, or cancel a pending close.
pub(super) async fn cmd_close(
    d: &CommandDispatcher,
    ctx: &CommandContext,
    args: &str,
) -> Result<CommandOutcome> {
    let thread = d.require_thread(ctx).await?;
    let now = Utc::now();
    let parsed = d.collaborators.time.parse(args, now)?;
    let residual = parsed.residual.as_deref().unwrap_or_default();

    if residual.eq_ignore_ascii_case("cancel") {
        if !d.scheduler.cancel(thread.id).await {
            return Err(ModmailError::NothingScheduled);
        }
        return Ok(CommandOutcome::Reply(OutboundMessage::warning(
            ctx.channel_id,
            "Scheduled close has been cancelled.",
        )));
    }

    let silent = residual.eq_ignore_ascii_case("silent") || residual.eq_ignore_ascii_case("silently");
    let message = if silent { None } else { parsed.residual.clone() };

    if parsed.when > now {
        let schedule = d
            .scheduler
            .schedule(thread.id, parsed.when, ctx.author.id(), message, silent)
            .await?;

        let mut reply = OutboundMessage::new(
            ctx.channel_id,
            format!(
                "This thread will close {}in {}.",
                if silent { "silently " } else { "" },
                human_timedelta(schedule.fire_at, now)
            ),
        )
        .with_title("Scheduled close");
        if let Some(message) = &schedule.message {
            reply = reply.with_field("Message", message, false);
        }
        let reply = reply
            .with_footer(CLOSE_FOOTER)
            .with_timestamp(schedule.fire_at);
        return Ok(CommandOutcome::Reply(reply));
    }

    // An immediate close supersedes anything pending
    d.scheduler.cancel(thread.id).await;
    d.collaborators
        .threads
        .close(
            thread.id,
            CloseRequest {
                closer_id: ctx.author.id(),
                message,
                silent,
            },
        )
        .await?;
    d.mentions.thread_closed(thread.id).await;
    info!(thread_id = thread.id, closer_id = ctx.author.id(), silent, "Thread closed");
    Ok(CommandOutcome::Silent)
}

pub(super) async fn cmd_notify(
    d: &CommandDispatcher,
    ctx: &CommandContext,
    args: &str,
) -> Result<CommandOutcome> {
    let thread = d.require_thread(ctx).await?;
    let entry = resolve_mention(Some(args), &ctx.author, d.collaborators.roles.as_ref()).await?;

    match d.mentions.add(thread.id, MentionSet::Notify, entry.clone()).await? {
        AddOutcome::Added => Ok(CommandOutcome::Reply(OutboundMessage::success(
            ctx.channel_id,
            format!("{} will be mentioned on the next message received.", entry),
        ))),
        AddOutcome::AlreadyPresent => Err(ModmailError::AlreadyPresent(entry.to_string())),
    }
}

pub(super) async fn cmd_subscribe(
    d: &CommandDispatcher,
    ctx: &CommandContext,
    args: &str,
) -> Result<CommandOutcome> {
    let thread = d.require_thread(ctx).await?;
    let entry = resolve_mention(Some(args), &ctx.author, d.collaborators.roles.as_ref()).await?;

    match d
        .mentions
        .add(thread.id, MentionSet::Subscribe, entry.clone())
        .await?
    {
        AddOutcome::Added => Ok(CommandOutcome::Reply(OutboundMessage::success(
            ctx.channel_id,
            format!("{} will now be notified of all messages received.", entry),
        ))),
        AddOutcome::AlreadyPresent => Err(ModmailError::AlreadyPresent(entry.to_string())),
    }
}

pub(super) async fn cmd_unsubscribe(
    d: &CommandDispatcher,
    ctx: &CommandContext,
    args: &str,
) -> Result<CommandOutcome> {
    let thread = d.require_thread(ctx).await?;
    let entry = resolve_mention(Some(args), &ctx.author, d.collaborators.roles.as_ref()).await?;

    match d
        .mentions
        .remove(thread.id, MentionSet::Subscribe, &entry)
        .await?
    {
        RemoveOutcome::Removed => Ok(CommandOutcome::Reply(OutboundMessage::success(
            ctx.channel_id,
            format!("{} is now unsubscribed from this thread.", entry),
        ))),
        RemoveOutcome::NotPresent => Err(ModmailError::NotPresent(entry.to_string())),
    }
}

/// Previous logs of a user, or of the thread recipient without an argument.
pub(super) async fn cmd_logs(
    d: &CommandDispatcher,
    ctx: &CommandContext,
    args: &str,
) -> Result<CommandOutcome> {
    let user = if args.is_empty() {
        d.require_thread(ctx).await?.recipient
    } else {
        d.lookup_user(args)
            .await?
            .ok_or_else(|| ModmailError::UserNotFound(args.to_string()))?
    };

    let records = d.collaborators.logs.get_user_logs(user.id()).await?;
    let config = d.config.load()?;
    let page_ctx = LogPageContext {
        username: user.display_name(),
        icon_url: user.icon_url().to_string(),
        log_base_url: config.log_base_url().to_string(),
        selfhosted: config.selfhosted && config.log_url.is_some(),
    };

    let pages = paginate_logs(&records, &page_ctx)?
        .into_iter()
        .map(|page| {
            page.fields.iter().fold(
                OutboundMessage::new(ctx.channel_id, "")
                    .with_author(page.author_name.clone(), Some(page.icon_url.clone())),
                |message, group| message.with_field(&group.day_label, group.value(), false),
            )
        })
        .collect();
    Ok(CommandOutcome::Paginated(pages))
}

/// `[message_id] <text>`: a leading number selects the message to edit.
fn split_edit_target(args: &str) -> (Option<u64>, &str) {
    let (first, rest) = split_first(args);
    if let Ok(id) = first.parse::<u64>()
        && !rest.is_empty()
    {
        return (Some(id), rest);
    }
    (None, args)
}

pub(super) async fn cmd_edit(
    d: &CommandDispatcher,
    ctx: &CommandContext,
    args: &str,
) -> Result<CommandOutcome> {
    let thread = d.require_thread(ctx).await?;
    let (target, text) = split_edit_target(args);
    if text.is_empty() {
        return Err(ModmailError::Usage(format!(
            "{}edit [message_id] <message>",
            ctx.prefix
        )));
    }

    let history = d
        .collaborators
        .history
        .history(ctx.channel_id, EDIT_HISTORY_LIMIT);
    let linked = resolve_backref(history, target).await?;

    d.collaborators
        .threads
        .edit_message(thread.id, &linked, text)
        .await?;
    Ok(CommandOutcome::Acknowledged)
}

pub(super) async fn cmd_reply(
    d: &CommandDispatcher,
    ctx: &CommandContext,
    args: &str,
) -> Result<CommandOutcome> {
    let thread = d.require_thread(ctx).await?;
    if args.is_empty() {
        return Err(ModmailError::Usage(format!("{}reply <message>", ctx.prefix)));
    }

    d.collaborators
        .threads
        .reply(thread.id, &ctx.author, args)
        .await?;
    Ok(CommandOutcome::Silent)
}

/// Open a thread with a user who has not messaged yet.
pub(super) async fn cmd_contact(
    d: &CommandDispatcher,
    ctx: &CommandContext,
    args: &str,
) -> Result<CommandOutcome> {
    if args.is_empty() {
        return Err(ModmailError::Usage(format!("{}contact <user>", ctx.prefix)));
    }
    let user = d
        .collaborators
        .users
        .resolve_user(args)
        .await?
        .ok_or_else(|| ModmailError::UserNotFound(args.to_string()))?;

    if d
        .collaborators
        .threads
        .find_by_recipient(user.id())
        .await?
        .is_some()
    {
        return Err(ModmailError::ThreadExists);
    }

    let thread = d.collaborators.threads.create(&user, &ctx.author).await?;
    info!(thread_id = thread.id, recipient = user.id(), "Thread created by moderator");
    Ok(CommandOutcome::Reply(
        OutboundMessage::success(
            ctx.channel_id,
            format!(
                "Thread started in <#{}> for {}.",
                thread.channel_id,
                user.mention()
            ),
        )
        .with_title("Created thread"),
    ))
}

/// User named by the first word, or the thread recipient.
///
/// Returns the user and the remaining text.
async fn target_user(
    d: &CommandDispatcher,
    ctx: &CommandContext,
    args: &str,
    usage: &str,
) -> Result<(UserRef, Option<String>)> {
    if args.is_empty() {
        let thread = d
            .current_thread(ctx)
            .await?
            .ok_or_else(|| ModmailError::Usage(format!("{}{}", ctx.prefix, usage)))?;
        return Ok((thread.recipient, None));
    }

    let (first, rest) = split_first(args);
    if let Some(user) = d.lookup_user(first).await? {
        return Ok((user, non_empty(rest)));
    }

    match d.current_thread(ctx).await? {
        Some(thread) => Ok((thread.recipient, non_empty(args))),
        None => Err(ModmailError::UserNotFound(first.to_string())),
    }
}

pub(super) async fn cmd_block(
    d: &CommandDispatcher,
    ctx: &CommandContext,
    args: &str,
) -> Result<CommandOutcome> {
    let (user, reason) = target_user(d, ctx, args, "block [user] [reason]").await?;
    let entry = d.blocklist.block(&user, reason)?;

    let reason = entry
        .reason
        .map(|reason| format!(" for `{}`", reason))
        .unwrap_or_default();
    Ok(CommandOutcome::Reply(OutboundMessage::success(
        ctx.channel_id,
        format!("{} is now blocked{}.", user.mention(), reason),
    )))
}

pub(super) async fn cmd_unblock(
    d: &CommandDispatcher,
    ctx: &CommandContext,
    args: &str,
) -> Result<CommandOutcome> {
    let (user, _) = target_user(d, ctx, args, "unblock [user]").await?;
    d.blocklist.unblock(&user)?;

    Ok(CommandOutcome::Reply(OutboundMessage::success(
        ctx.channel_id,
        format!("{} is no longer blocked.", user.mention()),
    )))
}

/// Blocked users, split by whether the bot can still see them.
pub(super) async fn cmd_blocked(
    d: &CommandDispatcher,
    ctx: &CommandContext,
) -> Result<CommandOutcome> {
    let entries = d.blocklist.list()?;
    if entries.is_empty() {
        return Ok(CommandOutcome::Reply(
            OutboundMessage::new(ctx.channel_id, "Currently there are no blocked users.")
                .with_title("Blocked Users"),
        ));
    }

    let mut known = Vec::new();
    let mut unknown = Vec::new();
    for entry in entries {
        let reason = entry.reason.as_deref().unwrap_or("No Reason Provided");
        match d.collaborators.users.get_user(entry.user_id).await? {
            Some(user) => known.push(format!("{} - {}", user.mention(), reason)),
            None => unknown.push(format!("`{}` - {}", entry.user_id, reason)),
        }
    }

    let mut reply = OutboundMessage::new(ctx.channel_id, "Here is a list of blocked users.")
        .with_title("Blocked Users");
    if !known.is_empty() {
        reply = reply.with_field("Currently Known", known.join("\n"), false);
    }
    if !unknown.is_empty() {
        reply = reply.with_field("Unknown", unknown.join("\n"), false);
    }
    Ok(CommandOutcome::Reply(reply))
}

/// `snippets`, `snippets add <name> <value>`, `snippets del <name>`,
/// `snippets <name>`.
pub(super) async fn cmd_snippets(
    d: &CommandDispatcher,
    ctx: &CommandContext,
    args: &str,
) -> Result<CommandOutcome> {
    let (action, rest) = split_first(args);

    match action.to_lowercase().as_str() {
        "" => list_snippets(d, ctx),
        "add" => {
            let (name, value) = split_first(rest);
            if name.is_empty() || value.is_empty() {
                return Err(ModmailError::Usage(format!(
                    "{}snippets add <name> <value>",
                    ctx.prefix
                )));
            }
            let snippet = d.snippets.add(name, value)?;
            Ok(CommandOutcome::Reply(OutboundMessage::success(
                ctx.channel_id,
                format!("Successfully created snippet `{}`.", snippet.name),
            )))
        }
        "del" | "remove" => {
            if rest.is_empty() {
                return Err(ModmailError::Usage(format!(
                    "{}snippets del <name>",
                    ctx.prefix
                )));
            }
            d.snippets.remove(rest)?;
            Ok(CommandOutcome::Reply(OutboundMessage::success(
                ctx.channel_id,
                format!("Snippet `{}` is now deleted.", rest.to_lowercase()),
            )))
        }
        name => {
            let snippet = d
                .snippets
                .get(name)?
                .ok_or_else(|| ModmailError::SnippetNotFound(name.to_string()))?;
            Ok(CommandOutcome::Reply(
                OutboundMessage::new(ctx.channel_id, snippet.value)
                    .with_title(format!("Snippet - {}", snippet.name)),
            ))
        }
    }
}

fn list_snippets(d: &CommandDispatcher, ctx: &CommandContext) -> Result<CommandOutcome> {
    let snippets = d.snippets.list()?;
    if snippets.is_empty() {
        return Ok(CommandOutcome::Reply(OutboundMessage::warning(
            ctx.channel_id,
            format!(
                "You don't have any snippets at the moment. Add one with `{}snippets add <name> <value>`.",
                ctx.prefix
            ),
        )));
    }

    let total = snippets.len().div_ceil(SNIPPETS_PER_PAGE);
    let pages = snippets
        .chunks(SNIPPETS_PER_PAGE)
        .enumerate()
        .map(|(index, chunk)| {
            chunk
                .iter()
                .fold(
                    OutboundMessage::new(
                        ctx.channel_id,
                        "Here is a list of snippets that are currently configured.",
                    )
                    .with_title("Snippets"),
                    |message, snippet| message.with_field(&snippet.name, &snippet.value, false),
                )
                .with_footer(format!("Page {} of {}", index + 1, total))
        })
        .collect();
    Ok(CommandOutcome::Paginated(pages))
}

pub(super) fn cmd_help(ctx: &CommandContext) -> CommandOutcome {
    let p = &ctx.prefix;
    let text = format!(
        r#"*Thread commands:*
`{p}close [time] [message|silently|cancel]` - Close the thread, now or later
`{p}reply <message>` - Reply to the recipient
`{p}edit [message_id] <message>` - Edit a sent reply
`{p}notify [role]` - Mention on the next message
`{p}subscribe [role]` - Mention on every message
`{p}unsubscribe [role]` - Stop mentions on every message
`{p}logs [user]` - Show previous threads

*Moderation:*
`{p}contact <user>` - Start a thread with a user
`{p}block [user] [reason]` - Block a user
`{p}unblock [user]` - Unblock a user
`{p}blocked` - List blocked users
`{p}snippets [add|del] [name] [value]` - Manage snippets
`{p}help` - Show this help"#
    );

    CommandOutcome::Reply(OutboundMessage::new(ctx.channel_id, text).with_title("Modmail"))
}

/// Unknown commands inside a thread may name a snippet to send.
pub(super) async fn cmd_unknown(
    d: &CommandDispatcher,
    ctx: &CommandContext,
    command: &str,
) -> Result<CommandOutcome> {
    if let Some(thread) = d.current_thread(ctx).await?
        && let Some(snippet) = d.snippets.get(command)?
    {
        d.collaborators
            .threads
            .reply(thread.id, &ctx.author, &snippet.value)
            .await?;
        return Ok(CommandOutcome::Silent);
    }

    Ok(CommandOutcome::Reply(OutboundMessage::warning(
        ctx.channel_id,
        format!(
            "Unknown command `{}{}`. Use `{}help` to see available commands.",
            ctx.prefix, command, ctx.prefix
        ),
    )))
}

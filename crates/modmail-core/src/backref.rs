//! Reply back-reference resolution for `edit`.
//!
//! Every moderator reply relayed to a recipient is mirrored in the thread
//! channel as an embed whose author link ends with the id of the
//! recipient-side copy. Moderator replies are told apart from recipient
//! messages by their footer.

use futures::{Stream, StreamExt};
use std::pin::pin;

use crate::error::{ModmailError, Result};
use crate::models::ChannelMessage;

/// Footer marker of mirrored moderator replies.
pub const MODERATOR_FOOTER_MARKER: &str = "Moderator";

/// Id of the linked message, taken from the first embed's author link.
fn linked_message_id(message: &ChannelMessage) -> Option<String> {
    let url = message.embeds.first()?.author_url.as_deref()?;
    let segment = url.rsplit('/').next()?;
    (!segment.is_empty()).then(|| segment.to_string())
}

fn is_moderator_reply(message: &ChannelMessage) -> bool {
    message
        .embeds
        .first()
        .and_then(|embed| embed.footer_text.as_deref())
        .is_some_and(|footer| footer.contains(MODERATOR_FOOTER_MARKER))
}

/// Find the recipient-side message id behind a thread channel message.
///
/// `history` must be newest first. With a `target` id the message with that
/// id is used; without one, the most recent moderator reply. The stream is
/// polled only until the first candidate is found.
pub async fn resolve_backref<S>(history: S, target: Option<u64>) -> Result<String>
where
    S: Stream<Item = ChannelMessage>,
{
    let mut history = pin!(history);

    while let Some(message) = history.next().await {
        match target {
            Some(id) if message.id == id => {
                return linked_message_id(&message).ok_or(ModmailError::ReferenceNotFound);
            }
            Some(_) => continue,
            None if is_moderator_reply(&message) => {
                return linked_message_id(&message).ok_or(ModmailError::ReferenceNotFound);
            }
            None => continue,
        }
    }

    Err(ModmailError::ReferenceNotFound)
}

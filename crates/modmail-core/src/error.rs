//! Error taxonomy for modmail commands.
//!
//! Every variant except [`ModmailError::Internal`] is an expected outcome of a
//! command and is turned into a user-visible reply by the dispatcher.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModmailError {
    #[error("This is not a modmail thread.")]
    NotAThread,

    #[error("This thread is already scheduled to close.")]
    AlreadyScheduled,

    #[error("This thread has not already been scheduled to close.")]
    NothingScheduled,

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Could not understand the time `{0}`.")]
    UnparseableTime(String),

    #[error("This user does not have any previous logs.")]
    NoLogs,

    #[error("Could not find the message to edit.")]
    ReferenceNotFound,

    #[error("{0} is already registered.")]
    AlreadyPresent(String),

    #[error("{0} is not registered.")]
    NotPresent(String),

    #[error("{0} is already blocked.")]
    AlreadyBlocked(String),

    #[error("{0} is not blocked.")]
    NotBlocked(String),

    #[error("Snippet `{0}` does not exist.")]
    SnippetNotFound(String),

    #[error("A thread for this user already exists.")]
    ThreadExists,

    #[error("Usage: `{0}`")]
    Usage(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ModmailError {
    /// Whether the error is an expected command outcome rather than a fault.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}

pub type Result<T, E = ModmailError> = std::result::Result<T, E>;

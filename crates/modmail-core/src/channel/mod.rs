//! Chat platform boundary.
//!
//! Reply types the command layer produces and the collaborator traits it
//! consumes. Nothing here talks to the network.

mod traits;
mod types;

pub use traits::{LogArchive, MessageHistory, RoleResolver, ThreadRegistry, UserDirectory};
pub use types::{CommandOutcome, MessageLevel, OutboundMessage, ReplyAuthor, ReplyField};

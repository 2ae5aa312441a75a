mod log;
mod mention;
mod message;
mod thread;
mod user;

pub use log::{DayGroup, LogPage, LogRecord};
pub use mention::{MentionEntry, MentionSet};
pub use message::{ChannelMessage, EmbedMeta};
pub use thread::{BlockEntry, CloseRequest, Snippet, Thread};
pub use user::{DEFAULT_AVATAR_URL, UserRef};

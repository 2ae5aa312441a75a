use serde::{Deserialize, Serialize};

use super::UserRef;

/// A support conversation bound to its own channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: u64,
    pub channel_id: u64,
    pub recipient: UserRef,
}

impl Thread {
    pub fn new(id: u64, channel_id: u64, recipient: UserRef) -> Self {
        Self {
            id,
            channel_id,
            recipient,
        }
    }
}

/// Arguments handed to the thread registry when a thread is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseRequest {
    pub closer_id: u64,
    pub message: Option<String>,
    pub silent: bool,
}

/// A blocked user and the optional reason recorded with the block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEntry {
    pub user_id: u64,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub name: String,
    pub value: String,
}

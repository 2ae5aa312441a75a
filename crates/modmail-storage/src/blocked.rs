//! Blocked user storage - byte-level API keyed by user id.

use crate::define_keyed_table;

define_keyed_table! {
    /// Low-level blocked user storage. Values are JSON `BlockEntry` records.
    pub struct BlockedStorage { table: "blocked_users" }
}

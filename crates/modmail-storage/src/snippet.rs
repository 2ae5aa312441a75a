//! Snippet storage - canned replies keyed by lower-cased name.

use crate::define_keyed_table;

define_keyed_table! {
    /// Low-level snippet storage. Values are UTF-8 snippet bodies.
    pub struct SnippetStorage { table: "snippets" }
}

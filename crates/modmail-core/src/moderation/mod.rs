//! Moderator-managed state outside of threads.

mod blocklist;
mod snippets;

pub use blocklist::Blocklist;
pub use snippets::SnippetBook;

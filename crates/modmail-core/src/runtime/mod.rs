//! Command runtime: parses moderator commands and drives the components.

mod commands;
mod dispatcher;
#[cfg(test)]
mod test_support;

pub use dispatcher::{Collaborators, CommandContext, CommandDispatcher};

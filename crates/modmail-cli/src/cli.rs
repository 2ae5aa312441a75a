use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "modmail")]
#[command(version, about = "Modmail - administer the modmail bot database")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (defaults to ~/.modmail/modmail.db)
    #[arg(long, global = true, env = "MODMAIL_DB_PATH")]
    pub db_path: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bot configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Snippet management
    Snippet {
        #[command(subcommand)]
        command: SnippetCommands,
    },

    /// Blocked user management
    Blocked {
        #[command(subcommand)]
        command: BlockedCommands,
    },

    /// Per-thread mention sets
    Mentions {
        #[command(subcommand)]
        command: MentionCommands,
    },

    /// Render previous logs from an archive export
    Logs(LogsArgs),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the stored configuration
    Show,

    /// Change the command prefix
    SetPrefix { prefix: String },

    /// Use a self-hosted log viewer, or the hosted one when omitted
    SetLogUrl { url: Option<String> },
}

#[derive(Subcommand)]
pub enum SnippetCommands {
    /// List snippets
    List,

    /// Add or replace a snippet
    Add {
        name: String,
        /// Snippet text
        value: Vec<String>,
    },

    /// Remove a snippet
    Remove { name: String },
}

#[derive(Subcommand)]
pub enum BlockedCommands {
    /// List blocked users
    List,

    /// Block a user by id
    Add {
        user_id: u64,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Unblock a user by id
    Remove { user_id: u64 },
}

#[derive(Subcommand)]
pub enum MentionCommands {
    /// Show mention sets of a thread, or list threads that have any
    List { thread_id: Option<u64> },

    /// Drop both mention sets of a thread
    Clear { thread_id: u64 },
}

#[derive(Args)]
pub struct LogsArgs {
    /// JSON file with an array of log records
    pub file: PathBuf,

    /// Only render logs of this user id
    #[arg(long)]
    pub user: Option<u64>,

    /// Name shown in the first page header
    #[arg(long, default_value = "User")]
    pub name: String,
}

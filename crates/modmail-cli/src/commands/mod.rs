pub mod blocked;
pub mod config;
pub mod logs;
pub mod mentions;
pub mod snippet;

use anyhow::Result;

use crate::cli::Commands;
use crate::output::OutputFormat;
use modmail_core::ModmailCore;

pub async fn run(core: &ModmailCore, command: Commands, format: OutputFormat) -> Result<()> {
    match command {
        Commands::Config { command } => config::run(core, command, format).await,
        Commands::Snippet { command } => snippet::run(core, command, format).await,
        Commands::Blocked { command } => blocked::run(core, command, format).await,
        Commands::Mentions { command } => mentions::run(core, command, format).await,
        Commands::Logs(args) => logs::run(core, args, format).await,
    }
}

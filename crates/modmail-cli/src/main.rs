mod cli;
mod commands;
mod config;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use modmail_core::{ModmailCore, paths};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = config::CliConfig::load();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = run(cli, &config).await {
        error::handle_error(err);
    }
}

async fn run(cli: Cli, config: &config::CliConfig) -> Result<()> {
    let db_path = resolve_db_path(cli.db_path.as_deref(), config)?;
    let core = ModmailCore::open(&db_path)?;
    commands::run(&core, cli.command, cli.format).await
}

/// Priority: --db-path / MODMAIL_DB_PATH > config file > ~/.modmail/modmail.db
fn resolve_db_path(flag: Option<&str>, config: &config::CliConfig) -> Result<PathBuf> {
    if let Some(path) = flag.or(config.default.db_path.as_deref()) {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        return Ok(path);
    }
    paths::ensure_database_path()
}

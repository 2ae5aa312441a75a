use anyhow::Result;
use comfy_table::{Cell, Table};

use crate::cli::ConfigCommands;
use crate::output::{OutputFormat, json::print_json, table::print_table};
use modmail_core::ModmailCore;
use modmail_storage::BotConfig;

pub async fn run(core: &ModmailCore, command: ConfigCommands, format: OutputFormat) -> Result<()> {
    let storage = &core.storage.config;
    match command {
        ConfigCommands::Show => show_config(&storage.load()?, format),
        ConfigCommands::SetPrefix { prefix } => {
            storage.set_prefix(&prefix)?;
            show_config(&storage.load()?, format)
        }
        ConfigCommands::SetLogUrl { url } => {
            storage.set_log_url(url.as_deref())?;
            show_config(&storage.load()?, format)
        }
    }
}

fn optional<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn show_config(config: &BotConfig, format: OutputFormat) -> Result<()> {
    if format.is_json() {
        return print_json(config);
    }

    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);
    table.add_row(vec![Cell::new("prefix"), Cell::new(&config.prefix)]);
    table.add_row(vec![Cell::new("selfhosted"), Cell::new(config.selfhosted)]);
    table.add_row(vec![Cell::new("log_url"), Cell::new(optional(&config.log_url))]);
    table.add_row(vec![
        Cell::new("hosted_log_url"),
        Cell::new(&config.hosted_log_url),
    ]);
    table.add_row(vec![Cell::new("owner_id"), Cell::new(optional(&config.owner_id))]);
    table.add_row(vec![
        Cell::new("main_category_id"),
        Cell::new(optional(&config.main_category_id)),
    ]);
    table.add_row(vec![
        Cell::new("log_channel_id"),
        Cell::new(optional(&config.log_channel_id)),
    ]);
    table.add_row(vec![
        Cell::new("effective log base"),
        Cell::new(config.log_base_url()),
    ]);

    print_table(table)
}

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::debug;

use crate::cli::LogsArgs;
use crate::output::{OutputFormat, json::print_json};
use modmail_core::ModmailCore;
use modmail_core::logs::{LogPageContext, paginate_logs};
use modmail_core::models::{DEFAULT_AVATAR_URL, LogPage, LogRecord};

pub async fn run(core: &ModmailCore, args: LogsArgs, format: OutputFormat) -> Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let mut records: Vec<LogRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse log records in {}", args.file.display()))?;

    if let Some(user_id) = args.user {
        records.retain(|record| record.user_id == Some(user_id));
    }
    records.sort_by_key(|record| record.created_at);
    debug!("Rendering {} log records", records.len());

    let config = core.storage.config.load()?;
    let ctx = LogPageContext {
        username: args.name,
        icon_url: DEFAULT_AVATAR_URL.to_string(),
        log_base_url: config.log_base_url().to_string(),
        selfhosted: config.selfhosted && config.log_url.is_some(),
    };
    let pages = paginate_logs(&records, &ctx)?;

    if format.is_json() {
        return print_json(&pages);
    }

    let total = pages.len();
    for (index, page) in pages.iter().enumerate() {
        print_page(page, index + 1, total);
    }
    Ok(())
}

fn print_page(page: &LogPage, number: usize, total: usize) {
    println!(
        "{} {}",
        page.author_name.bold(),
        format!("(page {}/{})", number, total).dimmed()
    );
    for group in &page.fields {
        println!("\n{}", group.day_label.cyan());
        for line in &group.lines {
            println!("  {}", line);
        }
    }
    println!();
}

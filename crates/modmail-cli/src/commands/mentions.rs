use anyhow::Result;
use comfy_table::{Cell, Table};
use serde_json::json;

use crate::cli::MentionCommands;
use crate::output::{OutputFormat, json::print_json, table::print_table};
use modmail_core::ModmailCore;
use modmail_core::mention::MentionRegistry;
use modmail_core::models::MentionSet;

pub async fn run(core: &ModmailCore, command: MentionCommands, format: OutputFormat) -> Result<()> {
    let registry = MentionRegistry::new(core.storage.mentions.clone());
    match command {
        MentionCommands::List { thread_id: None } => list_threads(core, format),
        MentionCommands::List {
            thread_id: Some(thread_id),
        } => show_thread(&registry, thread_id, format).await,
        MentionCommands::Clear { thread_id } => {
            registry.clear_thread(thread_id).await?;
            if format.is_json() {
                return print_json(&json!({ "cleared": thread_id }));
            }
            println!("Mention sets of thread {} cleared.", thread_id);
            Ok(())
        }
    }
}

fn list_threads(core: &ModmailCore, format: OutputFormat) -> Result<()> {
    let notify = core.storage.mentions.threads(MentionSet::Notify)?;
    let subscribe = core.storage.mentions.threads(MentionSet::Subscribe)?;

    if format.is_json() {
        return print_json(&json!({ "notify": notify, "subscribe": subscribe }));
    }

    let mut threads: Vec<u64> = notify.iter().chain(subscribe.iter()).copied().collect();
    threads.sort_unstable();
    threads.dedup();

    let mut table = Table::new();
    table.set_header(vec!["Thread", "Notify", "Subscribe"]);
    for thread_id in threads {
        table.add_row(vec![
            Cell::new(thread_id),
            Cell::new(if notify.contains(&thread_id) { "yes" } else { "-" }),
            Cell::new(if subscribe.contains(&thread_id) { "yes" } else { "-" }),
        ]);
    }
    print_table(table)
}

async fn show_thread(registry: &MentionRegistry, thread_id: u64, format: OutputFormat) -> Result<()> {
    let notify = registry.list(thread_id, MentionSet::Notify).await?;
    let subscribe = registry.list(thread_id, MentionSet::Subscribe).await?;

    if format.is_json() {
        return print_json(&json!({
            "thread_id": thread_id,
            "notify": notify,
            "subscribe": subscribe,
        }));
    }

    let mut table = Table::new();
    table.set_header(vec!["Set", "Mention"]);
    for (set, entries) in [(MentionSet::Notify, notify), (MentionSet::Subscribe, subscribe)] {
        for entry in entries {
            table.add_row(vec![Cell::new(set), Cell::new(entry)]);
        }
    }
    print_table(table)
}

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde_json::json;

use crate::cli::BlockedCommands;
use crate::output::{OutputFormat, json::print_json, table::print_table};
use modmail_core::ModmailCore;
use modmail_core::models::UserRef;
use modmail_core::moderation::Blocklist;

pub async fn run(core: &ModmailCore, command: BlockedCommands, format: OutputFormat) -> Result<()> {
    let blocklist = Blocklist::new(core.storage.blocked.clone());
    match command {
        BlockedCommands::List => {
            let entries = blocklist.list()?;
            if format.is_json() {
                return print_json(&entries);
            }

            let mut table = Table::new();
            table.set_header(vec!["User", "Reason"]);
            for entry in entries {
                table.add_row(vec![
                    Cell::new(entry.user_id),
                    Cell::new(entry.reason.unwrap_or_else(|| "-".to_string())),
                ]);
            }
            print_table(table)
        }
        BlockedCommands::Add { user_id, reason } => {
            let entry = blocklist.block(&UserRef::RawId(user_id), reason)?;
            if format.is_json() {
                return print_json(&entry);
            }
            println!("User {} blocked.", user_id);
            Ok(())
        }
        BlockedCommands::Remove { user_id } => {
            blocklist.unblock(&UserRef::RawId(user_id))?;
            if format.is_json() {
                return print_json(&json!({ "unblocked": user_id }));
            }
            println!("User {} unblocked.", user_id);
            Ok(())
        }
    }
}

use anyhow::{Result, bail};
use comfy_table::{Cell, Table};
use serde_json::json;

use crate::cli::SnippetCommands;
use crate::output::{OutputFormat, json::print_json, table::{preview_text, print_table}};
use modmail_core::ModmailCore;
use modmail_core::moderation::SnippetBook;

pub async fn run(core: &ModmailCore, command: SnippetCommands, format: OutputFormat) -> Result<()> {
    let book = SnippetBook::new(core.storage.snippets.clone());
    match command {
        SnippetCommands::List => list_snippets(&book, format),
        SnippetCommands::Add { name, value } => {
            let value = value.join(" ");
            if value.trim().is_empty() {
                bail!("Snippet text must not be empty");
            }
            let snippet = book.add(&name, &value)?;
            if format.is_json() {
                return print_json(&snippet);
            }
            println!("Snippet `{}` saved.", snippet.name);
            Ok(())
        }
        SnippetCommands::Remove { name } => {
            book.remove(&name)?;
            if format.is_json() {
                return print_json(&json!({ "removed": name.to_lowercase() }));
            }
            println!("Snippet `{}` removed.", name.to_lowercase());
            Ok(())
        }
    }
}

fn list_snippets(book: &SnippetBook, format: OutputFormat) -> Result<()> {
    let snippets = book.list()?;

    if format.is_json() {
        return print_json(&snippets);
    }

    let mut table = Table::new();
    table.set_header(vec!["Name", "Value"]);
    for snippet in snippets {
        table.add_row(vec![
            Cell::new(snippet.name),
            Cell::new(preview_text(&snippet.value, 60)),
        ]);
    }

    print_table(table)
}

//! Canned replies moderators can send by name.

use tracing::debug;

use crate::error::{ModmailError, Result};
use crate::models::Snippet;
use crate::storage::SnippetStorage;

pub struct SnippetBook {
    storage: SnippetStorage,
}

impl SnippetBook {
    pub fn new(storage: SnippetStorage) -> Self {
        Self { storage }
    }

    /// Store a snippet under its lower-cased name, replacing any previous value.
    pub fn add(&self, name: &str, value: &str) -> Result<Snippet> {
        let name = name.trim().to_lowercase();
        if name.is_empty() || value.trim().is_empty() {
            return Err(ModmailError::Usage("snippets add <name> <value>".to_string()));
        }

        let snippet = Snippet {
            name,
            value: value.trim().to_string(),
        };
        self.storage.upsert(&snippet)?;
        debug!("Stored snippet {}", snippet.name);
        Ok(snippet)
    }

    pub fn get(&self, name: &str) -> Result<Option<Snippet>> {
        Ok(self.storage.get(&name.trim().to_lowercase())?)
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let name = name.trim().to_lowercase();
        if !self.storage.remove(&name)? {
            return Err(ModmailError::SnippetNotFound(name));
        }
        debug!("Removed snippet {}", name);
        Ok(())
    }

    /// All snippets ordered by name.
    pub fn list(&self) -> Result<Vec<Snippet>> {
        Ok(self.storage.list()?)
    }
}

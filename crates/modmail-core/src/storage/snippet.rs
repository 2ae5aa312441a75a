//! Typed snippet storage wrapper.

use anyhow::Result;
use modmail_storage::KeyedTable;

use crate::models::Snippet;

#[derive(Debug, Clone)]
pub struct SnippetStorage {
    inner: modmail_storage::SnippetStorage,
}

impl SnippetStorage {
    pub fn new(inner: modmail_storage::SnippetStorage) -> Self {
        Self { inner }
    }

    pub fn get(&self, name: &str) -> Result<Option<Snippet>> {
        match self.inner.get_raw(name)? {
            Some(bytes) => Ok(Some(Snippet {
                name: name.to_string(),
                value: String::from_utf8(bytes)?,
            })),
            None => Ok(None),
        }
    }

    pub fn upsert(&self, snippet: &Snippet) -> Result<()> {
        self.inner.put_raw(&snippet.name, snippet.value.as_bytes())
    }

    pub fn remove(&self, name: &str) -> Result<bool> {
        self.inner.delete(name)
    }

    /// All snippets, sorted by name.
    pub fn list(&self) -> Result<Vec<Snippet>> {
        let mut out = Vec::new();
        for (name, bytes) in self.inner.list_raw()? {
            out.push(Snippet {
                name,
                value: String::from_utf8(bytes)?,
            });
        }
        Ok(out)
    }
}

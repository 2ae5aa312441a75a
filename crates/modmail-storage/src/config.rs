//! Bot configuration storage.

use anyhow::Result;
use redb::{Database, ReadableDatabase, TableDefinition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const CONFIG_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("system_config");
const CONFIG_KEY: &str = "bot";

// Default configuration constants
const DEFAULT_PREFIX: &str = "?";
const DEFAULT_HOSTED_LOG_URL: &str = "https://logs.modmail.tk";
const MAX_PREFIX_LEN: usize = 8;

/// Bot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Command prefix (e.g. `?close`)
    pub prefix: String,
    /// Whether logs are served by a self-hosted viewer
    pub selfhosted: bool,
    /// Base URL of the self-hosted log viewer
    pub log_url: Option<String>,
    /// Base URL of the hosted log viewer
    pub hosted_log_url: String,
    pub owner_id: Option<u64>,
    pub main_category_id: Option<u64>,
    pub log_channel_id: Option<u64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            selfhosted: false,
            log_url: None,
            hosted_log_url: DEFAULT_HOSTED_LOG_URL.to_string(),
            owner_id: None,
            main_category_id: None,
            log_channel_id: None,
        }
    }
}

impl BotConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let prefix = self.prefix.trim();
        if prefix.is_empty() {
            return Err(anyhow::anyhow!("Prefix must not be empty"));
        }

        if prefix.chars().count() > MAX_PREFIX_LEN {
            return Err(anyhow::anyhow!(
                "Prefix must be at most {} characters",
                MAX_PREFIX_LEN
            ));
        }

        url::Url::parse(&self.hosted_log_url)
            .map_err(|e| anyhow::anyhow!("Invalid hosted log url: {}", e))?;

        if let Some(log_url) = &self.log_url {
            url::Url::parse(log_url).map_err(|e| anyhow::anyhow!("Invalid log url: {}", e))?;
        }

        if self.selfhosted && self.log_url.is_none() {
            return Err(anyhow::anyhow!(
                "A log url is required when running self-hosted"
            ));
        }

        Ok(())
    }

    /// Base URL that log keys are appended to.
    pub fn log_base_url(&self) -> &str {
        match (&self.log_url, self.selfhosted) {
            (Some(url), true) => url.trim_end_matches('/'),
            _ => self.hosted_log_url.trim_end_matches('/'),
        }
    }
}

/// Configuration storage
#[derive(Clone)]
pub struct ConfigStorage {
    db: Arc<Database>,
}

impl ConfigStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        // Create table
        let write_txn = db.begin_write()?;
        write_txn.open_table(CONFIG_TABLE)?;
        write_txn.commit()?;

        let storage = Self { db };

        // Set default config if not exists
        if storage.get_config()?.is_none() {
            storage.update_config(BotConfig::default())?;
        }

        Ok(storage)
    }

    /// Get bot configuration
    pub fn get_config(&self) -> Result<Option<BotConfig>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONFIG_TABLE)?;

        if let Some(data) = table.get(CONFIG_KEY)? {
            let config: BotConfig = serde_json::from_slice(data.value())?;
            Ok(Some(config))
        } else {
            Ok(None)
        }
    }

    /// Get bot configuration, falling back to defaults
    pub fn load(&self) -> Result<BotConfig> {
        Ok(self.get_config()?.unwrap_or_default())
    }

    /// Update bot configuration
    pub fn update_config(&self, config: BotConfig) -> Result<()> {
        // Validate before saving
        config.validate()?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CONFIG_TABLE)?;
            let serialized = serde_json::to_vec(&config)?;
            table.insert(CONFIG_KEY, serialized.as_slice())?;
        }
        write_txn.commit()?;
        tracing::debug!(prefix = %config.prefix, "Bot config updated");
        Ok(())
    }

    /// Update command prefix
    pub fn set_prefix(&self, prefix: &str) -> Result<()> {
        let mut config = self.load()?;
        config.prefix = prefix.trim().to_string();
        self.update_config(config)
    }

    /// Point logs at a self-hosted viewer, or back to the hosted one with `None`.
    pub fn set_log_url(&self, log_url: Option<&str>) -> Result<()> {
        let mut config = self.load()?;
        config.selfhosted = log_url.is_some();
        config.log_url = log_url.map(|url| url.trim_end_matches('/').to_string());
        self.update_config(config)
    }
}

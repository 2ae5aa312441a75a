use anyhow::Result;
use std::path::PathBuf;

const MODMAIL_DIR: &str = ".modmail";
const DB_FILE: &str = "modmail.db";

/// Environment variable to override the modmail data directory.
const MODMAIL_DIR_ENV: &str = "MODMAIL_DIR";

/// Resolve the modmail data directory.
/// Priority: MODMAIL_DIR env var > ~/.modmail/
pub fn resolve_modmail_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(MODMAIL_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(MODMAIL_DIR))
        .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))
}

/// Ensure the modmail directory exists and return its path.
pub fn ensure_modmail_dir() -> Result<PathBuf> {
    let dir = resolve_modmail_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the database path: ~/.modmail/modmail.db
pub fn database_path() -> Result<PathBuf> {
    Ok(resolve_modmail_dir()?.join(DB_FILE))
}

/// Ensure the data directory exists and return the database path.
pub fn ensure_database_path() -> Result<PathBuf> {
    Ok(ensure_modmail_dir()?.join(DB_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_env_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        // SAFETY: serialized by ENV_LOCK
        unsafe { std::env::set_var(MODMAIL_DIR_ENV, temp_dir.path()) };

        assert_eq!(resolve_modmail_dir().unwrap(), temp_dir.path());
        assert_eq!(database_path().unwrap(), temp_dir.path().join(DB_FILE));

        unsafe { std::env::remove_var(MODMAIL_DIR_ENV) };
    }

    #[test]
    fn test_blank_override_ignored() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe { std::env::set_var(MODMAIL_DIR_ENV, "  ") };

        let dir = resolve_modmail_dir().unwrap();
        assert!(dir.ends_with(MODMAIL_DIR));

        unsafe { std::env::remove_var(MODMAIL_DIR_ENV) };
    }
}

use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".expense_ledger";
const STORE_DIR: &str = "store";
const BACKUP_DIR: &str = "backups";
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the application data directory.
pub const HOME_ENV: &str = "EXPENSE_LEDGER_HOME";

/// Returns the application-specific data directory, defaulting to `~/.expense_ledger`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Resolves `root` or falls back to [`app_data_dir`].
pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(app_data_dir)
}

/// Directory holding one JSON file per storage key.
pub fn store_dir_in(base: &Path) -> PathBuf {
    base.join(STORE_DIR)
}

/// Directory receiving copies of payloads that failed to load.
pub fn backup_dir_in(base: &Path) -> PathBuf {
    base.join(BACKUP_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

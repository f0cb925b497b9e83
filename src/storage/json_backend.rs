use chrono::Utc;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::utils::paths::{backup_dir_in, ensure_dir, resolve_base, store_dir_in};

use super::{Result, StorageBackend};

const ENTRY_EXTENSION: &str = "json";
const CORRUPT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";

/// File-backed key-value store: each key is one JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    store_dir: PathBuf,
    backups_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let app_root = resolve_base(root);
        ensure_dir(&app_root)?;
        let store_dir = store_dir_in(&app_root);
        let backups_dir = backup_dir_in(&app_root);
        ensure_dir(&store_dir)?;
        Ok(Self {
            root: app_root,
            store_dir,
            backups_dir,
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    /// File holding the payload for `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.store_dir
            .join(format!("{}.{}", canonical_name(key), ENTRY_EXTENSION))
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }
}

impl StorageBackend for JsonStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn preserve_corrupt(&self, key: &str, raw: &str) -> Result<()> {
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(CORRUPT_TIMESTAMP_FORMAT);
        let path = self.backups_dir.join(format!(
            "{}_corrupt_{}.{}",
            canonical_name(key),
            timestamp,
            ENTRY_EXTENSION
        ));
        write_atomic(&path, raw)?;
        tracing::info!(path = %path.display(), "preserved corrupt payload");
        Ok(())
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "transactions".into()
    } else {
        sanitized
    }
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

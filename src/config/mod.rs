use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::{
    core::zone::ZonePolicy,
    currency::{CurrencyCode, CurrencyFormatter, LocaleConfig},
    storage::{
        json_backend::{tmp_path, write_atomic},
        DEFAULT_STORAGE_KEY,
    },
    utils::paths::{app_data_dir, config_file_in, ensure_dir},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// User preferences persisted next to the transaction store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default)]
    pub timezone: ZonePolicy,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-IN".into(),
            currency: "INR".into(),
            timezone: ZonePolicy::Local,
            storage_key: default_storage_key(),
            export_dir: None,
        }
    }
}

/// Settings that can be changed with [`Config::set`].
pub const SETTABLE_KEYS: [&str; 4] = ["locale", "currency", "timezone", "export-dir"];

impl Config {
    pub fn locale_config(&self) -> Result<LocaleConfig, ConfigError> {
        LocaleConfig::for_tag(&self.locale)
            .ok_or_else(|| ConfigError::Invalid(format!("unsupported locale `{}`", self.locale)))
    }

    pub fn formatter(&self) -> Result<CurrencyFormatter, ConfigError> {
        Ok(CurrencyFormatter::new(
            CurrencyCode::new(self.currency.clone()),
            self.locale_config()?,
        ))
    }

    /// Directory receiving exported reports; the working directory when unset.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Updates a single setting, validating the value first.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "locale" => {
                LocaleConfig::for_tag(value)
                    .ok_or_else(|| ConfigError::Invalid(format!("unsupported locale `{value}`")))?;
                self.locale = value.to_string();
            }
            "currency" => {
                let valid = value.len() == 3 && value.chars().all(|c| c.is_ascii_alphabetic());
                if !valid {
                    return Err(ConfigError::Invalid(format!(
                        "currency must be a three letter ISO code, got `{value}`"
                    )));
                }
                self.currency = value.to_ascii_uppercase();
            }
            "timezone" => {
                self.timezone =
                    ZonePolicy::parse(value).map_err(|err| ConfigError::Invalid(err.to_string()))?;
            }
            "export-dir" => {
                self.export_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown setting `{other}` (expected one of {})",
                    SETTABLE_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

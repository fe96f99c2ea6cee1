//! TOML-based application configuration.
//!
//! Stores:
//! - Location of the schedule store and the notification outbox
//! - Notification defaults (sender, subject, signature, hidden metadata keys)
//!
//! Configuration is stored at `~/.config/labsched/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Sender address placed on outgoing messages.
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_signature")]
    pub signature: String,
    /// Metadata keys left out of message bodies.
    #[serde(default = "default_ignored_keys")]
    pub ignored_keys: Vec<String>,
    #[serde(default)]
    pub smtp: SmtpConfig,
}

/// SMTP relay used by `--delivery smtp`.
///
/// `LABSCHED_SMTP_USER` and `LABSCHED_SMTP_PASSWORD` override the login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Upgrade the connection with STARTTLS; plaintext otherwise.
    #[serde(default = "default_starttls")]
    pub starttls: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/labsched/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schedule store file, relative to the data directory unless absolute.
    #[serde(default = "default_store_file")]
    pub store_file: String,
    /// Directory receiving rendered messages, relative to the data directory
    /// unless absolute.
    #[serde(default = "default_outbox_dir")]
    pub outbox_dir: String,
    #[serde(default)]
    pub notify: NotifyConfig,
}

// Default functions
fn default_store_file() -> String {
    "schedules.json".into()
}
fn default_outbox_dir() -> String {
    "outbox".into()
}
fn default_subject() -> String {
    "LAB SCHEDULE".into()
}
fn default_signature() -> String {
    "Management".into()
}
fn default_ignored_keys() -> Vec<String> {
    vec!["file".into(), "id".into()]
}
fn default_smtp_host() -> String {
    "smtp.gmail.com".into()
}
fn default_smtp_port() -> u16 {
    587
}
fn default_starttls() -> bool {
    true
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: None,
            password: None,
            starttls: default_starttls(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            sender: None,
            subject: default_subject(),
            signature: default_signature(),
            ignored_keys: default_ignored_keys(),
            smtp: SmtpConfig::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_file: default_store_file(),
            outbox_dir: default_outbox_dir(),
            notify: NotifyConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Array(_) => {
                        let parsed: serde_json::Value =
                            serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?;
                        if !parsed.is_array() {
                            return Err(invalid("expected a JSON array".into()));
                        }
                        parsed
                    }
                    serde_json::Value::Object(_) => return Err(invalid("not a leaf key".into())),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or create the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    ///
    /// An existing file that cannot be read is an error and is left untouched.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| load_failed(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    ///
    /// Unset optional values read as an empty string; unknown keys are `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some(String::new()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |e: serde_json::Error| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        };
        let mut json = serde_json::to_value(&*self).map_err(invalid)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(invalid)?;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Schedule store location. LABSCHED_STORE overrides the configured file.
    pub fn store_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os("LABSCHED_STORE") {
            return Ok(PathBuf::from(path));
        }
        Ok(data_dir()?.join(&self.store_file))
    }

    pub fn outbox_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join(&self.outbox_dir))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

//! Reloadable key/value configuration
//!
//! Configuration is a flat string-keyed table backed by an optional TOML
//! file. `reload()` re-reads the file so long-running schedulers pick up
//! edits between cycles. Typed accessors cover the keys the orchestrator
//! consults; everything else goes through `get_str`/`get_bool_or_else`.

use janitor_common::defaults::{
    DEFAULT_ENABLED, DEFAULT_LEASHED, DEFAULT_REGION, DEFAULT_SUMMARY_EMAIL_ENABLED, KEY_ACCOUNT_NAME,
    KEY_ENABLED, KEY_LEASHED, KEY_REGION, KEY_SUMMARY_EMAIL_ENABLED, KEY_SUMMARY_EMAIL_TO,
};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration file
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A value that should be a table leaf was a nested structure
    #[error("Config key '{0}' has a non-scalar value")]
    NonScalar(String),
}

/// Flat key/value configuration with file-backed reload
#[derive(Debug, Clone)]
pub struct JanitorConfig {
    path: Option<PathBuf>,
    values: HashMap<String, String>,
}

impl JanitorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let mut cfg = Self {
            path: Some(path.into()),
            values: HashMap::new(),
        };
        cfg.reload()?;
        Ok(cfg)
    }

    /// Build from an in-memory map. `reload()` is a no-op for these.
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self { path: None, values }
    }

    /// All defaults, no backing file.
    pub fn empty() -> Self {
        Self::from_map(HashMap::new())
    }

    /// Re-read the backing file, replacing the current values.
    ///
    /// Nested TOML tables flatten into dotted keys, so
    /// `[janitor.summary_email] to = "x"` and
    /// `"janitor.summary_email.to" = "x"` are equivalent.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table: toml::Table = raw.parse().map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        let mut values = HashMap::new();
        flatten_table(String::new(), &table, &mut values)?;
        self.values = values;
        Ok(())
    }

    /// Get a string value, `None` when unset or empty.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Get a boolean, falling back to `default` when unset or unparseable.
    pub fn get_bool_or_else(&self, key: &str, default: bool) -> bool {
        match self.values.get(key).map(String::as_str) {
            Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            _ => default,
        }
    }

    // ── Typed accessors for the orchestrator ───────────────────────────

    /// Master enablement switch; disabled cycles are inert no-ops.
    pub fn enabled(&self) -> bool {
        self.get_bool_or_else(KEY_ENABLED, DEFAULT_ENABLED)
    }

    /// Leashed mode suppresses individual notifications (safety default).
    pub fn leashed(&self) -> bool {
        self.get_bool_or_else(KEY_LEASHED, DEFAULT_LEASHED)
    }

    /// Whether to send the per-cycle summary email.
    pub fn summary_email_enabled(&self) -> bool {
        self.get_bool_or_else(KEY_SUMMARY_EMAIL_ENABLED, DEFAULT_SUMMARY_EMAIL_ENABLED)
    }

    /// Summary email recipient; `None` (empty) disables the summary.
    pub fn summary_email_to(&self) -> Option<&str> {
        self.get_str(KEY_SUMMARY_EMAIL_TO)
    }

    /// Home region used when an opt call omits the region.
    pub fn region(&self) -> &str {
        self.get_str(KEY_REGION).unwrap_or(DEFAULT_REGION)
    }

    /// Account name shown in the summary subject.
    pub fn account_name(&self) -> &str {
        self.get_str(KEY_ACCOUNT_NAME).unwrap_or("unknown")
    }
}

/// Flatten nested TOML tables into dotted string keys.
fn flatten_table(
    prefix: String,
    table: &toml::Table,
    out: &mut HashMap<String, String>,
) -> Result<(), ConfigError> {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(inner) => flatten_table(full_key, inner, out)?,
            toml::Value::String(s) => {
                out.insert(full_key, s.clone());
            }
            toml::Value::Boolean(b) => {
                out.insert(full_key, b.to_string());
            }
            toml::Value::Integer(i) => {
                out.insert(full_key, i.to_string());
            }
            toml::Value::Float(f) => {
                out.insert(full_key, f.to_string());
            }
            toml::Value::Datetime(dt) => {
                out.insert(full_key, dt.to_string());
            }
            toml::Value::Array(_) => return Err(ConfigError::NonScalar(full_key)),
        }
    }
    Ok(())
}

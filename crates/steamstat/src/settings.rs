//! User-facing plugin settings and their JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use steamstat_fs::{Options, atomic_read, atomic_write};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unknown setting '{0}'")]
    UnknownKey(String),

    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Plugin settings. Unknown keys never survive a load or an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub gateway_url: String,
    pub gateway_api_key: String,
    pub refresh_interval_seconds: u64,
    pub show_regions: bool,
    pub show_history: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gateway_url: String::new(),
            gateway_api_key: String::new(),
            refresh_interval_seconds: 120,
            show_regions: true,
            show_history: true,
        }
    }
}

impl Settings {
    /// Names of every known setting.
    pub fn keys() -> Vec<String> {
        Self::default().to_map().into_iter().map(|(k, _)| k).collect()
    }

    /// Overlay a loaded document on the defaults.
    ///
    /// Unknown keys and values of the wrong type are dropped, so a stale or
    /// hand-edited file still yields a complete set of settings.
    pub fn merge(loaded: &Value) -> Self {
        let Some(object) = loaded.as_object() else {
            warn!("settings document is not an object, using defaults");
            return Self::default();
        };

        object.iter().fold(Self::default(), |settings, (key, value)| {
            match settings.with_value(key, value.clone()) {
                Ok(updated) => updated,
                Err(e) => {
                    warn!(error = %e, "setting ignored");
                    settings
                }
            }
        })
    }

    /// Copy of `self` with `key` set to `value`.
    pub fn with_value(&self, key: &str, value: Value) -> Result<Self, SettingsError> {
        let mut map = self.to_map();
        if !map.contains_key(key) {
            return Err(SettingsError::UnknownKey(key.to_string()));
        }
        map.insert(key.to_string(), value);
        serde_json::from_value(Value::Object(map)).map_err(|e| SettingsError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn get(&self, key: &str) -> Option<Value> { self.to_map().remove(key) }

    pub fn to_value(&self) -> Value { Value::Object(self.to_map()) }

    fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// `settings.json` on disk.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }

    /// Read settings, falling back to defaults when the file is missing or
    /// unusable.
    pub fn load(&self) -> Settings {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no settings file, using defaults");
            return Settings::default();
        }
        let parsed = atomic_read(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).map_err(|e| e.to_string()));
        match parsed {
            Ok(value) => Settings::merge(&value),
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to load settings");
                Settings::default()
            }
        }
    }

    /// Write `settings` as pretty JSON. Failures are logged and reported as
    /// `false`.
    pub fn save(&self, settings: &Settings) -> bool {
        let write = || -> Result<(), String> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
            let body = serde_json::to_vec_pretty(settings).map_err(|e| e.to_string())?;
            atomic_write(&self.path, &body, Options::new()).map_err(|e| e.to_string())
        };
        match write() {
            Ok(()) => true,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to save settings");
                false
            }
        }
    }
}

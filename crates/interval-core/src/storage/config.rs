//! TOML-based application configuration.
//!
//! Stores start-up preferences:
//! - Default work/rest lengths, repetitions, theme and mute state
//! - Engine timing (tick period and debounce windows)
//! - Notification preferences
//!
//! Configuration is stored at `~/.config/interval-timer/config.toml`.
//! Edits made to a running timer are never written back here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::{EngineSettings, IntervalLength, Theme, TimerConfiguration};

/// Values a fresh timer starts with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub work_minutes: u32,
    #[serde(default = "default_work_seconds")]
    pub work_seconds: u32,
    #[serde(default = "default_rest_minutes")]
    pub rest_minutes: u32,
    #[serde(default)]
    pub rest_seconds: u32,
    #[serde(default = "default_repetitions")]
    pub repetitions: u32,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub muted: bool,
}

/// Engine timing, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_edit_debounce_ms")]
    pub edit_debounce_ms: u64,
    #[serde(default = "default_reset_debounce_ms")]
    pub reset_debounce_ms: u64,
    #[serde(default = "default_mute_debounce_ms")]
    pub mute_debounce_ms: u64,
    #[serde(default = "default_start_cue_delay_ms")]
    pub start_cue_delay_ms: u64,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_notification_duration_ms")]
    pub duration_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/interval-timer/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_work_seconds() -> u32 {
    40
}
fn default_rest_minutes() -> u32 {
    1
}
fn default_repetitions() -> u32 {
    3
}
fn default_tick_ms() -> u64 {
    1000
}
fn default_edit_debounce_ms() -> u64 {
    50
}
fn default_reset_debounce_ms() -> u64 {
    5000
}
fn default_mute_debounce_ms() -> u64 {
    1000
}
fn default_start_cue_delay_ms() -> u64 {
    100
}
fn default_notification_duration_ms() -> u64 {
    3000
}
fn default_true() -> bool {
    true
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            work_minutes: 0,
            work_seconds: default_work_seconds(),
            rest_minutes: default_rest_minutes(),
            rest_seconds: 0,
            repetitions: default_repetitions(),
            theme: Theme::default(),
            muted: false,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            edit_debounce_ms: default_edit_debounce_ms(),
            reset_debounce_ms: default_reset_debounce_ms(),
            mute_debounce_ms: default_mute_debounce_ms(),
            start_cue_delay_ms: default_start_cue_delay_ms(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: default_notification_duration_ms(),
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
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("not a leaf key".to_string()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of `config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, in memory only. The new value must have
    /// the same type as the old one and must deserialize (so `defaults.theme`
    /// only takes known theme names).
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// The timer configuration a fresh engine starts with.
    pub fn timer_configuration(&self) -> TimerConfiguration {
        let d = &self.defaults;
        TimerConfiguration::new(
            IntervalLength::new(i64::from(d.work_minutes), i64::from(d.work_seconds)),
            IntervalLength::new(i64::from(d.rest_minutes), i64::from(d.rest_seconds)),
            i64::from(d.repetitions),
        )
        .with_theme(d.theme)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        let t = &self.timing;
        EngineSettings {
            // A zero period would make tokio's interval panic.
            tick_period: Duration::from_millis(t.tick_ms.max(1)),
            edit_debounce: Duration::from_millis(t.edit_debounce_ms),
            reset_debounce: Duration::from_millis(t.reset_debounce_ms),
            mute_debounce: Duration::from_millis(t.mute_debounce_ms),
            start_cue_delay: Duration::from_millis(t.start_cue_delay_ms),
            notifications_enabled: self.notifications.enabled,
            notification_duration_ms: self.notifications.duration_ms,
        }
    }
}

//! TOML-based application configuration.
//!
//! Stores the day window and the planner tuning knobs. Configuration is
//! stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::planner::PlannerConfig;
use crate::time::parse_time;

/// Day window, as human time strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayConfig {
    #[serde(default = "default_day_start")]
    pub start: String,
    #[serde(default = "default_day_end")]
    pub end: String,
}

/// Planner tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerSettings {
    #[serde(default = "default_block_minutes")]
    pub block_minutes: i32,
    #[serde(default = "default_max_break_minutes")]
    pub max_break_minutes: i32,
    #[serde(default = "default_true")]
    pub adaptive_breaks: bool,
    #[serde(default = "default_tired")]
    pub tired: u8,
    #[serde(default = "default_lecture_buffer")]
    pub lecture_buffer: i32,
    #[serde(default = "default_min_gap")]
    pub min_gap: i32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub day: DayConfig,
    #[serde(default)]
    pub planner: PlannerSettings,
}

fn default_day_start() -> String {
    "8:00 am".into()
}
fn default_day_end() -> String {
    "10:00 pm".into()
}
fn default_block_minutes() -> i32 {
    60
}
fn default_max_break_minutes() -> i32 {
    60
}
fn default_true() -> bool {
    true
}
fn default_tired() -> u8 {
    3
}
fn default_lecture_buffer() -> i32 {
    30
}
fn default_min_gap() -> i32 {
    10
}

impl Default for DayConfig {
    fn default() -> Self {
        Self {
            start: default_day_start(),
            end: default_day_end(),
        }
    }
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            block_minutes: default_block_minutes(),
            max_break_minutes: default_max_break_minutes(),
            adaptive_breaks: true,
            tired: default_tired(),
            lecture_buffer: default_lecture_buffer(),
            min_gap: default_min_gap(),
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
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => value
                    .parse::<i64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("not a leaf value".to_string()))
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if no file exists.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CoreError::from(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result is not a valid configuration.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.planner_config()?;
        *self = updated;
        Ok(())
    }

    /// Convert into the engine's configuration, parsing the day window.
    ///
    /// # Errors
    /// Returns an error for an unparseable time or an invalid window.
    pub fn planner_config(&self) -> Result<PlannerConfig> {
        let config = PlannerConfig {
            day_start: parse_time(&self.day.start)?,
            day_end: parse_time(&self.day.end)?,
            block_size: self.planner.block_minutes,
            max_break: self.planner.max_break_minutes,
            adaptive_breaks: self.planner.adaptive_breaks,
            tired: self.planner.tired,
            lecture_buffer: self.planner.lecture_buffer,
            min_gap: self.planner.min_gap,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.day.start, "8:00 am");
        assert_eq!(parsed.planner.block_minutes, 60);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[planner]\ntired = 7\n").unwrap();
        assert_eq!(parsed.planner.tired, 7);
        assert_eq!(parsed.planner.min_gap, 10);
        assert_eq!(parsed.day.end, "10:00 pm");
    }

    #[test]
    fn default_planner_config() {
        let cfg = Config::default().planner_config().unwrap();
        assert_eq!(cfg, PlannerConfig::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("planner.adaptive_breaks").as_deref(), Some("true"));
        assert_eq!(cfg.get("planner.block_minutes").as_deref(), Some("60"));
        assert_eq!(cfg.get("day.start").as_deref(), Some("8:00 am"));
        assert!(cfg.get("planner.missing_key").is_none());
        assert!(cfg.get("planner").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("planner.tired", "8").unwrap();
        cfg.set("planner.adaptive_breaks", "false").unwrap();
        cfg.set("day.end", "9pm").unwrap();
        assert_eq!(cfg.planner.tired, 8);
        assert!(!cfg.planner.adaptive_breaks);
        assert_eq!(cfg.planner_config().unwrap().day_end, 21 * 60);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("planner.nonexistent", "1").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("planner.adaptive_breaks", "maybe").is_err());
        assert!(cfg.set("planner.block_minutes", "lots").is_err());
        assert_eq!(cfg.planner.block_minutes, 60);
    }

    #[test]
    fn set_rejects_inverted_day_window() {
        let mut cfg = Config::default();
        let err = cfg.set("day.start", "11pm").unwrap_err();
        assert!(matches!(err, CoreError::Plan(PlanError::InvalidDayWindow { .. })));
        assert_eq!(cfg.day.start, "8:00 am");
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.planner.max_break_minutes, 60);
        assert!(path.exists());

        let mut cfg = cfg;
        cfg.planner.block_minutes = 45;
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().planner.block_minutes, 45);
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "planner = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path).unwrap_err(),
            CoreError::Config(ConfigError::LoadFailed { .. })
        ));
    }
}

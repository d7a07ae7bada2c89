//! TOML-based application configuration.
//!
//! Stores:
//! - The default user whose task collection is opened
//! - The rendered timeline window and its scale
//! - The auto-schedule working window and slot step
//!
//! Configuration is stored at `~/.config/dayplanner/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::scheduler::SchedulerConfig;
use crate::timeline::TimelineConfig;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dayplanner/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// User whose tasks are loaded when none is given explicitly.
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

fn default_user() -> String {
    "default".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: default_user(),
            timeline: TimelineConfig::default(),
            scheduler: SchedulerConfig::default(),
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
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Location of `config.toml` in the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        let cfg: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
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
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
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

    /// Set a value by dot-separated key. The result must still validate;
    /// on error `self` is left unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check window bounds and scale.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        let t = &self.timeline;
        if t.end_hour > 24 {
            return Err(invalid("timeline.end_hour", "must be at most 24"));
        }
        if t.start_hour >= t.end_hour {
            return Err(invalid("timeline.start_hour", "must be before timeline.end_hour"));
        }
        if !(t.px_per_hour.is_finite() && t.px_per_hour > 0.0) {
            return Err(invalid("timeline.px_per_hour", "must be a positive number"));
        }

        let s = &self.scheduler;
        if s.work_end_hour > 24 {
            return Err(invalid("scheduler.work_end_hour", "must be at most 24"));
        }
        if s.work_start_hour >= s.work_end_hour {
            return Err(invalid(
                "scheduler.work_start_hour",
                "must be before scheduler.work_end_hour",
            ));
        }
        if s.step_minutes == 0 {
            return Err(invalid("scheduler.step_minutes", "must be greater than zero"));
        }
        if self.user.trim().is_empty() {
            return Err(invalid("user", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.scheduler.work_start_hour, 8);
        assert_eq!(parsed.scheduler.work_end_hour, 20);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[timeline]\nstart_hour = 6\n").unwrap();
        assert_eq!(parsed.timeline.start_hour, 6);
        assert_eq!(parsed.timeline.end_hour, 24);
        assert_eq!(parsed.user, "default");
        assert_eq!(parsed.scheduler, SchedulerConfig::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timeline.start_hour").as_deref(), Some("0"));
        assert_eq!(cfg.get("scheduler.step_minutes").as_deref(), Some("15"));
        assert_eq!(cfg.get("user").as_deref(), Some("default"));
        assert!(cfg.get("timeline.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_numbers_and_strings() {
        let mut cfg = Config::default();
        cfg.set("timeline.px_per_hour", "80").unwrap();
        cfg.set("scheduler.work_start_hour", "9").unwrap();
        cfg.set("user", "alice").unwrap();
        assert_eq!(cfg.timeline.px_per_hour, 80.0);
        assert_eq!(cfg.scheduler.work_start_hour, 9);
        assert_eq!(cfg.user, "alice");
    }

    #[test]
    fn set_rejects_unknown_keys_and_sections() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("timeline.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("timeline", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_rejects_bad_values_without_mutating() {
        let mut cfg = Config::default();
        assert!(cfg.set("timeline.start_hour", "six").is_err());
        assert!(cfg.set("timeline.start_hour", "6.5").is_err());
        assert!(cfg.set("scheduler.work_start_hour", "20").is_err());
        assert!(cfg.set("scheduler.step_minutes", "0").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn validate_checks_windows() {
        let mut cfg = Config::default();
        cfg.timeline.end_hour = 25;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.timeline.px_per_hour = 0.0;
        assert!(cfg.validate().is_err());

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let mut cfg = Config::default();
        cfg.set("timeline.start_hour", "6").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().timeline.start_hour, 6);

        std::fs::write(&path, "timeline = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }
}

//! Application configuration.
//!
//! Stores:
//! - Platform usernames
//! - Storage directory for history and output files
//! - Output mode (snapshot file only, or snapshot plus `stats.json`)
//! - Widget colors and fire icon names
//! - Endpoint base URLs and request timeouts
//!
//! Configuration lives next to the executable as `config.toml`. A legacy
//! `config.json` in the same place is still honored when no TOML file exists.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

pub const CONFIG_FILE: &str = "config.toml";
pub const LEGACY_CONFIG_FILE: &str = "config.json";

const HISTORY_FILE: &str = "history.json";
const VARIABLES_FILE: &str = "variables.inc";
const STATS_JSON_FILE: &str = "stats.json";
const DEBUG_LOG_FILE: &str = "debug.log";

/// Which consumer-facing files a run writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// `variables.inc` plus the stdout line.
    #[default]
    #[serde(alias = "rainmeter")]
    SnapshotFile,
    /// Everything in `SnapshotFile`, mirrored to `stats.json`.
    #[serde(alias = "json")]
    StructuredFile,
}

/// Widget colors (`R,G,B,A`) and fire icon file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    #[serde(default = "default_muted_color")]
    pub muted_color: String,
    #[serde(default = "default_day_active_color")]
    pub day_active_color: String,
    #[serde(default = "default_day_inactive_color")]
    pub day_inactive_color: String,
    #[serde(default = "default_fire_on_image")]
    pub fire_on_image: String,
    #[serde(default = "default_fire_off_image")]
    pub fire_off_image: String,
}

/// Base URLs for each source. Overridable so tests can point at a local server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_leetcode_base_url")]
    pub leetcode_base_url: String,
    #[serde(default = "default_gfg_profile_base_url")]
    pub gfg_profile_base_url: String,
    #[serde(default = "default_gfg_mirror_base_url")]
    pub gfg_mirror_base_url: String,
}

/// Per-request timeouts in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_10")]
    pub leetcode_secs: u64,
    #[serde(default = "default_15")]
    pub gfg_profile_secs: u64,
    #[serde(default = "default_10")]
    pub gfg_mirror_secs: u64,
}

/// Application configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_leetcode_username")]
    pub leetcode_username: String,
    #[serde(default = "default_gfg_username")]
    pub gfg_username: String,
    /// Folder for history, snapshot and log files; relative paths resolve
    /// against the executable's directory. Empty means the executable's directory.
    #[serde(default, alias = "storage_directory")]
    pub base_dir: Option<PathBuf>,
    #[serde(default, alias = "output_format")]
    pub output_mode: OutputMode,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub endpoints: EndpointConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

/// Resolved locations of every file a run touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoragePaths {
    pub dir: PathBuf,
    pub history: PathBuf,
    pub variables: PathBuf,
    pub stats_json: PathBuf,
    pub debug_log: PathBuf,
}

// Default functions
fn default_leetcode_username() -> String {
    "your_leetcode_username".into()
}
fn default_gfg_username() -> String {
    "your_gfg_username".into()
}
fn default_accent_color() -> String {
    "255,150,0,255".into()
}
fn default_muted_color() -> String {
    "150,150,150,255".into()
}
fn default_day_active_color() -> String {
    "255,255,255,255".into()
}
fn default_day_inactive_color() -> String {
    "60,60,60,255".into()
}
fn default_fire_on_image() -> String {
    "fireon.png".into()
}
fn default_fire_off_image() -> String {
    "fireoff.png".into()
}
fn default_leetcode_base_url() -> String {
    "https://leetcode.com".into()
}
fn default_gfg_profile_base_url() -> String {
    "https://www.geeksforgeeks.org".into()
}
fn default_gfg_mirror_base_url() -> String {
    "https://geeks-for-geeks-stats-card.vercel.app".into()
}
fn default_10() -> u64 {
    10
}
fn default_15() -> u64 {
    15
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            accent_color: default_accent_color(),
            muted_color: default_muted_color(),
            day_active_color: default_day_active_color(),
            day_inactive_color: default_day_inactive_color(),
            fire_on_image: default_fire_on_image(),
            fire_off_image: default_fire_off_image(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            leetcode_base_url: default_leetcode_base_url(),
            gfg_profile_base_url: default_gfg_profile_base_url(),
            gfg_mirror_base_url: default_gfg_mirror_base_url(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            leetcode_secs: 10,
            gfg_profile_secs: 15,
            gfg_mirror_secs: 10,
        }
    }
}

impl TimeoutConfig {
    pub fn leetcode(&self) -> Duration {
        Duration::from_secs(self.leetcode_secs.max(1))
    }
    pub fn gfg_profile(&self) -> Duration {
        Duration::from_secs(self.gfg_profile_secs.max(1))
    }
    pub fn gfg_mirror(&self) -> Duration {
        Duration::from_secs(self.gfg_mirror_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            leetcode_username: default_leetcode_username(),
            gfg_username: default_gfg_username(),
            base_dir: None,
            output_mode: OutputMode::default(),
            display: DisplayConfig::default(),
            endpoints: EndpointConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl Config {
    /// Default config location inside `dir`: `config.toml`, or the legacy
    /// `config.json` when only that one exists.
    pub fn default_path_in(dir: &Path) -> PathBuf {
        let toml_path = dir.join(CONFIG_FILE);
        let json_path = dir.join(LEGACY_CONFIG_FILE);
        if !toml_path.exists() && json_path.exists() {
            json_path
        } else {
            toml_path
        }
    }

    /// Load from `path`. The format follows the extension: `.json` is read as
    /// JSON, anything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let parse_failed = |message: String| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            message,
        };
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&content).map_err(|e| parse_failed(e.to_string()))
        } else {
            toml::from_str(&content).map_err(|e| parse_failed(e.to_string()))
        }
    }

    /// Storage paths with relative `base_dir` resolved against `anchor`.
    pub fn paths_relative_to(&self, anchor: &Path) -> StoragePaths {
        let dir = match self.base_dir.as_deref() {
            Some(base) if !base.as_os_str().is_empty() => {
                if base.is_absolute() {
                    base.to_path_buf()
                } else {
                    anchor.join(base)
                }
            }
            _ => anchor.to_path_buf(),
        };
        StoragePaths {
            history: dir.join(HISTORY_FILE),
            variables: dir.join(VARIABLES_FILE),
            stats_json: dir.join(STATS_JSON_FILE),
            debug_log: dir.join(DEBUG_LOG_FILE),
            dir,
        }
    }

    /// Storage paths anchored at the executable's directory.
    pub fn paths(&self) -> StoragePaths {
        self.paths_relative_to(&super::executable_dir())
    }

    /// Render as TOML for display.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

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

    /// Get a config value as string by dot-separated key (e.g. `display.accent_color`).
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

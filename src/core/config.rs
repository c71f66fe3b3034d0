//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{DrawerError, Result};
use crate::logger::jsonl::JsonlConfig;

/// Full app drawer configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
}

/// Grid layout knobs consumed by the section builder and merger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Apps per grid row.
    pub columns: usize,
    /// Emit a header item at every section start (suppressed while a filter is active).
    pub section_headers: bool,
    /// Merge sections whose trailing row is under-filled.
    pub merge_sections: bool,
}

/// Activity log settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Master switch; when false no activity log is opened.
    pub enabled: bool,
    pub jsonl_path: PathBuf,
    pub fallback_path: Option<PathBuf>,
    pub max_size_bytes: u64,
    pub max_rotated_files: u32,
    pub fsync_interval_secs: u64,
}

/// Filesystem paths used by the drawer tooling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: 5,
            section_headers: true,
            merge_sections: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let data = home_dir().join(".local").join("share").join("app-drawer");
        Self {
            enabled: false,
            jsonl_path: data.join("activity.jsonl"),
            fallback_path: None,
            max_size_bytes: 16 * 1024 * 1024,
            max_rotated_files: 3,
            fsync_interval_secs: 10,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            config_file: home_dir()
                .join(".config")
                .join("app-drawer")
                .join("config.toml"),
        }
    }
}

impl LoggingConfig {
    /// Writer settings for the JSONL activity log.
    #[must_use]
    pub fn jsonl(&self) -> JsonlConfig {
        JsonlConfig {
            path: self.jsonl_path.clone(),
            fallback_path: self.fallback_path.clone(),
            max_size_bytes: self.max_size_bytes,
            max_rotated_files: self.max_rotated_files,
            fsync_interval_secs: self.fsync_interval_secs,
        }
    }
}

impl LayoutConfig {
    /// Reject layouts the section merger cannot divide by.
    pub fn validate(&self) -> Result<()> {
        validate_columns(self.columns)
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| DrawerError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(DrawerError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for the activity log.
    ///
    /// FNV-1a over the canonical JSON so the value is stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        // layout
        if let Some(raw) = lookup("APP_DRAWER_LAYOUT_COLUMNS") {
            self.layout.columns = parse_env_usize("APP_DRAWER_LAYOUT_COLUMNS", &raw)?;
        }
        if let Some(raw) = lookup("APP_DRAWER_LAYOUT_SECTION_HEADERS") {
            self.layout.section_headers =
                parse_env_bool("APP_DRAWER_LAYOUT_SECTION_HEADERS", &raw)?;
        }
        if let Some(raw) = lookup("APP_DRAWER_LAYOUT_MERGE_SECTIONS") {
            self.layout.merge_sections = parse_env_bool("APP_DRAWER_LAYOUT_MERGE_SECTIONS", &raw)?;
        }

        // logging
        if let Some(raw) = lookup("APP_DRAWER_LOGGING_ENABLED") {
            self.logging.enabled = parse_env_bool("APP_DRAWER_LOGGING_ENABLED", &raw)?;
        }
        if let Some(raw) = lookup("APP_DRAWER_LOGGING_JSONL_PATH") {
            self.logging.jsonl_path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("APP_DRAWER_LOGGING_MAX_SIZE_BYTES") {
            self.logging.max_size_bytes = parse_env_u64("APP_DRAWER_LOGGING_MAX_SIZE_BYTES", &raw)?;
        }

        Ok(())
    }

    /// Reject values the engine or the activity log cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;

        if self.logging.max_size_bytes == 0 {
            return Err(DrawerError::invalid("logging.max_size_bytes must be > 0"));
        }
        if self.logging.max_rotated_files == 0 {
            return Err(DrawerError::invalid("logging.max_rotated_files must be >= 1"));
        }
        if self.logging.enabled && self.logging.jsonl_path.as_os_str().is_empty() {
            return Err(DrawerError::invalid(
                "logging.jsonl_path cannot be empty when logging.enabled=true",
            ));
        }

        Ok(())
    }
}

/// Columns are a divisor in the merge arithmetic; zero is a caller contract violation.
pub fn validate_columns(columns: usize) -> Result<()> {
    if columns == 0 {
        return Err(DrawerError::invalid("layout.columns must be >= 1, got 0"));
    }
    Ok(())
}

fn home_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || {
            eprintln!("[ADR-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths");
            PathBuf::from("/tmp")
        },
        PathBuf::from,
    )
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_usize(name: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|error| DrawerError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

fn parse_env_u64(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|error| DrawerError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    raw.trim()
        .parse::<bool>()
        .map_err(|error| DrawerError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

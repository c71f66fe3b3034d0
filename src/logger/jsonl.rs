//! JSONL activity log: one self-contained JSON object per line.
//!
//! Each record is rendered to a full line in memory and written with a single
//! `write_all`, so a tailing reader never sees half a record.
//!
//! Degradation chain when the file cannot be written:
//! 1. Primary file path
//! 2. Optional fallback path
//! 3. stderr with an `[ADR-JSONL]` prefix
//! 4. Silent discard (list rebuilds never fail because of logging)

#![allow(missing_docs)]

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::core::errors::{DrawerError, Result};

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Activity the drawer records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ListRebuilt,
    ConfigLoaded,
    ConfigRejected,
}

/// Mutation that caused a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebuildTrigger {
    SetApps,
    AddApps,
    UpdateApps,
    RemoveApps,
    SetFilter,
    SetColumns,
}

impl fmt::Display for RebuildTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SetApps => "set_apps",
            Self::AddApps => "add_apps",
            Self::UpdateApps => "update_apps",
            Self::RemoveApps => "remove_apps",
            Self::SetFilter => "set_filter",
            Self::SetColumns => "set_columns",
        };
        f.write_str(label)
    }
}

/// One JSONL record. Only `ts`, `event` and `severity` are always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 UTC timestamp, millisecond precision.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<RebuildTrigger>,
    /// Registry size before filtering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apps: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<usize>,
    /// Sections absorbed by the merge pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_us: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            trigger: None,
            apps: None,
            filtered: None,
            sections: None,
            items: None,
            merged: None,
            columns: None,
            filter_active: None,
            duration_us: None,
            config_hash: None,
            error_code: None,
            error_message: None,
            details: None,
        }
    }

    /// Error record carrying the stable code of `error`.
    pub fn rejected(event: EventType, error: &DrawerError) -> Self {
        let mut entry = Self::new(event, Severity::Error);
        entry.error_code = Some(error.code().to_string());
        entry.error_message = Some(error.to_string());
        entry
    }
}

/// Where records currently go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    Primary,
    Fallback,
    Stderr,
    Discard,
}

impl fmt::Display for SinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
            Self::Stderr => "stderr",
            Self::Discard => "discard",
        };
        f.write_str(label)
    }
}

/// Configuration for the JSONL writer.
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    pub path: PathBuf,
    pub fallback_path: Option<PathBuf>,
    /// Rotate before a write would push the file past this size.
    pub max_size_bytes: u64,
    /// Rotated generations kept as `<path>.1` .. `<path>.N`.
    pub max_rotated_files: u32,
    pub fsync_interval_secs: u64,
}

/// Append-only JSONL writer with rotation and fallback.
pub struct JsonlWriter {
    config: JsonlConfig,
    file: Option<BufWriter<File>>,
    state: SinkState,
    bytes_written: u64,
    last_fsync: SystemTime,
}

impl JsonlWriter {
    /// Open the log, walking down the degradation chain on failure.
    pub fn open(config: JsonlConfig) -> Self {
        let mut writer = Self {
            config,
            file: None,
            state: SinkState::Discard,
            bytes_written: 0,
            last_fsync: SystemTime::now(),
        };
        writer.open_primary();
        writer
    }

    pub fn write_entry(&mut self, entry: &LogEntry) {
        match serde_json::to_string(entry) {
            Ok(json) => self.write_line(&format!("{json}\n")),
            Err(e) => {
                let _ = writeln!(io::stderr(), "[ADR-JSONL] serialize error: {e}");
            }
        }
    }

    pub fn flush(&mut self) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
    }

    #[must_use]
    pub fn state(&self) -> SinkState {
        self.state
    }

    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn write_line(&mut self, line: &str) {
        let len = line.len() as u64;
        if matches!(self.state, SinkState::Primary | SinkState::Fallback)
            && self.bytes_written > 0
            && self.bytes_written + len > self.config.max_size_bytes
        {
            self.rotate();
        }

        match self.state {
            SinkState::Primary | SinkState::Fallback => {
                let written = self
                    .file
                    .as_mut()
                    .is_some_and(|file| file.write_all(line.as_bytes()).is_ok());
                if written {
                    self.bytes_written += len;
                    self.maybe_fsync();
                } else {
                    self.degrade();
                    self.write_line(line);
                }
            }
            SinkState::Stderr => {
                let _ = write!(io::stderr(), "[ADR-JSONL] {line}");
            }
            SinkState::Discard => {}
        }
    }

    fn maybe_fsync(&mut self) {
        let elapsed = SystemTime::now()
            .duration_since(self.last_fsync)
            .unwrap_or(Duration::ZERO);
        if elapsed.as_secs() < self.config.fsync_interval_secs {
            return;
        }
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
            let _ = file.get_ref().sync_data();
        }
        self.last_fsync = SystemTime::now();
    }

    fn open_primary(&mut self) {
        if let Ok((file, size)) = open_append(&self.config.path) {
            self.attach(file, size, SinkState::Primary);
        } else {
            self.open_fallback();
        }
    }

    fn open_fallback(&mut self) {
        let opened = self
            .config
            .fallback_path
            .clone()
            .and_then(|path| open_append(&path).ok().map(|opened| (path, opened)));
        if let Some((path, (file, size))) = opened {
            let _ = writeln!(
                io::stderr(),
                "[ADR-JSONL] primary path failed, using fallback: {}",
                path.display()
            );
            self.attach(file, size, SinkState::Fallback);
        } else {
            let _ = writeln!(io::stderr(), "[ADR-JSONL] no writable log path, using stderr");
            self.file = None;
            self.state = SinkState::Stderr;
        }
    }

    fn attach(&mut self, file: File, size: u64, state: SinkState) {
        self.file = Some(BufWriter::with_capacity(16 * 1024, file));
        self.bytes_written = size;
        self.state = state;
    }

    fn degrade(&mut self) {
        self.file = None;
        match self.state {
            SinkState::Primary => self.open_fallback(),
            SinkState::Fallback => {
                let _ = writeln!(io::stderr(), "[ADR-JSONL] fallback write failed, using stderr");
                self.state = SinkState::Stderr;
            }
            SinkState::Stderr | SinkState::Discard => self.state = SinkState::Discard,
        }
    }

    fn current_path(&self) -> Option<PathBuf> {
        match self.state {
            SinkState::Primary => Some(self.config.path.clone()),
            SinkState::Fallback => self.config.fallback_path.clone(),
            SinkState::Stderr | SinkState::Discard => None,
        }
    }

    fn rotate(&mut self) {
        let Some(base) = self.current_path() else {
            return;
        };
        self.flush();
        self.file = None;

        // <base>.N-1 -> <base>.N, ..., <base> -> <base>.1; the oldest generation is dropped.
        let _ = fs::remove_file(rotated_name(&base, self.config.max_rotated_files));
        for generation in (1..self.config.max_rotated_files).rev() {
            let _ = fs::rename(
                rotated_name(&base, generation),
                rotated_name(&base, generation + 1),
            );
        }
        let _ = fs::rename(&base, rotated_name(&base, 1));

        match open_append(&base) {
            Ok((file, _)) => {
                let state = self.state;
                self.attach(file, 0, state);
            }
            Err(_) => self.degrade(),
        }
    }
}

impl fmt::Debug for JsonlWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonlWriter")
            .field("path", &self.config.path)
            .field("state", &self.state)
            .field("bytes_written", &self.bytes_written)
            .finish_non_exhaustive()
    }
}

/// Open or create a file for appending. Returns `(File, current_size)`.
fn open_append(path: &Path) -> Result<(File, u64)> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| DrawerError::io(parent, source))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| DrawerError::io(path, source))?;
    let size = file.metadata().map_or(0, |m| m.len());
    Ok((file, size))
}

/// `activity.jsonl` → `activity.jsonl.3`.
fn rotated_name(base: &Path, generation: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{generation}"));
    PathBuf::from(name)
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

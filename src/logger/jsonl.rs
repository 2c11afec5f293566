//! Activity log: append-only line-delimited JSON.
//!
//! Each line is a self-contained JSON object, assembled in memory and written
//! with a single `write_all` so a tailing reader never sees half a line.
//!
//! Fallback chain:
//! 1. Primary file path
//! 2. Fallback path (optional, e.g. a tmpfs location)
//! 3. stderr with `[HD-JSONL]` prefix
//! 4. Silent discard (the board must never stall on logging)

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions, rename};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::core::errors::{DashError, Result};

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Activity event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    BoardLoaded,
    FetchFailed,
    SessionUnlocked,
    SessionLocked,
    DropApplied,
    DropRejected,
    SaveSucceeded,
    SaveFailed,
    /// Requests the sync queue had to drop while it was full.
    SyncBackpressure,
    ProbeComplete,
}

/// A single activity line. Only `ts`, `event` and `severity` are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 UTC timestamp with milliseconds.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    /// Shortcut the event is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut_id: Option<u32>,
    /// Catalog size at the time of the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcuts: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorites: Option<usize>,
    /// Move shape or rejection reason label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Backend endpoint or store path involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    /// `HD-xxxx` code when something failed.
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
            shortcut_id: None,
            shortcuts: None,
            favorites: None,
            kind: None,
            endpoint: None,
            duration_ms: None,
            ok: None,
            error_code: None,
            error_message: None,
            details: None,
        }
    }

    /// Info-level entry.
    pub fn info(event: EventType) -> Self {
        Self::new(event, Severity::Info)
    }

    /// Attach a failure (`error_code`, `error_message`, `ok = false`).
    #[must_use]
    pub fn with_error(mut self, error: &DashError) -> Self {
        self.ok = Some(false);
        self.error_code = Some(error.code().to_string());
        self.error_message = Some(error.to_string());
        self
    }
}

/// Degradation state of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Normal,
    Fallback,
    Stderr,
    Discard,
}

/// Configuration for the JSONL writer.
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    pub path: PathBuf,
    pub fallback_path: Option<PathBuf>,
    /// Rotate once the current file would exceed this. Default: 8 MiB.
    pub max_size_bytes: u64,
    /// Rotated files kept (`.1` newest). Default: 3.
    pub max_rotated_files: u32,
    /// Seconds between forced fsync calls. Default: 10.
    pub fsync_interval_secs: u64,
}

impl JsonlConfig {
    /// Defaults for a given primary path, no fallback.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback_path: None,
            max_size_bytes: 8 * 1024 * 1024,
            max_rotated_files: 3,
            fsync_interval_secs: 10,
        }
    }
}

/// Append-only JSONL writer with rotation and fallback.
pub struct JsonlWriter {
    config: JsonlConfig,
    writer: Option<BufWriter<File>>,
    state: WriterState,
    bytes_written: u64,
    last_fsync: SystemTime,
}

impl JsonlWriter {
    /// Open the log file, falling through the degradation chain on failure.
    pub fn open(config: JsonlConfig) -> Self {
        let mut w = Self {
            config,
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
            last_fsync: SystemTime::now(),
        };
        w.try_open_primary();
        w
    }

    /// Write a single entry as one JSONL line.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                let _ = writeln!(io::stderr(), "[HD-JSONL] serialize error: {e}");
                return;
            }
        };
        self.write_line(&line);
    }

    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
    }

    /// Flush and fsync the underlying file.
    pub fn fsync(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
            let _ = w.get_ref().sync_data();
            self.last_fsync = SystemTime::now();
        }
    }

    /// Current degradation state.
    pub fn state(&self) -> &'static str {
        match self.state {
            WriterState::Normal => "normal",
            WriterState::Fallback => "fallback",
            WriterState::Stderr => "stderr",
            WriterState::Discard => "discard",
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.state != WriterState::Normal
    }

    /// Try reopening the primary path after a degradation.
    pub fn try_recover(&mut self) {
        if self.state == WriterState::Normal {
            return;
        }
        if let Ok((file, size)) = open_append(&self.config.path) {
            self.flush();
            self.writer = Some(BufWriter::new(file));
            self.state = WriterState::Normal;
            self.bytes_written = size;
            let _ = writeln!(
                io::stderr(),
                "[HD-JSONL] recovered to primary path: {}",
                self.config.path.display()
            );
        }
    }

    // ──────────────────────── internals ────────────────────────

    fn write_line(&mut self, line: &str) {
        if self.bytes_written + line.len() as u64 > self.config.max_size_bytes
            && matches!(self.state, WriterState::Normal | WriterState::Fallback)
        {
            self.rotate();
        }

        match self.state {
            WriterState::Normal | WriterState::Fallback => {
                let Some(w) = self.writer.as_mut() else {
                    self.degrade();
                    self.write_line(line);
                    return;
                };
                if w.write_all(line.as_bytes()).is_err() {
                    self.degrade();
                    self.write_line(line);
                    return;
                }
                self.bytes_written += line.len() as u64;
                self.maybe_fsync();
            }
            WriterState::Stderr => {
                let _ = write!(io::stderr(), "[HD-JSONL] {line}");
            }
            WriterState::Discard => {}
        }
    }

    fn maybe_fsync(&mut self) {
        let elapsed = SystemTime::now()
            .duration_since(self.last_fsync)
            .unwrap_or(Duration::ZERO);
        if elapsed.as_secs() >= self.config.fsync_interval_secs {
            self.fsync();
        }
    }

    fn try_open_primary(&mut self) {
        match open_append(&self.config.path) {
            Ok((file, size)) => {
                self.writer = Some(BufWriter::new(file));
                self.state = WriterState::Normal;
                self.bytes_written = size;
            }
            Err(_) => self.try_open_fallback(),
        }
    }

    fn try_open_fallback(&mut self) {
        let Some(fb) = self.config.fallback_path.clone() else {
            self.state = WriterState::Stderr;
            let _ = writeln!(
                io::stderr(),
                "[HD-JSONL] primary path failed and no fallback configured, using stderr"
            );
            return;
        };
        match open_append(&fb) {
            Ok((file, size)) => {
                let _ = writeln!(
                    io::stderr(),
                    "[HD-JSONL] primary path failed, using fallback: {}",
                    fb.display()
                );
                self.writer = Some(BufWriter::new(file));
                self.state = WriterState::Fallback;
                self.bytes_written = size;
            }
            Err(_) => {
                self.state = WriterState::Stderr;
                let _ = writeln!(
                    io::stderr(),
                    "[HD-JSONL] primary and fallback paths failed, using stderr"
                );
            }
        }
    }

    fn degrade(&mut self) {
        self.writer = None;
        match self.state {
            WriterState::Normal => self.try_open_fallback(),
            WriterState::Fallback => {
                self.state = WriterState::Stderr;
                let _ = writeln!(io::stderr(), "[HD-JSONL] fallback write failed, using stderr");
            }
            WriterState::Stderr => self.state = WriterState::Discard,
            WriterState::Discard => {}
        }
    }

    fn rotate(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
        self.writer = None;

        let base = match (self.state, &self.config.fallback_path) {
            (WriterState::Normal, _) => self.config.path.clone(),
            (WriterState::Fallback, Some(fb)) => fb.clone(),
            _ => return,
        };

        // .N-1 → .N, …, .1 → .2, current → .1
        let _ = fs::remove_file(rotated_name(&base, self.config.max_rotated_files));
        for i in (1..self.config.max_rotated_files).rev() {
            let _ = rename(rotated_name(&base, i), rotated_name(&base, i + 1));
        }
        let _ = rename(&base, rotated_name(&base, 1));

        match open_append(&base) {
            Ok((file, _)) => {
                self.writer = Some(BufWriter::new(file));
                self.bytes_written = 0;
            }
            Err(_) => self.degrade(),
        }
    }
}

impl Drop for JsonlWriter {
    fn drop(&mut self) {
        self.flush();
    }
}

// ──────────────────────── helpers ────────────────────────

/// Open or create a file for appending. Returns `(File, current_size)`.
fn open_append(path: &Path) -> Result<(File, u64)> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| DashError::io(parent, source))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| DashError::io(path, source))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    Ok((file, size))
}

/// `activity.jsonl` → `activity.jsonl.3`.
fn rotated_name(base: &Path, index: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Read back every parseable entry of a log file, skipping malformed lines.
pub fn read_entries(path: &Path) -> Result<Vec<LogEntry>> {
    let raw = fs::read_to_string(path).map_err(|source| DashError::io(path, source))?;
    Ok(raw
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}

// ──────────────────────── tests ────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn config(path: PathBuf) -> JsonlConfig {
        JsonlConfig {
            fsync_interval_secs: 60,
            ..JsonlConfig::for_path(path)
        }
    }

    #[test]
    fn entries_are_separate_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.jsonl");
        let mut writer = JsonlWriter::open(config(path.clone()));

        writer.write_entry(&LogEntry::info(EventType::SessionUnlocked));
        let mut locked = LogEntry::info(EventType::SessionLocked);
        locked.shortcuts = Some(12);
        writer.write_entry(&locked);
        writer.flush();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed["event"], "session_locked");
        assert_eq!(parsed["severity"], "info");
        assert_eq!(parsed["shortcuts"], 12);
    }

    #[test]
    fn optional_fields_omitted_when_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sparse.jsonl");
        let mut writer = JsonlWriter::open(config(path.clone()));
        writer.write_entry(&LogEntry::info(EventType::BoardLoaded));
        writer.flush();

        let line = fs::read_to_string(&path).unwrap();
        assert!(!line.contains("\"shortcut_id\""));
        assert!(!line.contains("\"error_code\""));
    }

    #[test]
    fn with_error_records_code() {
        let entry = LogEntry::new(EventType::SaveFailed, Severity::Warning)
            .with_error(&DashError::backend("http://nas/api/save", "status 500"));
        assert_eq!(entry.ok, Some(false));
        assert_eq!(entry.error_code.as_deref(), Some("HD-3002"));
    }

    #[test]
    fn rotation_shifts_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rot.jsonl");
        let mut writer = JsonlWriter::open(JsonlConfig {
            max_size_bytes: 100,
            ..config(path.clone())
        });
        for _ in 0..10 {
            writer.write_entry(&LogEntry::info(EventType::ProbeComplete));
        }
        writer.flush();
        assert!(path.exists());
        assert!(rotated_name(&path, 1).exists());
        assert!(!rotated_name(&path, 4).exists());
    }

    #[test]
    fn fallback_when_primary_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();
        let fallback = dir.path().join("fallback.jsonl");
        let mut writer = JsonlWriter::open(JsonlConfig {
            fallback_path: Some(fallback.clone()),
            ..config(blocker.join("primary.jsonl"))
        });
        assert_eq!(writer.state(), "fallback");
        assert!(writer.is_degraded());
        writer.write_entry(&LogEntry::new(EventType::FetchFailed, Severity::Warning));
        writer.flush();
        assert_eq!(read_entries(&fallback).unwrap().len(), 1);
    }

    #[test]
    fn read_entries_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.jsonl");
        {
            let mut writer = JsonlWriter::open(config(path.clone()));
            writer.write_entry(&LogEntry::info(EventType::SaveSucceeded));
        }
        let mut raw = fs::read_to_string(&path).unwrap();
        raw.push_str("not json\n");
        fs::write(&path, raw).unwrap();
        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, EventType::SaveSucceeded);
    }
}

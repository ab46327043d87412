//! Logging service - structured diagnostic events
//!
//! Records events such as failed balance refreshes. Every event is mirrored
//! to `tracing`; the service also keeps them either in memory or in
//! `logs.jsonl` in the rekening directory so they can be listed later.
//! No balances, amounts or account numbers are ever logged.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

pub const LOG_FILE: &str = "logs.jsonl";

/// Detect the current platform
fn detect_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        "unknown"
    }
}

/// Entry point for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Cli,
    Embedded,
}

impl EntryPoint {
    fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Cli => "cli",
            EntryPoint::Embedded => "embedded",
        }
    }
}

/// A log event to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl LogEvent {
    /// Create a new log event with just an event name
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            source: None,
            page: None,
            command: None,
            error_message: None,
            error_details: None,
        }
    }

    /// Set the data source context (e.g., "http")
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the page route context
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Set the command context (for CLI events)
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Set error information
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Set error details (error chain, additional context)
    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }
}

/// A recorded log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub entry_point: String,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    pub source: Option<String>,
    pub page: Option<String>,
    pub command: Option<String>,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
}

impl LogEntry {
    pub fn is_error(&self) -> bool {
        self.error_message.is_some()
    }
}

enum LogStore {
    Memory(Mutex<Vec<LogEntry>>),
    /// The mutex serializes appends and rewrites of the file
    File { path: PathBuf, lock: Mutex<()> },
}

/// Service for structured event logging
pub struct LoggingService {
    store: LogStore,
    entry_point: EntryPoint,
    app_version: String,
    platform: &'static str,
}

impl LoggingService {
    /// Create a file-backed logging service
    ///
    /// Entries are appended to `logs.jsonl` in `dir`, which is created if
    /// missing.
    pub fn new(dir: &Path, entry_point: EntryPoint, app_version: impl Into<String>) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {:?}", dir))?;
        let path = dir.join(LOG_FILE);

        // Touch the file so stats and listing work before the first event
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {:?}", path))?;

        Ok(Self {
            store: LogStore::File {
                path,
                lock: Mutex::new(()),
            },
            entry_point,
            app_version: app_version.into(),
            platform: detect_platform(),
        })
    }

    /// Create a logging service that keeps entries in memory only
    pub fn in_memory(entry_point: EntryPoint, app_version: impl Into<String>) -> Self {
        Self {
            store: LogStore::Memory(Mutex::new(Vec::new())),
            entry_point,
            app_version: app_version.into(),
            platform: detect_platform(),
        }
    }

    /// Log an event
    ///
    /// The entry point, app version, and platform are added from the
    /// service configuration.
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let entry = LogEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            entry_point: self.entry_point.as_str().to_string(),
            app_version: self.app_version.clone(),
            platform: self.platform.to_string(),
            event: event.event,
            source: event.source,
            page: event.page,
            command: event.command,
            error_message: event.error_message,
            error_details: event.error_details,
        };

        emit(&entry);

        match &self.store {
            LogStore::Memory(entries) => {
                entries
                    .lock()
                    .map_err(|e| anyhow!("Lock poisoned: {}", e))?
                    .push(entry);
            }
            LogStore::File { path, lock } => {
                let _guard = lock.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                let line = serde_json::to_string(&entry)?;
                writeln!(file, "{}", line)?;
            }
        }

        Ok(())
    }

    /// Log a simple event with just a name
    pub fn log_event(&self, event: &str) -> Result<()> {
        self.log(LogEvent::new(event))
    }

    /// Log a CLI command execution
    pub fn log_command(&self, command: &str) -> Result<()> {
        self.log(LogEvent::new("command_executed").with_command(command))
    }

    /// Log a page mount
    pub fn log_page(&self, page: &str) -> Result<()> {
        self.log(LogEvent::new("page_mounted").with_page(page))
    }

    /// Log an error
    pub fn log_error(&self, event: &str, message: &str, details: Option<&str>) -> Result<()> {
        let mut log_event = LogEvent::new(event).with_error(message);
        if let Some(d) = details {
            log_event = log_event.with_error_details(d);
        }
        self.log(log_event)
    }

    fn all_entries(&self) -> Result<Vec<LogEntry>> {
        match &self.store {
            LogStore::Memory(entries) => Ok(entries
                .lock()
                .map_err(|e| anyhow!("Lock poisoned: {}", e))?
                .clone()),
            LogStore::File { path, lock } => {
                let _guard = lock.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
                read_entries(path)
            }
        }
    }

    /// Most recent entries first, up to `limit`
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let mut entries = self.all_entries()?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    /// Most recent entries carrying an error, up to `limit`
    pub fn get_errors(&self, limit: usize) -> Result<Vec<LogEntry>> {
        Ok(self
            .all_entries()?
            .into_iter()
            .rev()
            .filter(LogEntry::is_error)
            .take(limit)
            .collect())
    }

    /// Get the total number of log entries
    pub fn count(&self) -> Result<u64> {
        Ok(self.all_entries()?.len() as u64)
    }

    /// Delete entries recorded before `cutoff`
    pub fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        match &self.store {
            LogStore::Memory(entries) => {
                let mut entries = entries.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
                let before = entries.len();
                entries.retain(|e| e.timestamp >= cutoff);
                Ok((before - entries.len()) as u64)
            }
            LogStore::File { path, lock } => {
                let _guard = lock.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
                let entries = read_entries(path)?;
                let before = entries.len();
                let kept: Vec<&LogEntry> = entries.iter().filter(|e| e.timestamp >= cutoff).collect();

                let mut content = String::new();
                for entry in &kept {
                    content.push_str(&serde_json::to_string(entry)?);
                    content.push('\n');
                }
                std::fs::write(path, content)?;
                Ok((before - kept.len()) as u64)
            }
        }
    }

    /// Delete entries older than `days` days
    pub fn delete_older_than_days(&self, days: u64) -> Result<u64> {
        let cutoff = Utc::now() - ChronoDuration::days(days as i64);
        self.delete_before(cutoff)
    }

    /// Path to the log file, `None` for in-memory logging
    pub fn log_path(&self) -> Option<&Path> {
        match &self.store {
            LogStore::Memory(_) => None,
            LogStore::File { path, .. } => Some(path),
        }
    }
}

fn emit(entry: &LogEntry) {
    match &entry.error_message {
        Some(message) => error!(
            event = %entry.event,
            source = entry.source.as_deref().unwrap_or(""),
            page = entry.page.as_deref().unwrap_or(""),
            details = entry.error_details.as_deref().unwrap_or(""),
            "{}",
            message
        ),
        None => info!(
            event = %entry.event,
            source = entry.source.as_deref().unwrap_or(""),
            page = entry.page.as_deref().unwrap_or(""),
            command = entry.command.as_deref().unwrap_or(""),
            "event recorded"
        ),
    }
}

/// Read every parseable line; corrupt lines are skipped
fn read_entries(path: &Path) -> Result<Vec<LogEntry>> {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    Ok(BufReader::new(file)
        .lines()
        .filter_map(|line| line.ok())
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(&line).ok())
        .collect())
}

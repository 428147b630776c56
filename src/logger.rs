//! Process-wide logging for protonbar.
//!
//! Every invocation is short-lived and has no UI of its own, so log lines go
//! to an append-only file under the config dir and, with `--verbose`, to
//! stderr. The file is rotated to `<name>.1` once it grows past the
//! configured size.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::SystemTime;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Verbose debugging information
    Debug = 0,
    /// Informational messages about normal operation
    Info = 1,
    /// Warning messages about potential issues
    Warning = 2,
    /// Error messages about failures
    Error = 3,
}

impl LogLevel {
    /// Get the prefix string for this log level
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO ",
            Self::Warning => "WARN ",
            Self::Error => "ERROR",
        }
    }
}

/// A single log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub level: LogLevel,
    pub category: String,
    pub message: String,
}

impl LogEntry {
    /// Format the log entry as a structured line:
    /// `[HH:MM:SS] [LEVEL] CATEGORY: message`
    pub fn format(&self) -> String {
        let time_str = crate::utils::format_system_time_local(self.timestamp);
        format!(
            "[{}] [{}] {}: {}",
            time_str,
            self.level.prefix(),
            self.category,
            self.message
        )
    }
}

/// Where log lines are written.
#[derive(Debug, Clone, Default)]
pub struct LogSinks {
    /// Append-only log file, if enabled.
    pub file: Option<PathBuf>,
    /// Mirror every line to stderr.
    pub stderr: bool,
    /// Size in bytes after which the file is rotated. `0` disables rotation.
    pub rotation_size: u64,
}

struct Logger {
    min_level: LogLevel,
    sinks: LogSinks,
}

impl Logger {
    fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            sinks: LogSinks::default(),
        }
    }

    fn log(&mut self, level: LogLevel, category: &str, message: String) {
        if level < self.min_level {
            return;
        }

        let line = LogEntry {
            timestamp: SystemTime::now(),
            level,
            category: category.to_string(),
            message,
        }
        .format();

        if self.sinks.stderr {
            eprintln!("{line}");
        }

        if let Some(path) = &self.sinks.file {
            // Logging must never take the process down; a failed write is dropped.
            let _ = append_line(path, &line, self.sinks.rotation_size);
        }
    }
}

fn append_line(path: &Path, line: &str, rotation_size: u64) -> std::io::Result<()> {
    if rotation_size > 0 {
        if let Ok(meta) = fs::metadata(path) {
            if meta.len() >= rotation_size {
                let mut rotated = path.as_os_str().to_owned();
                rotated.push(".1");
                fs::rename(path, rotated)?;
            }
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

/// Global logger instance (thread-safe)
static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

fn get_logger() -> &'static Mutex<Logger> {
    LOGGER.get_or_init(|| Mutex::new(Logger::new()))
}

/// Log a message with the specified level and category
pub fn log(level: LogLevel, category: &str, message: impl Into<String>) {
    if let Ok(mut logger) = get_logger().lock() {
        logger.log(level, category, message.into());
    }
}

/// Configure the logger from user settings.
///
/// Call once at startup after loading `AppConfig`.
/// - `log_level`: one of `"debug"`, `"info"`, `"warning"`, `"error"` (case-insensitive).
/// - `sinks`: destinations for formatted lines. The log file's parent
///   directory is created if needed; if that fails the file sink is dropped.
pub fn configure(log_level: &str, mut sinks: LogSinks) {
    if let Some(dir) = sinks.file.as_ref().and_then(|f| f.parent()) {
        if fs::create_dir_all(dir).is_err() {
            sinks.file = None;
        }
    }

    if let Ok(mut logger) = get_logger().lock() {
        logger.min_level = parse_log_level(log_level);
        logger.sinks = sinks;
    }
}

/// Parse a log level string (case-insensitive) into a `LogLevel`.
///
/// Falls back to `LogLevel::Info` for unrecognised values.
#[must_use]
pub fn parse_log_level(s: &str) -> LogLevel {
    match s.trim().to_ascii_lowercase().as_str() {
        "debug" => LogLevel::Debug,
        "warning" | "warn" => LogLevel::Warning,
        "error" | "err" => LogLevel::Error,
        // "info" and anything unrecognized → Info
        _ => LogLevel::Info,
    }
}

//! Structured logging
//!
//! Entries are built fluently and written to stderr so they never mix with
//! command output on stdout:
//!
//! ```ignore
//! logger.info("Candidate probed").field("url", url).log();
//! ```
//!
//! The minimum level follows the runtime flags: `--debug` logs everything from
//! Debug up as JSON with source locations, `--verbose` logs Info and up, and
//! the default only shows warnings and errors.

use crate::error::AppError;
use crate::models::Config;
use crate::probe::{ProbeReport, ProbeResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
        }
    }

    /// Minimum level for the given runtime flags
    pub fn for_config(config: &Config) -> Self {
        if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        }
    }
}

/// One structured log record
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// Component that produced the entry
    pub logger: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Sorted so console output is deterministic
    pub fields: BTreeMap<String, serde_json::Value>,
    /// `file:line` of the call site, shown in debug output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single line
    Console,
    /// One JSON object per line
    Json,
}

/// Writes entries at or above its minimum level to stderr
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    min_level: LogLevel,
    format: LogFormat,
    use_color: bool,
    session_id: Option<String>,
}

impl Logger {
    /// Level and format follow the runtime flags
    pub fn with_config(name: &str, config: &Config, session_id: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            min_level: LogLevel::for_config(config),
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            use_color: config.enable_color,
            session_id,
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder {
            logger: self,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                logger: self.name.clone(),
                message: message.to_string(),
                session_id: self.session_id.clone(),
                fields: BTreeMap::new(),
                location: None,
            },
        }
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// `None` when the entry is below the minimum level
    fn render(&self, entry: &LogEntry) -> Option<String> {
        if !self.would_log(entry.level) {
            return None;
        }

        Some(match self.format {
            LogFormat::Console => self.format_console(entry),
            LogFormat::Json => serde_json::to_string(entry).unwrap_or_else(|e| {
                format!("{{\"message\":\"unserializable log entry: {}\"}}", e)
            }),
        })
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let level = if self.use_color {
            format!("{}{:>5}\x1b[0m", entry.level.color_code(), entry.level.as_str())
        } else {
            format!("{:>5}", entry.level.as_str())
        };

        let mut line = format!(
            "{} {} [{}] {}",
            entry.timestamp.format("%H:%M:%S%.3f"),
            level,
            entry.logger,
            entry.message
        );

        if !entry.fields.is_empty() {
            let fields: Vec<String> = entry
                .fields
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            line.push_str(&format!(" {{{}}}", fields.join(", ")));
        }
        line
    }
}

/// Builder for a single log entry
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    pub fn location(mut self, file: &str, line: u32) -> Self {
        self.entry.location = Some(format!("{}:{}", file, line));
        self
    }

    /// Attach the outcome of one probe
    pub fn probe(self, result: &ProbeResult) -> Self {
        self.field("url", &result.url)
            .field("reachable", result.is_reachable())
            .field("latency_ms", result.latency.as_millis().map(|ms| ms as u64))
            .field("status", result.status)
            .field("cause", result.cause.as_deref())
    }

    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    pub fn log(self) {
        if let Some(line) = self.logger.render(&self.entry) {
            let _ = writeln!(io::stderr(), "{}", line);
        }
    }
}

/// Logs probing rounds and their outcomes
pub struct ProbeLogger {
    logger: Logger,
}

impl ProbeLogger {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn log_round_start(&self, candidates: usize, timeout: Duration) {
        self.logger
            .info(&format!("Probing {} candidate(s)", candidates))
            .field("candidates", candidates)
            .field("timeout_ms", timeout.as_millis() as u64)
            .log();
    }

    /// Failure causes only surface here, at Debug level
    pub fn log_probe_result(&self, result: &ProbeResult) {
        let message = match &result.cause {
            Some(cause) => format!("{} unreachable: {}", result.url, cause),
            None => format!("{} answered in {}", result.url, result.latency),
        };

        self.logger
            .debug(&message)
            .probe(result)
            .location(file!(), line!())
            .log();
    }

    pub fn log_report(&self, report: &ProbeReport) {
        for result in report.results() {
            self.log_probe_result(result);
        }

        let level = if report.winner().is_some() { LogLevel::Info } else { LogLevel::Warn };
        let message = format!(
            "Probe round finished: {} reachable, {} unreachable",
            report.reachable_count(),
            report.unreachable_count()
        );
        self.logger
            .log(level, &message)
            .field("elapsed_ms", report.elapsed.as_millis() as u64)
            .field("winner", report.winner().map(|w| w.url.as_str()))
            .log();
    }

    pub fn log_winner_applied(&self, url: &str, settings_path: &Path) {
        self.logger
            .info(&format!("Active base URL set to {}", url))
            .field("settings", settings_path.display().to_string())
            .log();
    }
}

/// Logs failures with their category and exit code
pub struct ErrorEventLogger {
    logger: Logger,
}

impl ErrorEventLogger {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn log_error(&self, error: &AppError, command: &str) {
        self.logger
            .error(&format!("{} failed: {}", command, error))
            .error_info(error)
            .log();
    }

    /// A non-fatal problem that was worked around
    pub fn log_fallback(&self, error: &AppError, fallback: &str) {
        self.logger
            .warn(&format!("{}; {}", error, fallback))
            .error_info(error)
            .log();
    }
}

/// Hands out loggers that share one session id
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    fn logger(&self, name: &str) -> Logger {
        Logger::with_config(name, &self.config, Some(self.session_id.clone()))
    }

    pub fn create_probe_logger(&self) -> ProbeLogger {
        ProbeLogger::new(self.logger("PROBE"))
    }

    pub fn create_error_logger(&self) -> ErrorEventLogger {
        ErrorEventLogger::new(self.logger("ERR"))
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

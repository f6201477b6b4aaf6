//! # Error Tracking Module
//!
//! Application errors carry a code and an HTTP-style status. An
//! [`ErrorTracker`] is constructed once and handed to whatever needs it; it
//! emits a structured `tracing` event for every tracked error and records an
//! [`ErrorLogEntry`] in its [`ErrorSink`].
//!
//! Two sinks are provided:
//!
//! - [`MemoryErrorLog`]: bounded in-process buffer
//! - [`JsonFileErrorLog`]: JSON array on disk, newest first
//!
//! Recording failures never reach the caller; they are logged and dropped.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{error, warn};

use crate::app_config::{AppConfig, Environment, DEFAULT_ERROR_LOG_CAPACITY, DEFAULT_ERROR_LOG_PAGE_SIZE};
use crate::errors::{CalcError, FormError};

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    StorageError,
    NotFound,
    ValidationError,
    Unauthorized,
    InternalError,
    UncaughtError,
}

/// An error with a code, a status and optional structured details
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct AppError {
    pub message: String,
    pub code: ErrorCode,
    pub status_code: u16,
    pub details: Option<Value>,
}

/// One tracked error as stored by a sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLogEntry {
    pub message: String,
    pub code: String,
    pub status_code: u16,
    pub context: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

/// Destination for tracked errors
pub trait ErrorSink: Send + Sync {
    /// Store an entry; rejects entries missing message, code or context
    fn record(&self, entry: ErrorLogEntry) -> Result<()>;

    /// The newest `limit` entries, newest first
    fn recent(&self, limit: usize) -> Result<Vec<ErrorLogEntry>>;
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::UncaughtError => "UNCAUGHT_ERROR",
        }
    }

    pub fn default_status(&self) -> u16 {
        match self {
            ErrorCode::NotFound => 404,
            ErrorCode::ValidationError => 400,
            ErrorCode::Unauthorized => 401,
            ErrorCode::StorageError | ErrorCode::InternalError | ErrorCode::UncaughtError => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AppError {
    pub fn new(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            code,
            status_code: code.default_status(),
            details: None,
        }
    }

    pub fn not_found(what: &str, id: &str) -> Self {
        Self::new(format!("{} not found: {}", what, id), ErrorCode::NotFound)
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<CalcError> for AppError {
    fn from(err: CalcError) -> Self {
        let kind = match err {
            CalcError::InvalidInput(_) => "invalid_input",
            CalcError::DivisionByZero => "division_by_zero",
        };
        AppError::new(err.to_string(), ErrorCode::ValidationError).with_details(json!({ "kind": kind }))
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        AppError::new(err.to_string(), ErrorCode::ValidationError)
    }
}

/// Classify an arbitrary error the way [`ErrorTracker::handle_error`] does, without tracking it
pub fn classify(err: anyhow::Error) -> AppError {
    let err = match err.downcast::<AppError>() {
        Ok(app_error) => return app_error,
        Err(other) => other,
    };
    let err = match err.downcast::<CalcError>() {
        Ok(calc_error) => return calc_error.into(),
        Err(other) => other,
    };
    let err = match err.downcast::<FormError>() {
        Ok(form_error) => return form_error.into(),
        Err(other) => other,
    };

    let chain = format!("{:#}", err);
    if err.chain().any(|cause| cause.is::<std::io::Error>()) {
        return AppError::new(format!("Storage error: {}", err), ErrorCode::StorageError)
            .with_details(json!({ "cause": chain }));
    }
    AppError::new(err.to_string(), ErrorCode::InternalError).with_details(json!({ "cause": chain }))
}

impl ErrorLogEntry {
    fn validate(&self) -> Result<()> {
        if self.message.is_empty() || self.code.is_empty() || self.context.is_empty() {
            return Err(anyhow!("Error log entry is missing required fields"));
        }
        Ok(())
    }
}

/// Bounded in-memory error log
#[derive(Debug)]
pub struct MemoryErrorLog {
    entries: Mutex<VecDeque<ErrorLogEntry>>,
    capacity: usize,
}

impl MemoryErrorLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryErrorLog {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_LOG_CAPACITY)
    }
}

impl ErrorSink for MemoryErrorLog {
    fn record(&self, entry: ErrorLogEntry) -> Result<()> {
        entry.validate()?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Error log lock poisoned"))?;
        entries.push_front(entry);
        entries.truncate(self.capacity);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<ErrorLogEntry>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Error log lock poisoned"))?;
        Ok(entries.iter().take(limit).cloned().collect())
    }
}

/// Error log persisted as a JSON array, newest entry first
#[derive(Debug)]
pub struct JsonFileErrorLog {
    path: PathBuf,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl JsonFileErrorLog {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored entry; a missing or unreadable file counts as empty
    fn read_entries(&self) -> Vec<ErrorLogEntry> {
        if !self.path.exists() {
            return Vec::new();
        }
        let parsed = fs::read_to_string(&self.path)
            .context("Failed to read error log")
            .and_then(|data| serde_json::from_str(&data).context("Failed to parse error log"));
        match parsed {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %self.path.display(), "{:#}", err);
                Vec::new()
            }
        }
    }

    fn write_entries(&self, entries: &[ErrorLogEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create error log directory")?;
            }
        }
        let data = serde_json::to_string_pretty(entries).context("Failed to serialize error log")?;
        fs::write(&self.path, data).context("Failed to write error log")?;
        Ok(())
    }
}

impl ErrorSink for JsonFileErrorLog {
    fn record(&self, entry: ErrorLogEntry) -> Result<()> {
        entry.validate()?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("Error log lock poisoned"))?;
        let mut entries = self.read_entries();
        entries.insert(0, entry);
        entries.truncate(self.capacity);
        self.write_entries(&entries)
    }

    fn recent(&self, limit: usize) -> Result<Vec<ErrorLogEntry>> {
        let mut entries = self.read_entries();
        entries.truncate(limit);
        Ok(entries)
    }
}

/// Handle through which components report errors
#[derive(Clone)]
pub struct ErrorTracker {
    sink: Arc<dyn ErrorSink>,
    environment: Environment,
    page_size: usize,
}

impl ErrorTracker {
    pub fn new(sink: Arc<dyn ErrorSink>, environment: Environment) -> Self {
        Self {
            sink,
            environment,
            page_size: DEFAULT_ERROR_LOG_PAGE_SIZE,
        }
    }

    /// Tracker writing to the JSON error log named in `config`
    pub fn from_config(config: &AppConfig) -> Self {
        let sink = JsonFileErrorLog::new(config.error_log.path.clone(), config.error_log.capacity);
        Self {
            sink: Arc::new(sink),
            environment: config.environment,
            page_size: config.error_log.page_size,
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Log and record an error raised in `context`
    pub fn track(&self, err: &AppError, context: &str) {
        error!(
            code = %err.code,
            status_code = err.status_code,
            context = %context,
            "{}",
            err.message
        );

        let entry = ErrorLogEntry {
            message: err.message.clone(),
            code: err.code.as_str().to_string(),
            status_code: err.status_code,
            context: context.to_string(),
            timestamp: Utc::now(),
            details: err.details.clone(),
            environment: Some(self.environment.as_str().to_string()),
        };

        if let Err(sink_err) = self.sink.record(entry) {
            warn!(context = %context, "Failed to record tracked error: {:#}", sink_err);
        }
    }

    /// Classify an error, track it and hand back the resulting [`AppError`]
    pub fn handle_error(&self, err: anyhow::Error, context: &str) -> AppError {
        let app_error = classify(err);
        self.track(&app_error, context);
        app_error
    }

    /// Track an error that escaped every handler
    pub fn track_uncaught(&self, message: &str, source: &str) {
        let app_error = AppError::new(message, ErrorCode::UncaughtError)
            .with_details(json!({ "source": source }));
        self.track(&app_error, &format!("global-{}", source));
    }

    /// Route panics to [`track_uncaught`](Self::track_uncaught) on a clone of
    /// this tracker, then on to the previously installed hook
    pub fn install_panic_hook(&self) {
        let tracker = self.clone();
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let message = panic_message(info.payload());
            let message = match info.location() {
                Some(location) => format!("{} at {}:{}", message, location.file(), location.line()),
                None => message,
            };
            tracker.track_uncaught(&message, "panic");
            previous(info);
        }));
    }

    /// Newest tracked errors; `None` uses the configured page size
    pub fn recent(&self, limit: Option<usize>) -> Result<Vec<ErrorLogEntry>> {
        self.sink.recent(limit.unwrap_or(self.page_size))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

impl fmt::Debug for ErrorTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorTracker")
            .field("environment", &self.environment)
            .field("page_size", &self.page_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> (ErrorTracker, Arc<MemoryErrorLog>) {
        let log = Arc::new(MemoryErrorLog::new(3));
        (ErrorTracker::new(log.clone(), Environment::Development), log)
    }

    #[test]
    fn test_default_status_codes() {
        assert_eq!(AppError::not_found("Recipe", "abc").status_code, 404);
        assert_eq!(AppError::new("bad", ErrorCode::ValidationError).status_code, 400);
        assert_eq!(AppError::new("boom", ErrorCode::InternalError).status_code, 500);
    }

    #[test]
    fn test_track_records_entry() {
        let (tracker, log) = tracker();
        tracker.track(&AppError::not_found("Purchase", "p-9"), "find_purchase");

        let entries = log.recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, "NOT_FOUND");
        assert_eq!(entries[0].status_code, 404);
        assert_eq!(entries[0].context, "find_purchase");
        assert_eq!(entries[0].environment.as_deref(), Some("development"));
    }

    #[test]
    fn test_memory_log_is_bounded_newest_first() {
        let (tracker, log) = tracker();
        for i in 0..5 {
            tracker.track(&AppError::new(format!("error {}", i), ErrorCode::InternalError), "loop");
        }
        let messages: Vec<_> = log.recent(10).unwrap().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["error 4", "error 3", "error 2"]);
    }

    #[test]
    fn test_entries_missing_context_are_rejected() {
        let (tracker, log) = tracker();
        tracker.track(&AppError::new("no context", ErrorCode::InternalError), "");
        assert!(log.is_empty());
    }

    #[test]
    fn test_classify_passes_app_errors_through() {
        let original = AppError::not_found("Recipe", "r1");
        let classified = classify(anyhow::Error::new(original.clone()));
        assert_eq!(classified, original);
    }

    #[test]
    fn test_classify_calculator_errors() {
        let classified = classify(CalcError::DivisionByZero.into());
        assert_eq!(classified.code, ErrorCode::ValidationError);
        assert_eq!(classified.details, Some(json!({ "kind": "division_by_zero" })));
    }

    #[test]
    fn test_classify_io_errors_as_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = anyhow::Error::new(io).context("Failed to read recipe");
        assert_eq!(classify(err).code, ErrorCode::StorageError);
    }

    #[test]
    fn test_classify_other_errors_as_internal() {
        let classified = classify(anyhow!("something odd"));
        assert_eq!(classified.code, ErrorCode::InternalError);
        assert_eq!(classified.status_code, 500);
        assert_eq!(classified.message, "something odd");
    }

    #[test]
    fn test_track_uncaught() {
        let (tracker, log) = tracker();
        tracker.track_uncaught("panic in worker", "unhandledRejection");
        let entries = log.recent(1).unwrap();
        assert_eq!(entries[0].code, "UNCAUGHT_ERROR");
        assert_eq!(entries[0].context, "global-unhandledRejection");
    }
}

//! # Application Configuration Module
//!
//! This module defines the runtime configuration: deployment environment,
//! log output format and the error log location and limits. Values come from
//! the process environment (optionally seeded from a `.env` file).

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

// Constants for error log configuration
pub const DEFAULT_ERROR_LOG_PATH: &str = "logs/errors.json";
pub const DEFAULT_ERROR_LOG_CAPACITY: usize = 100; // newest entries kept on disk
pub const DEFAULT_ERROR_LOG_PAGE_SIZE: usize = 50; // newest entries returned by a listing

/// Deployment environment, recorded on every tracked error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Error log configuration
#[derive(Debug, Clone)]
pub struct ErrorLogConfig {
    /// JSON file holding tracked errors, newest first
    pub path: PathBuf,
    /// Maximum number of entries kept
    pub capacity: usize,
    /// Number of entries returned when listing without an explicit limit
    pub page_size: usize,
}

impl Default for ErrorLogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_ERROR_LOG_PATH),
            capacity: DEFAULT_ERROR_LOG_CAPACITY,
            page_size: DEFAULT_ERROR_LOG_PAGE_SIZE,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub environment: Environment,
    pub log_format: LogFormat,
    pub error_log: ErrorLogConfig,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(anyhow::anyhow!("Unknown environment '{}'", other)),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl AppConfig {
    /// Load configuration from the environment, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(value) = lookup("APP_ENV") {
            config.environment = Environment::parse(&value).context("Invalid APP_ENV")?;
        }
        if let Some(value) = lookup("LOG_FORMAT") {
            config.log_format = match value.trim().to_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Text,
            };
        }
        if let Some(value) = lookup("ERROR_LOG_PATH") {
            config.error_log.path = PathBuf::from(value);
        }
        if let Some(value) = lookup("ERROR_LOG_CAPACITY") {
            config.error_log.capacity = value
                .trim()
                .parse()
                .context("ERROR_LOG_CAPACITY must be a whole number")?;
        }
        if let Some(value) = lookup("ERROR_LOG_PAGE_SIZE") {
            config.error_log.page_size = value
                .trim()
                .parse()
                .context("ERROR_LOG_PAGE_SIZE must be a whole number")?;
        }

        Ok(config)
    }
}

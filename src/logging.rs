//! Logging initialisation via tracing-subscriber.
//!
//! Logs always go to stderr; stdout is reserved for command output.

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}' from {origin}: {reason}")]
    InvalidFilter {
        origin: &'static str,
        filter: String,
        reason: String,
    },

    /// Another global subscriber is already installed.
    #[error("failed to set subscriber: {0}")]
    AlreadyInstalled(String),
}

/// Initialise the global tracing subscriber.
///
/// A non-empty `RUST_LOG` takes precedence over `level` and must parse.
pub fn init(level: &str) -> Result<(), LoggingError> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(env.as_deref(), level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInstalled(e.to_string()))
}

fn build_filter(env: Option<&str>, level: &str) -> Result<EnvFilter, LoggingError> {
    let (origin, filter) = match env {
        Some(directives) if !directives.trim().is_empty() => (EnvFilter::DEFAULT_ENV, directives),
        _ => ("config", level),
    };
    EnvFilter::try_new(filter).map_err(|e| LoggingError::InvalidFilter {
        origin,
        filter: filter.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a log level string, rejecting anything but the five standard levels.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggingError> {
    let invalid = || LoggingError::InvalidFilter {
        origin: "config",
        filter: level.to_string(),
        reason: "must be error, warn, info, debug, or trace".to_string(),
    };
    match level {
        "error" | "warn" | "info" | "debug" | "trace" => {
            level.parse::<LevelFilter>().map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

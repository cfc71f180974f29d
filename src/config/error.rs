//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Assistant endpoint must be an http(s) URL")]
    InvalidEndpoint,

    #[error("Assistant timeout must be between 1 and 120000 ms")]
    InvalidTimeout,

    #[error("Dwell time must be at least one second")]
    InvalidDwellTime,

    #[error("Scroll depth must be between 1 and 100 percent")]
    InvalidScrollDepth,

    #[error("Invalid log filter: {0}")]
    InvalidLogLevel(String),
}

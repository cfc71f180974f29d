//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MOMENTUM` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use momentum_session::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Assistant timeout: {:?}", config.assistant.timeout());
//! ```

mod assistant;
mod error;
mod funnel;
mod telemetry;

pub use assistant::AssistantConfig;
pub use error::{ConfigError, ValidationError};
pub use funnel::{ExitTrigger, FunnelConfig};
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// offline configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Assistant gateway (endpoint, key, timeout, fallback text)
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Public funnel (exit-intent trigger)
    #[serde(default)]
    pub funnel: FunnelConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MOMENTUM` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MOMENTUM__ASSISTANT__TIMEOUT_MS=5000` -> `assistant.timeout_ms = 5000`
    /// - `MOMENTUM__FUNNEL__EXIT_TRIGGER=scroll` -> `funnel.exit_trigger = scroll`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MOMENTUM")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.assistant.validate()?;
        self.funnel.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}

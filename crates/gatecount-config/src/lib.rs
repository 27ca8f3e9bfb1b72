// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # gatecount Configuration System
//!
//! Type-safe configuration for the counting loop with support for:
//! - TOML file parsing
//! - Environment variable overrides
//! - CLI argument overrides
//! - Startup validation (all problems reported together)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gatecount_config::{load_config, validate_config};
//!
//! let config = load_config(None, None).expect("Failed to load config");
//! validate_config(&config).expect("Invalid config");
//!
//! println!("SPI device: {}", config.bus.device);
//! println!("Tick: {} ms", config.control_loop.tick_period_ms);
//! ```
//!
//! Configuration is read once at startup and is immutable afterwards, so a
//! configuration fault can only surface before the loop begins.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    load_config_or_default, CONFIG_FILE_NAME, CONFIG_PATH_ENV, OVERRIDE_KEYS,
};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_types_compile() {
        let _config = GateCountConfig::default();
    }

    #[test]
    fn test_parse_error_keeps_toml_message() {
        let err: ConfigError = toml::from_str::<GateCountConfig>("[bus\n").unwrap_err().into();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}

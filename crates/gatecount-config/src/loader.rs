// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, GateCountConfig};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "gatecount.toml";

/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "GATECOUNT_CONFIG_PATH";

/// Number of parent directories searched above the working directory
const PARENT_SEARCH_DEPTH: usize = 5;

/// Locate `gatecount.toml` for the counter
///
/// An explicit `GATECOUNT_CONFIG_PATH` wins and must exist. Otherwise the
/// working directory is tried first, then up to five parents, so the binary
/// finds the shipped file when started from a subdirectory of the install.
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` listing every place that was tried.
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if !path.exists() {
            return Err(ConfigError::FileNotFound(format!(
                "{} points at {}, which does not exist",
                CONFIG_PATH_ENV,
                path.display()
            )));
        }
        return Ok(path);
    }

    let candidates: Vec<PathBuf> = env::current_dir()
        .map(|cwd| {
            cwd.ancestors()
                .take(PARENT_SEARCH_DEPTH + 1)
                .map(|dir| dir.join(CONFIG_FILE_NAME))
                .collect()
        })
        .unwrap_or_default();

    if let Some(found) = candidates.iter().find(|path| path.exists()) {
        return Ok(found.clone());
    }

    let tried = candidates
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "no gate counter configuration found; tried:\n{}\n\nPass --config or set {}.",
        tried, CONFIG_PATH_ENV
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or an
/// override names an unknown key or carries an unparsable value.
/// Range validation is a separate step ([`crate::validate_config`]).
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<GateCountConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: GateCountConfig = toml::from_str(&content)?;

    apply_overrides(&mut config, cli_args)?;
    Ok(config)
}

/// Like [`load_config`], but an absent file (when no explicit path is given)
/// falls back to built-in defaults instead of failing.
///
/// Returns the path that was loaded, if any.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<(GateCountConfig, Option<PathBuf>)> {
    if let Some(path) = config_path {
        return Ok((load_config(Some(path), cli_args)?, Some(path.to_path_buf())));
    }

    match find_config_file() {
        Ok(path) => Ok((load_config(Some(&path), cli_args)?, Some(path))),
        Err(ConfigError::FileNotFound(_)) if env::var(CONFIG_PATH_ENV).is_err() => {
            let mut config = GateCountConfig::default();
            apply_overrides(&mut config, cli_args)?;
            Ok((config, None))
        }
        Err(e) => Err(e),
    }
}

fn apply_overrides(
    config: &mut GateCountConfig,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<()> {
    apply_environment_overrides(config)?;
    if let Some(cli) = cli_args {
        apply_cli_overrides(config, cli)?;
    }
    Ok(())
}

/// Override keys accepted from the environment and the command line
pub const OVERRIDE_KEYS: [&str; 6] = [
    "spi_device",
    "spi_speed_hz",
    "threshold",
    "merge_window_ms",
    "tick_period_ms",
    "log_level",
];

const ENVIRONMENT_OVERRIDES: [(&str, &str); 6] = [
    ("GATECOUNT_SPI_DEVICE", "spi_device"),
    ("GATECOUNT_SPI_SPEED_HZ", "spi_speed_hz"),
    ("GATECOUNT_THRESHOLD", "threshold"),
    ("GATECOUNT_MERGE_WINDOW_MS", "merge_window_ms"),
    ("GATECOUNT_TICK_PERIOD_MS", "tick_period_ms"),
    ("GATECOUNT_LOG_LEVEL", "log_level"),
];

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `GATECOUNT_SPI_DEVICE` -> `bus.device`
/// - `GATECOUNT_SPI_SPEED_HZ` -> `bus.max_speed_hz`
/// - `GATECOUNT_THRESHOLD` -> `channels.default_threshold`
/// - `GATECOUNT_MERGE_WINDOW_MS` -> `gates.merge_window_ms`
/// - `GATECOUNT_TICK_PERIOD_MS` -> `control_loop.tick_period_ms`
/// - `GATECOUNT_LOG_LEVEL` -> `system.log_level`
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` naming the variable when a value
/// does not parse as the field's type.
pub fn apply_environment_overrides(config: &mut GateCountConfig) -> ConfigResult<()> {
    for (var, key) in ENVIRONMENT_OVERRIDES {
        if let Ok(value) = env::var(var) {
            apply_override(config, key, &value)
                .map_err(|reason| ConfigError::ValidationError(format!("{}: {}", var, reason)))?;
        }
    }
    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"threshold": "250", "tick_period_ms": "10"}`)
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` for a key outside [`OVERRIDE_KEYS`]
/// or a value that does not parse. Keys are checked in sorted order so the
/// reported error is stable.
pub fn apply_cli_overrides(
    config: &mut GateCountConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    let mut keys: Vec<&String> = cli_args.keys().collect();
    keys.sort();

    for key in keys {
        apply_override(config, key, &cli_args[key]).map_err(|reason| {
            ConfigError::ValidationError(format!("override '{}': {}", key, reason))
        })?;
    }
    Ok(())
}

fn apply_override(config: &mut GateCountConfig, key: &str, value: &str) -> Result<(), String> {
    match key {
        // Bus settings
        "spi_device" => config.bus.device = value.to_string(),
        "spi_speed_hz" => config.bus.max_speed_hz = parse_value(value)?,

        // Channel settings
        "threshold" => config.channels.default_threshold = parse_value(value)?,

        // Gate and loop timing
        "merge_window_ms" => config.gates.merge_window_ms = parse_value(value)?,
        "tick_period_ms" => config.control_loop.tick_period_ms = parse_value(value)?,

        // System settings
        "log_level" => config.system.log_level = value.to_string(),

        _ => {
            return Err(format!(
                "unknown key, expected one of: {}",
                OVERRIDE_KEYS.join(", ")
            ))
        }
    }
    Ok(())
}

fn parse_value<T>(value: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .parse()
        .map_err(|e| format!("invalid value '{}' ({})", value, e))
}

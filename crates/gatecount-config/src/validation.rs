// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Ensures configuration values are within hardware limits and don't
//! conflict with each other. Runs once at startup, before the bus is opened.

use crate::{ConfigError, ConfigResult, GateCountConfig};
use gatecount_hal::mcp3008::{CHANNEL_COUNT, MAX_SAMPLE};
use std::collections::HashMap;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    ChannelOutOfRange { channel: String, index: u8 },
    ChannelConflict { channel1: String, channel2: String, index: u8 },
    ThresholdOutOfRange { channel: String, threshold: u16 },
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChannelOutOfRange { channel, index } => {
                write!(
                    f,
                    "Channel {} = {} is outside valid range (0-{})",
                    channel,
                    index,
                    CHANNEL_COUNT - 1
                )
            }
            Self::ChannelConflict {
                channel1,
                channel2,
                index,
            } => {
                write!(
                    f,
                    "Channel conflict: {} and {} both use ADC input {}",
                    channel1, channel2, index
                )
            }
            Self::ThresholdOutOfRange { channel, threshold } => {
                write!(
                    f,
                    "Threshold {} for {} can never trigger (must be below {})",
                    threshold, channel, MAX_SAMPLE
                )
            }
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Channel indices within the ADC's inputs
/// - Channel conflicts (no two gate sensors on the same input)
/// - Thresholds a 10-bit sample can exceed
/// - Required fields and positive durations
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &GateCountConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_channel_ranges(config, &mut errors);
    validate_channel_conflicts(config, &mut errors);
    validate_thresholds(config, &mut errors);
    validate_required_fields(config, &mut errors);
    validate_value_ranges(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_channel_ranges(config: &GateCountConfig, errors: &mut Vec<ConfigValidationError>) {
    for (name, channel) in config.channels.all() {
        if channel.index >= CHANNEL_COUNT {
            errors.push(ConfigValidationError::ChannelOutOfRange {
                channel: format!("channels.{}", name),
                index: channel.index,
            });
        }
    }
}

fn validate_channel_conflicts(config: &GateCountConfig, errors: &mut Vec<ConfigValidationError>) {
    let mut by_index: HashMap<u8, Vec<String>> = HashMap::new();
    for (name, channel) in config.channels.all() {
        by_index
            .entry(channel.index)
            .or_default()
            .push(format!("channels.{}", name));
    }

    let mut conflicts: Vec<_> = by_index.into_iter().filter(|(_, names)| names.len() > 1).collect();
    conflicts.sort_by_key(|(index, _)| *index);

    for (index, names) in conflicts {
        for i in 0..names.len() - 1 {
            for j in i + 1..names.len() {
                errors.push(ConfigValidationError::ChannelConflict {
                    channel1: names[i].clone(),
                    channel2: names[j].clone(),
                    index,
                });
            }
        }
    }
}

fn validate_thresholds(config: &GateCountConfig, errors: &mut Vec<ConfigValidationError>) {
    let default_threshold = config.channels.default_threshold;
    for (name, channel) in config.channels.all() {
        let threshold = channel.effective_threshold(default_threshold);
        // A threshold at full scale can never trigger
        if threshold >= MAX_SAMPLE {
            errors.push(ConfigValidationError::ThresholdOutOfRange {
                channel: format!("channels.{}", name),
                threshold,
            });
        }
    }
}

fn validate_required_fields(config: &GateCountConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.bus.device.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "bus.device".to_string(),
        });
    }
}

fn validate_value_ranges(config: &GateCountConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.bus.max_speed_hz == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "bus.max_speed_hz".to_string(),
            reason: "must be positive".to_string(),
        });
    }

    if config.bus.mode > 3 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "bus.mode".to_string(),
            reason: "must be 0, 1, 2 or 3".to_string(),
        });
    }

    if config.gates.merge_window_ms == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "gates.merge_window_ms".to_string(),
            reason: "must be positive".to_string(),
        });
    }

    if config.control_loop.tick_period_ms == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "control_loop.tick_period_ms".to_string(),
            reason: "must be positive".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.system.log_level.to_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "system.log_level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `gatecount.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GateCountConfig {
    pub system: SystemConfig,
    pub bus: BusConfig,
    pub channels: ChannelsConfig,
    pub gates: GatesConfig,
    pub control_loop: ControlLoopConfig,
    pub logging: LoggingConfig,
}

/// System-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub log_level: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// SPI bus carrying the ADC
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BusConfig {
    /// spidev node, e.g. `/dev/spidev0.0`
    pub device: String,
    pub max_speed_hz: u32,
    /// SPI mode 0-3
    pub mode: u8,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            device: "/dev/spidev0.0".to_string(),
            max_speed_hz: 1_350_000,
            mode: 0,
        }
    }
}

/// One gate sensor wired to an ADC input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChannelConfig {
    pub index: u8,
    /// Per-channel override of `channels.default_threshold`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u16>,
}

impl ChannelConfig {
    pub const fn at(index: u8) -> Self {
        Self {
            index,
            threshold: None,
        }
    }

    pub fn effective_threshold(&self, default_threshold: u16) -> u16 {
        self.threshold.unwrap_or(default_threshold)
    }
}

/// ADC channel assignment for every gate sensor
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChannelsConfig {
    pub default_threshold: u16,
    /// IN gate sensor
    pub entry: ChannelConfig,
    /// OUT gate sensor
    pub exit: ChannelConfig,
    /// MID pair sensor whose first firing means entering
    pub mid_a: ChannelConfig,
    /// MID pair sensor whose first firing means exiting
    pub mid_b: ChannelConfig,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            default_threshold: 200,
            entry: ChannelConfig::at(0),
            exit: ChannelConfig::at(1),
            mid_a: ChannelConfig::at(2),
            mid_b: ChannelConfig::at(3),
        }
    }
}

impl ChannelsConfig {
    /// All gate channels by name, in sampling order
    pub fn all(&self) -> [(&'static str, ChannelConfig); 4] {
        [
            ("entry", self.entry),
            ("exit", self.exit),
            ("mid_a", self.mid_a),
            ("mid_b", self.mid_b),
        ]
    }
}

/// Gate debounce settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatesConfig {
    /// Single-sensor merge window
    pub merge_window_ms: u64,
}

impl Default for GatesConfig {
    fn default() -> Self {
        Self {
            merge_window_ms: 1000,
        }
    }
}

impl GatesConfig {
    pub fn merge_window(&self) -> Duration {
        Duration::from_millis(self.merge_window_ms)
    }
}

/// Sensor polling loop
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlLoopConfig {
    pub tick_period_ms: u64,
    /// Status log cadence; 0 disables
    pub status_interval_secs: u64,
}

impl Default for ControlLoopConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 20,
            status_interval_secs: 60,
        }
    }
}

impl ControlLoopConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn status_interval(&self) -> Option<Duration> {
        (self.status_interval_secs > 0).then(|| Duration::from_secs(self.status_interval_secs))
    }
}

/// File logging (console logging is always on)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file_logging: bool,
    pub json: bool,
    pub log_dir: PathBuf,
    pub retention_days: u64,
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_logging: false,
            json: false,
            log_dir: PathBuf::from("./logs"),
            retention_days: 30,
            retention_runs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_field_wiring() {
        let config = GateCountConfig::default();
        let indices: Vec<u8> = config.channels.all().iter().map(|(_, c)| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(config.channels.default_threshold, 200);
        assert_eq!(config.gates.merge_window(), Duration::from_secs(1));
        assert_eq!(config.control_loop.tick_period(), Duration::from_millis(20));
        assert_eq!(config.bus.max_speed_hz, 1_350_000);
    }

    #[test]
    fn test_channel_threshold_override() {
        let config: GateCountConfig = toml::from_str(
            r#"
            [channels]
            default_threshold = 300
            mid_b = { index = 6, threshold = 450 }
            "#,
        )
        .unwrap();

        assert_eq!(config.channels.entry.effective_threshold(300), 300);
        assert_eq!(config.channels.mid_b.index, 6);
        assert_eq!(config.channels.mid_b.effective_threshold(300), 450);
        // Untouched channels keep their defaults
        assert_eq!(config.channels.exit.index, 1);
    }

    #[test]
    fn test_status_interval_zero_disables() {
        let mut loop_config = ControlLoopConfig::default();
        assert_eq!(loop_config.status_interval(), Some(Duration::from_secs(60)));
        loop_config.status_interval_secs = 0;
        assert_eq!(loop_config.status_interval(), None);
    }
}

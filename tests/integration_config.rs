// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Integration tests from a configuration file to a running loop

mod common;

use std::fs;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use common::{Field, IN, MID_A, MID_B};
use gatecount_config::{load_config, validate_config, ConfigError, GateCountConfig};
use gatecount_engine::GateChannels;
use gatecount_hal::TimeProvider;
use tempfile::TempDir;

#[test]
fn test_shipped_config_is_valid_and_matches_defaults() {
    let config: GateCountConfig = toml::from_str(include_str!("../gatecount.toml")).unwrap();
    validate_config(&config).unwrap();

    let defaults = GateCountConfig::default();
    assert_eq!(
        GateChannels::from_config(&config),
        GateChannels::from_config(&defaults)
    );
    assert_eq!(config.gates.merge_window_ms, defaults.gates.merge_window_ms);
    assert_eq!(config.control_loop.tick_period_ms, defaults.control_loop.tick_period_ms);
    assert_eq!(config.bus.device, defaults.bus.device);
}

#[test]
fn test_rewired_channels_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gatecount.toml");
    fs::write(
        &path,
        r#"
        [channels]
        default_threshold = 300
        mid_a = { index = 5 }
        mid_b = { index = 6, threshold = 100 }

        [gates]
        merge_window_ms = 200

        [control_loop]
        tick_period_ms = 10
        status_interval_secs = 0
        "#,
    )
    .unwrap();

    let config = load_config(Some(&path), None).unwrap();
    validate_config(&config).unwrap();

    let field = Field::new();
    // Pulses on the old MID inputs are never sampled; the rewired pair fires A then B
    field.pulse(MID_A, 4, &[0]);
    field.pulse(MID_B, 4, &[1]);
    field.pulse(5, 4, &[0]);
    field.transport.queue_samples(6, [0, 150, 0, 0]);
    // IN at 200 ms falls inside the merge window, 210 ms does not
    field.pulse(IN, 30, &[0, 20, 21]);
    let mut control_loop = field.control_loop(&config);

    let running = AtomicBool::new(true);
    let summary = control_loop.run(&running, Some(30)).unwrap();

    assert_eq!(summary.stats.crossings_mid, 1);
    assert_eq!(summary.stats.crossings_in, 2);
    assert_eq!(summary.final_count, 3);
    assert_eq!(field.clock.now(), Duration::from_millis(300));
}

#[test]
fn test_invalid_file_is_rejected_before_loop_starts() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gatecount.toml");
    fs::write(
        &path,
        r#"
        [channels]
        exit = { index = 0 }
        mid_b = { index = 9 }

        [gates]
        merge_window_ms = 0
        "#,
    )
    .unwrap();

    let config = load_config(Some(&path), None).unwrap();
    match validate_config(&config) {
        Err(ConfigError::ValidationError(msg)) => {
            assert!(msg.contains("Channel conflict"));
            assert!(msg.contains("channels.mid_b"));
            assert!(msg.contains("gates.merge_window_ms"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_malformed_toml_is_a_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gatecount.toml");
    fs::write(&path, "[channels\nentry = 0").unwrap();

    assert!(matches!(
        load_config(Some(&path), None),
        Err(ConfigError::ParseError(_))
    ));
}

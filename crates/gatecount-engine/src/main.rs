// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use gatecount_config::{load_config_or_default, validate_config, GateCountConfig};
use gatecount_engine::EngineError;
use gatecount_observability::{
    debug_flags_help, init_logging, parse_debug_flags, FileLoggingOptions, LogFormat,
    LoggingOptions,
};

/// gatecount - vehicle counting from analog gate sensors
#[derive(Parser, Debug)]
#[command(name = "gatecount", version, author, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Path to gatecount.toml (searched for when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override a configuration key, e.g. `--set threshold=250`
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    overrides: Vec<(String, String)>,

    /// Tick period in milliseconds (overrides control_loop.tick_period_ms)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Stop after N ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

/// Separate `--debug-<crate>` flags, which clap does not know, from the rest
fn split_debug_args<I>(args: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = String>,
{
    args.into_iter().partition(|arg| arg.starts_with("--debug-"))
}

/// `--set` pairs keyed for the config loader; `--tick-ms` wins over
/// `--set tick_period_ms`
fn config_overrides(args: &Args) -> HashMap<String, String> {
    let mut overrides: HashMap<String, String> = args.overrides.iter().cloned().collect();
    if let Some(tick_ms) = args.tick_ms {
        overrides.insert("tick_period_ms".to_string(), tick_ms.to_string());
    }
    overrides
}

/// Main entry point
fn main() -> Result<()> {
    let (debug_args, cli_args) = split_debug_args(std::env::args());
    let args = Args::parse_from(cli_args);
    let debug_flags = parse_debug_flags(debug_args);

    let overrides = config_overrides(&args);
    let (config, config_path) = load_config_or_default(args.config.as_deref(), Some(&overrides))
        .map_err(EngineError::from)
        .context("Failed to load configuration")?;
    validate_config(&config).map_err(EngineError::from)?;

    // Guard keeps file appenders flushing until exit
    let _logging = init_logging(&debug_flags, &logging_options(&config, args.verbose))?;

    match &config_path {
        Some(path) => info!("[GATECOUNT] Configuration loaded from {}", path.display()),
        None => info!("[GATECOUNT] No configuration file found, using defaults"),
    }

    // Setup signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("[GATECOUNT] Shutdown signal received...");
        r.store(false, Ordering::SeqCst);
    })?;

    let summary = run(&config, &running, args.max_ticks)?;

    info!(
        "[GATECOUNT] Shutdown complete: {} ticks, final count {}",
        summary.stats.ticks, summary.final_count
    );
    Ok(())
}

fn logging_options(config: &GateCountConfig, verbose: bool) -> LoggingOptions {
    let level = if verbose {
        "debug".to_string()
    } else {
        config.system.log_level.clone()
    };

    LoggingOptions {
        level,
        format: if config.logging.json {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        file: config.logging.file_logging.then(|| FileLoggingOptions {
            log_dir: config.logging.log_dir.clone(),
            retention_days: config.logging.retention_days,
            retention_runs: config.logging.retention_runs,
        }),
    }
}

#[cfg(feature = "linux-spidev")]
fn run(
    config: &GateCountConfig,
    running: &AtomicBool,
    max_ticks: Option<u64>,
) -> Result<gatecount_engine::RunSummary> {
    use gatecount_engine::ControlLoop;
    use gatecount_hal::platforms::SpidevTransport;
    use gatecount_hal::{Mcp3008, MonotonicClock};

    let transport =
        SpidevTransport::open(&config.bus.device, config.bus.max_speed_hz, config.bus.mode)?;
    let mut control_loop =
        ControlLoop::from_config(Mcp3008::new(transport), MonotonicClock::new(), config)?;

    info!(
        "[GATECOUNT] Sampling every {:?} (Press Ctrl+C to stop)",
        control_loop.tick_period()
    );
    Ok(control_loop.run(running, max_ticks)?)
}

#[cfg(not(feature = "linux-spidev"))]
fn run(
    config: &GateCountConfig,
    _running: &AtomicBool,
    _max_ticks: Option<u64>,
) -> Result<gatecount_engine::RunSummary> {
    anyhow::bail!(
        "No SPI platform compiled in; rebuild with the linux-spidev feature to open {}",
        config.bus.device
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatecount_config::ConfigError;
    use gatecount_observability::CrateDebugFlags;
    use std::path::Path;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_parse_key_value_trims_both_sides() {
        assert_eq!(
            parse_key_value(" threshold = 250 "),
            Ok(("threshold".to_string(), "250".to_string()))
        );
        // Only the first '=' splits
        assert_eq!(
            parse_key_value("spi_device=/dev/x=y"),
            Ok(("spi_device".to_string(), "/dev/x=y".to_string()))
        );
    }

    #[test]
    fn test_parse_key_value_requires_equals() {
        let err = parse_key_value("threshold").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
        assert!(Args::try_parse_from(["gatecount", "--set", "threshold"]).is_err());
    }

    #[test]
    fn test_debug_flags_split_before_clap() {
        let (debug_args, cli_args) = split_debug_args(argv(&[
            "gatecount",
            "--debug-gatecount-hal",
            "--max-ticks",
            "5",
            "--debug-gatecount-gates",
        ]));

        assert_eq!(debug_args, argv(&["--debug-gatecount-hal", "--debug-gatecount-gates"]));
        let args = Args::try_parse_from(cli_args).unwrap();
        assert_eq!(args.max_ticks, Some(5));

        let flags = CrateDebugFlags::from_args(debug_args);
        assert!(flags.is_enabled("gatecount-hal"));
        assert!(flags.is_enabled("gatecount-gates"));
        assert!(!flags.is_enabled("gatecount-engine"));
    }

    #[test]
    fn test_debug_flag_is_unknown_to_clap() {
        assert!(Args::try_parse_from(["gatecount", "--debug-gatecount-hal"]).is_err());
    }

    #[test]
    fn test_tick_ms_overrides_set_tick_period() {
        let args = Args::try_parse_from([
            "gatecount",
            "--set",
            "tick_period_ms=50",
            "--set",
            "threshold=300",
            "--tick-ms",
            "10",
        ])
        .unwrap();

        let overrides = config_overrides(&args);
        assert_eq!(overrides["tick_period_ms"], "10");
        assert_eq!(overrides["threshold"], "300");
    }

    #[test]
    fn test_set_tick_period_kept_without_tick_ms() {
        let args = Args::try_parse_from(["gatecount", "--set", "tick_period_ms=50"]).unwrap();
        assert_eq!(config_overrides(&args)["tick_period_ms"], "50");
    }

    #[test]
    fn test_verbose_forces_debug_level() {
        let mut config = GateCountConfig::default();
        config.system.log_level = "warn".to_string();

        assert_eq!(logging_options(&config, false).level, "warn");
        assert_eq!(logging_options(&config, true).level, "debug");
    }

    #[test]
    fn test_logging_options_follow_config() {
        let mut config = GateCountConfig::default();
        config.logging.json = true;
        config.logging.file_logging = true;
        config.logging.retention_runs = 3;

        let options = logging_options(&config, false);
        assert_eq!(options.format, LogFormat::Json);
        let file = options.file.unwrap();
        assert_eq!(file.retention_runs, 3);
        assert_eq!(file.log_dir, config.logging.log_dir);

        config.logging.file_logging = false;
        assert!(logging_options(&config, false).file.is_none());
    }

    #[test]
    fn test_bad_override_fails_config_load() {
        let args = Args::try_parse_from(["gatecount", "--set", "thresold=900"]).unwrap();
        let overrides = config_overrides(&args);
        let shipped = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../gatecount.toml");

        let err = load_config_or_default(Some(&shipped), Some(&overrides))
            .map_err(EngineError::from)
            .unwrap_err();
        assert!(matches!(err, EngineError::Config(ConfigError::ValidationError(_))));
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # gatecount-observability
//!
//! Unified logging for the gatecount crates, with per-crate debug flag
//! support.
//!
//! ## Features
//! - `file-logging`: JSON log files with daily rotation and run retention

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known gatecount crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "gatecount-engine",
    "gatecount-gates",
    "gatecount-hal",
    "gatecount-config",
];

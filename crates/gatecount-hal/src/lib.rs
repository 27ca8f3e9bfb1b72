// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # gatecount HAL
//!
//! Platform seams for the counting loop:
//! - [`SpiTransport`]: one full-duplex SPI transaction
//! - [`AdcReader`]: one raw sample per channel, built on a transport
//! - [`TimeProvider`]: monotonic time and delays, real or simulated
//!
//! Platforms are enabled per feature (`linux-spidev`, `embedded-hal`,
//! `scripted`).

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod clock;
pub mod error;
pub mod hal;
pub mod mcp3008;
pub mod platforms;

pub use clock::{MonotonicClock, SimulatedClock};
pub use error::BusError;
pub use hal::{AdcReader, SpiTransport, TimeProvider};
pub use mcp3008::Mcp3008;

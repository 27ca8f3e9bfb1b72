// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Hardware Abstraction Layer (HAL) trait definitions
//!
//! Each platform provides:
//! - SPI transactions (SpiTransport)
//! - Time management (TimeProvider)
//!
//! and the ADC driver (AdcReader) is layered on top of the transport.

/// ADC sampling trait.
pub mod adc;
/// Full-duplex SPI transaction trait.
pub mod spi;
/// Timekeeping abstractions (monotonic timers, delays).
pub mod time;

pub use adc::AdcReader;
pub use spi::SpiTransport;
pub use time::TimeProvider;

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Platform-specific transport implementations

#[cfg(feature = "linux-spidev")]
pub mod linux_spidev;

#[cfg(feature = "embedded-hal")]
pub mod embedded_hal_spi;

#[cfg(any(test, feature = "scripted"))]
pub mod scripted;

#[cfg(feature = "linux-spidev")]
pub use linux_spidev::SpidevTransport;

#[cfg(feature = "embedded-hal")]
pub use embedded_hal_spi::{EmbeddedHalSpi, EmbeddedHalSpiError};

#[cfg(any(test, feature = "scripted"))]
pub use scripted::{ScriptedFault, ScriptedTransport};

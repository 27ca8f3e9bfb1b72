// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Boxed platform error carried through the bus layer
pub type TransportFault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Bus-level failures. Every variant is fatal to the counting loop.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("Failed to open SPI device {device}: {source}")]
    Open {
        device: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported SPI mode {0} (expected 0-3)")]
    InvalidMode(u8),

    #[error("ADC channel {channel} out of range (0-{max})")]
    ChannelOutOfRange { channel: u8, max: u8 },

    #[error("SPI transfer failed on channel {channel}: {source}")]
    Transport {
        channel: u8,
        #[source]
        source: TransportFault,
    },

    #[error("Bus already released")]
    Released,

    #[error("Failed to release bus: {0}")]
    Release(#[source] TransportFault),
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Adapter from any `embedded-hal` 1.0 [`SpiDevice`] to [`SpiTransport`]
//!
//! Lets the MCP3008 driver run on microcontroller HALs or on
//! `linux-embedded-hal` without a dedicated platform module.

use crate::hal::SpiTransport;
use embedded_hal::spi::{Error as _, ErrorKind, SpiDevice};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("SPI device error: {0:?}")]
pub struct EmbeddedHalSpiError(pub ErrorKind);

pub struct EmbeddedHalSpi<D> {
    device: D,
}

impl<D: SpiDevice> EmbeddedHalSpi<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    pub fn into_inner(self) -> D {
        self.device
    }
}

impl<D: SpiDevice> SpiTransport for EmbeddedHalSpi<D> {
    type Error = EmbeddedHalSpiError;

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error> {
        self.device
            .transfer(rx, tx)
            .map_err(|e| EmbeddedHalSpiError(e.kind()))
    }
}

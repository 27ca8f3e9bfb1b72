// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Linux userspace SPI platform
//!
//! Drives `/dev/spidevB.C` through the kernel spidev interface. On a
//! Raspberry Pi with SPI enabled, bus 0 / chip select 0 is `/dev/spidev0.0`.

use crate::error::BusError;
use crate::hal::SpiTransport;
use spidev::{SpiModeFlags, Spidev, SpidevOptions, SpidevTransfer};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct SpidevTransport {
    device: PathBuf,
    spi: Option<Spidev>,
}

impl SpidevTransport {
    /// Open and configure an spidev node
    ///
    /// # Arguments
    /// * `device` - Device node, e.g. `/dev/spidev0.0`
    /// * `max_speed_hz` - SPI clock
    /// * `mode` - SPI mode 0-3
    pub fn open(device: impl AsRef<Path>, max_speed_hz: u32, mode: u8) -> Result<Self, BusError> {
        let device = device.as_ref().to_path_buf();
        let flags = mode_flags(mode)?;
        let open_error = |source: io::Error| BusError::Open {
            device: device.display().to_string(),
            source,
        };

        let mut spi = Spidev::open(&device).map_err(open_error)?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(max_speed_hz)
            .mode(flags)
            .build();
        spi.configure(&options).map_err(open_error)?;

        info!(
            "[SPIDEV] Opened {} at {} Hz (mode {})",
            device.display(),
            max_speed_hz,
            mode
        );
        Ok(Self {
            device,
            spi: Some(spi),
        })
    }

    pub fn device(&self) -> &Path {
        &self.device
    }
}

fn mode_flags(mode: u8) -> Result<SpiModeFlags, BusError> {
    match mode {
        0 => Ok(SpiModeFlags::SPI_MODE_0),
        1 => Ok(SpiModeFlags::SPI_MODE_1),
        2 => Ok(SpiModeFlags::SPI_MODE_2),
        3 => Ok(SpiModeFlags::SPI_MODE_3),
        other => Err(BusError::InvalidMode(other)),
    }
}

impl SpiTransport for SpidevTransport {
    type Error = io::Error;

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error> {
        let spi = self
            .spi
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "SPI device released"))?;
        let mut transfer = SpidevTransfer::read_write(tx, rx);
        spi.transfer(&mut transfer)
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        // Dropping the handle closes the file descriptor
        if self.spi.take().is_some() {
            debug!("[SPIDEV] Closed {}", self.device.display());
        }
        Ok(())
    }
}

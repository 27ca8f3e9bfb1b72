// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::error::BusError;

/// Analog-to-digital converter sampled one channel per blocking transaction
pub trait AdcReader {
    /// Number of input channels the converter exposes
    fn channel_count(&self) -> u8;

    /// Largest sample value the converter returns
    fn max_sample(&self) -> u16;

    /// Read one raw sample. No retry is attempted on failure.
    fn read(&mut self, channel: u8) -> Result<u16, BusError>;

    /// Release the bus. Reads after release fail with [`BusError::Released`].
    fn release(&mut self) -> Result<(), BusError>;
}

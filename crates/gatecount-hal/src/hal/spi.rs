// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// SPI transport abstraction
pub trait SpiTransport {
    /// Platform-specific error type
    type Error: std::error::Error + Send + Sync + 'static;

    /// Clock `tx` out while clocking the response into `rx`, chip select held
    /// for the whole transaction.
    ///
    /// # Arguments
    /// * `tx` - Command frame
    /// * `rx` - Response buffer, same length as `tx`
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error>;

    /// Close the underlying device. Transfers after release fail.
    fn release(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

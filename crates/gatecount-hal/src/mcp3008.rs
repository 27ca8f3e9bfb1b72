// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! MCP3008 8-channel 10-bit ADC over SPI
//!
//! Single-ended conversion, one 3-byte transaction per sample:
//!
//! ```text
//! tx: 0x01 | (8 + ch) << 4 | 0x00
//! rx:  --  | .... ..XX     | XXXX XXXX    sample = ((rx[1] & 0x03) << 8) | rx[2]
//! ```

use crate::error::BusError;
use crate::hal::{AdcReader, SpiTransport};
use tracing::{debug, trace};

/// Input channels on the MCP3008
pub const CHANNEL_COUNT: u8 = 8;

/// Full-scale 10-bit reading
pub const MAX_SAMPLE: u16 = 0x03FF;

const START_BIT: u8 = 0x01;
const SINGLE_ENDED: u8 = 0x08;
const FRAME_LEN: usize = 3;

/// Command frame selecting `channel` in single-ended mode
pub fn command_frame(channel: u8) -> [u8; FRAME_LEN] {
    [START_BIT, (SINGLE_ENDED + channel) << 4, 0x00]
}

/// Decode a response frame into a 10-bit sample
pub fn decode_sample(response: &[u8; FRAME_LEN]) -> u16 {
    (u16::from(response[1] & 0x03) << 8) | u16::from(response[2])
}

pub struct Mcp3008<T: SpiTransport> {
    transport: T,
    released: bool,
}

impl<T: SpiTransport> Mcp3008<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            released: false,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<T: SpiTransport> AdcReader for Mcp3008<T> {
    fn channel_count(&self) -> u8 {
        CHANNEL_COUNT
    }

    fn max_sample(&self) -> u16 {
        MAX_SAMPLE
    }

    fn read(&mut self, channel: u8) -> Result<u16, BusError> {
        if self.released {
            return Err(BusError::Released);
        }
        if channel >= CHANNEL_COUNT {
            return Err(BusError::ChannelOutOfRange {
                channel,
                max: CHANNEL_COUNT - 1,
            });
        }

        let tx = command_frame(channel);
        let mut rx = [0u8; FRAME_LEN];
        self.transport
            .transfer(&tx, &mut rx)
            .map_err(|e| BusError::Transport {
                channel,
                source: Box::new(e),
            })?;

        let sample = decode_sample(&rx);
        trace!(channel, sample, "adc sample");
        Ok(sample)
    }

    fn release(&mut self) -> Result<(), BusError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.transport
            .release()
            .map_err(|e| BusError::Release(Box::new(e)))?;
        debug!("[MCP3008] Bus released");
        Ok(())
    }
}

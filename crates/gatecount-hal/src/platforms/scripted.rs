// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Scripted MCP3008 stand-in
//!
//! Answers MCP3008 command frames from per-channel levels and queued
//! samples. Clones share state, so a test can change sensor levels or
//! inject a fault while the control loop owns the transport.

use crate::hal::SpiTransport;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptedFault {
    #[error("scripted transport fault on transfer #{0}")]
    Injected(u64),
    #[error("malformed command frame {0:02X?}")]
    BadFrame(Vec<u8>),
    #[error("transport released")]
    Released,
}

#[derive(Debug, Default)]
struct ScriptState {
    levels: HashMap<u8, u16>,
    queued: HashMap<u8, VecDeque<u16>>,
    fail_at: Option<u64>,
    transfers: u64,
    released: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    state: Rc<RefCell<ScriptState>>,
}

impl ScriptedTransport {
    /// Every channel reads 0 until a level is set
    pub fn new() -> Self {
        Self::default()
    }

    /// Sticky level returned whenever no queued sample is pending
    pub fn set_level(&self, channel: u8, sample: u16) {
        self.state.borrow_mut().levels.insert(channel, sample);
    }

    /// Samples returned in order before falling back to the level
    pub fn queue_samples(&self, channel: u8, samples: impl IntoIterator<Item = u16>) {
        self.state
            .borrow_mut()
            .queued
            .entry(channel)
            .or_default()
            .extend(samples);
    }

    /// Fail the transfer with this 1-based sequence number
    pub fn fail_on_transfer(&self, transfer: u64) {
        self.state.borrow_mut().fail_at = Some(transfer);
    }

    pub fn transfer_count(&self) -> u64 {
        self.state.borrow().transfers
    }

    pub fn is_released(&self) -> bool {
        self.state.borrow().released
    }
}

impl SpiTransport for ScriptedTransport {
    type Error = ScriptedFault;

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.released {
            return Err(ScriptedFault::Released);
        }

        state.transfers += 1;
        let sequence = state.transfers;
        if state.fail_at == Some(sequence) {
            return Err(ScriptedFault::Injected(sequence));
        }

        if tx.len() != 3 || rx.len() != 3 || tx[0] != 0x01 || tx[1] & 0x80 == 0 {
            return Err(ScriptedFault::BadFrame(tx.to_vec()));
        }
        let channel = (tx[1] >> 4) - 8;

        let queued = state.queued.get_mut(&channel).and_then(VecDeque::pop_front);
        let sample = match queued {
            Some(sample) => sample,
            None => state.levels.get(&channel).copied().unwrap_or(0),
        };

        // Undefined high bits of byte 1 are driven high to exercise masking
        rx[0] = 0xFF;
        rx[1] = 0xFC | ((sample >> 8) as u8 & 0x03);
        rx[2] = (sample & 0xFF) as u8;
        Ok(())
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        self.state.borrow_mut().released = true;
        Ok(())
    }
}

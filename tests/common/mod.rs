// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures: a full control loop over the scripted bus and simulated clock

#![allow(dead_code)]

use gatecount_config::GateCountConfig;
use gatecount_engine::ControlLoop;
use gatecount_hal::platforms::ScriptedTransport;
use gatecount_hal::{Mcp3008, SimulatedClock};

/// Comfortably above the default threshold of 200
pub const HIGH: u16 = 650;

/// Default wiring
pub const IN: u8 = 0;
pub const OUT: u8 = 1;
pub const MID_A: u8 = 2;
pub const MID_B: u8 = 3;

pub type FieldLoop = ControlLoop<Mcp3008<ScriptedTransport>, SimulatedClock>;

/// Bus and clock handles kept by the test while the loop owns clones
pub struct Field {
    pub transport: ScriptedTransport,
    pub clock: SimulatedClock,
}

impl Field {
    pub fn new() -> Self {
        Self {
            transport: ScriptedTransport::new(),
            clock: SimulatedClock::new(),
        }
    }

    pub fn control_loop(&self, config: &GateCountConfig) -> FieldLoop {
        ControlLoop::from_config(
            Mcp3008::new(self.transport.clone()),
            self.clock.clone(),
            config,
        )
        .unwrap()
    }

    /// One sample per tick for `ticks` ticks, high on the listed ticks
    pub fn pulse(&self, channel: u8, ticks: usize, high_at: &[usize]) {
        self.transport.queue_samples(channel, pulse_train(ticks, high_at));
    }
}

pub fn pulse_train(ticks: usize, high_at: &[usize]) -> Vec<u16> {
    (0..ticks)
        .map(|t| if high_at.contains(&t) { HIGH } else { 0 })
        .collect()
}

/// Ticks covered by `seconds` at the default 20 ms period
pub fn ticks_for(seconds: f64) -> usize {
    (seconds * 50.0).round() as usize
}

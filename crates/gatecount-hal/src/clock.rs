// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Clock implementations of [`TimeProvider`]

use crate::hal::TimeProvider;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Wall-independent monotonic clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for MonotonicClock {
    fn get_time_us(&self) -> u64 {
        self.epoch.elapsed().as_micros() as u64
    }

    fn delay_us(&self, us: u64) {
        std::thread::sleep(Duration::from_micros(us));
    }
}

/// Manually driven clock for tests and replay.
///
/// Clones share one timeline, so a test can keep a handle while the control
/// loop owns another. Delays advance time instantly instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    now_us: Rc<Cell<u64>>,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        self.now_us
            .set(self.now_us.get() + duration.as_micros() as u64);
    }

    /// Jump to an absolute time. Moving backwards is ignored.
    pub fn set(&self, time: Duration) {
        let target = time.as_micros() as u64;
        if target > self.now_us.get() {
            self.now_us.set(target);
        }
    }
}

impl TimeProvider for SimulatedClock {
    fn get_time_us(&self) -> u64 {
        self.now_us.get()
    }

    fn delay_us(&self, us: u64) {
        self.now_us.set(self.now_us.get() + us);
    }
}

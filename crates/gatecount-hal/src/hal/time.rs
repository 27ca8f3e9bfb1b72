// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use core::time::Duration;

/// Monotonic time source
pub trait TimeProvider {
    /// Microseconds since this provider's epoch
    fn get_time_us(&self) -> u64;

    /// Block for `us` microseconds
    fn delay_us(&self, us: u64);

    fn now(&self) -> Duration {
        Duration::from_micros(self.get_time_us())
    }

    fn sleep(&self, duration: Duration) {
        self.delay_us(duration.as_micros() as u64);
    }
}

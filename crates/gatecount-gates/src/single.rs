// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Single-Sensor Gate
//!
//! Debounced counter for a gate with one sensor and a fixed direction.
//!
//! A trigger is accepted when the gate has never accepted one, or when more
//! than `merge_window` has passed since the last accepted trigger. Triggers
//! inside the window are treated as the same physical pass (a second axle
//! over the same loop) and dropped. Idle/cooling is implicit in
//! `last_accept_time`.
//!
//! A vehicle parked on the sensor for longer than `merge_window` is accepted
//! again every window. That re-count is kept as-is.

use crate::count::VehicleCount;
use crate::crossing::{Crossing, Direction, GateId};
use crate::Timestamp;
use core::time::Duration;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleSensorGate {
    gate: GateId,
    direction: Direction,
    merge_window: Duration,
    last_accept_time: Option<Timestamp>,
}

impl SingleSensorGate {
    pub fn new(gate: GateId, direction: Direction, merge_window: Duration) -> Self {
        Self {
            gate,
            direction,
            merge_window,
            last_accept_time: None,
        }
    }

    pub fn gate(&self) -> GateId {
        self.gate
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn merge_window(&self) -> Duration {
        self.merge_window
    }

    /// `None` until the first accepted trigger
    pub fn last_accept_time(&self) -> Option<Timestamp> {
        self.last_accept_time
    }

    /// Whether `now` is still inside the merge window of the last accept
    pub fn is_cooling(&self, now: Timestamp) -> bool {
        match self.last_accept_time {
            Some(last) => now.saturating_sub(last) <= self.merge_window,
            None => false,
        }
    }

    /// Advance the gate by one tick.
    ///
    /// Applies the gate's delta to `count` and returns the crossing when the
    /// trigger is accepted. Untriggered ticks never change state.
    pub fn update(
        &mut self,
        triggered: bool,
        now: Timestamp,
        count: &mut VehicleCount,
    ) -> Option<Crossing> {
        if !triggered {
            return None;
        }

        if self.is_cooling(now) {
            trace!(gate = %self.gate, "trigger merged into current pass");
            return None;
        }

        self.last_accept_time = Some(now);
        let total = count.apply(self.direction.delta());
        Some(Crossing {
            gate: self.gate,
            direction: self.direction,
            count: total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn secs(s: f64) -> Timestamp {
        Duration::from_secs_f64(s)
    }

    fn in_gate() -> SingleSensorGate {
        SingleSensorGate::new(GateId::In, Direction::Entered, Duration::from_secs(1))
    }

    #[test]
    fn test_first_trigger_is_accepted() {
        let mut gate = in_gate();
        let mut count = VehicleCount::new();

        let crossing = gate.update(true, secs(0.0), &mut count).unwrap();
        assert_eq!(crossing.count, 1);
        assert_eq!(crossing.gate, GateId::In);
        assert_eq!(gate.last_accept_time(), Some(secs(0.0)));
    }

    #[test]
    fn test_untriggered_tick_changes_nothing() {
        let mut gate = in_gate();
        let mut count = VehicleCount::new();

        assert!(gate.update(false, secs(5.0), &mut count).is_none());
        assert_eq!(gate.last_accept_time(), None);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_wheel_hits_merge_within_window() {
        // Triggers at 0.0, 0.3, 0.5, 1.2 with a 1 s window
        let mut gate = in_gate();
        let mut count = VehicleCount::new();

        let accepted: Vec<bool> = [0.0, 0.3, 0.5, 1.2]
            .iter()
            .map(|t| gate.update(true, secs(*t), &mut count).is_some())
            .collect();

        assert_eq!(accepted, vec![true, false, false, true]);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let mut gate = in_gate();
        let mut count = VehicleCount::new();

        gate.update(true, secs(0.0), &mut count);
        assert!(gate.update(true, secs(1.0), &mut count).is_none());
        assert!(gate
            .update(true, secs(1.0) + Duration::from_micros(1), &mut count)
            .is_some());
    }

    #[test]
    fn test_rejected_trigger_does_not_extend_window() {
        let mut gate = in_gate();
        let mut count = VehicleCount::new();

        gate.update(true, secs(0.0), &mut count);
        gate.update(true, secs(0.9), &mut count);
        // Window still anchored at 0.0, not 0.9
        assert!(gate.update(true, secs(1.05), &mut count).is_some());
    }

    #[test]
    fn test_stationary_vehicle_recounts_each_window() {
        let mut gate = SingleSensorGate::new(GateId::Out, Direction::Exited, Duration::from_secs(1));
        let mut count = VehicleCount::new();

        // Sensor held for 3.5 s, sampled every 20 ms
        let mut t = Duration::ZERO;
        while t <= secs(3.5) {
            gate.update(true, t, &mut count);
            t += Duration::from_millis(20);
        }
        // Accepts at ~0.0, ~1.02, ~2.04, ~3.06
        assert_eq!(count.get(), -4);
    }

    proptest! {
        #[test]
        fn prop_accepts_only_after_window(
            gaps_ms in prop::collection::vec(1u64..3000, 1..200),
            window_ms in 1u64..2000,
        ) {
            let window = Duration::from_millis(window_ms);
            let mut gate = SingleSensorGate::new(GateId::In, Direction::Entered, window);
            let mut count = VehicleCount::new();
            let mut now = Duration::ZERO;
            let mut last_accepted: Option<Duration> = None;
            let mut accepted = 0i64;

            for gap in gaps_ms {
                now += Duration::from_millis(gap);
                let expected = match last_accepted {
                    Some(last) => now - last > window,
                    None => true,
                };
                let result = gate.update(true, now, &mut count);
                prop_assert_eq!(result.is_some(), expected);
                if expected {
                    last_accepted = Some(now);
                    accepted += 1;
                }
            }
            prop_assert_eq!(count.get(), accepted * Direction::Entered.delta());
        }
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Directional Pair Gate
//!
//! Two sensors mounted in line with the lane. Direction comes purely from
//! which sensor becomes active first:
//!
//! ```text
//! EdgeA, EdgeB  ->  Entered (+1)
//! EdgeB, EdgeA  ->  Exited  (-1)
//! ```
//!
//! Each tick appends at most one event per sensor, skipping an append that
//! repeats the last entry. Once two events are buffered the first two are
//! evaluated and the whole sequence is cleared, so both sensors may stay
//! active together for several ticks without producing extra events.

use crate::count::VehicleCount;
use crate::crossing::{Crossing, Direction, GateId};
use heapless::Vec;
use tracing::{debug, trace};

/// Longest sequence a single tick can build: one carried-over event plus
/// one append per sensor.
pub const SEQUENCE_CAPACITY: usize = 3;

/// Symbolic record of a sensor newly becoming active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeEvent {
    EdgeA,
    EdgeB,
}

#[derive(Debug, Clone, Default)]
pub struct DirectionalPairGate {
    sequence: Vec<EdgeEvent, SEQUENCE_CAPACITY>,
}

impl DirectionalPairGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate(&self) -> GateId {
        GateId::Mid
    }

    /// Buffered events, oldest first
    pub fn sequence(&self) -> &[EdgeEvent] {
        &self.sequence
    }

    /// Advance the gate by one tick with the trigger state of both sensors.
    pub fn update(
        &mut self,
        edge_a: bool,
        edge_b: bool,
        count: &mut VehicleCount,
    ) -> Option<Crossing> {
        if edge_a {
            self.append(EdgeEvent::EdgeA);
        }
        if edge_b {
            self.append(EdgeEvent::EdgeB);
        }

        let mut crossing = None;
        if self.sequence.len() >= 2 {
            let direction = match (self.sequence[0], self.sequence[1]) {
                (EdgeEvent::EdgeA, EdgeEvent::EdgeB) => Some(Direction::Entered),
                (EdgeEvent::EdgeB, EdgeEvent::EdgeA) => Some(Direction::Exited),
                (first, second) => {
                    debug!(?first, ?second, "ignoring non-alternating edge pair");
                    None
                }
            };

            crossing = direction.map(|direction| Crossing {
                gate: GateId::Mid,
                direction,
                count: count.apply(direction.delta()),
            });
            self.sequence.clear();
        }

        // Stale partial sequence with both sensors idle. Unreachable while
        // evaluation clears at length 2; restores the bound if that changes.
        if !edge_a && !edge_b && self.sequence.len() > 2 {
            trace!(len = self.sequence.len(), "clearing stale edge sequence");
            self.sequence.clear();
        }

        crossing
    }

    fn append(&mut self, event: EdgeEvent) {
        if self.sequence.last() == Some(&event) {
            return;
        }
        // Cannot fill under evaluate-and-clear; restart the window if it ever does
        if self.sequence.is_full() {
            trace!(len = self.sequence.len(), "edge sequence full, restarting");
            self.sequence.clear();
        }
        self.sequence.extend(core::iter::once(event));
    }
}

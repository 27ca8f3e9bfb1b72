// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Accepted gate transitions and their log form

use core::fmt;

/// Field gate a crossing was recorded at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateId {
    In,
    Out,
    Mid,
}

impl GateId {
    pub const fn label(&self) -> &'static str {
        match self {
            GateId::In => "IN",
            GateId::Out => "OUT",
            GateId::Mid => "MID",
        }
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction of travel relative to the lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Entered,
    Exited,
}

impl Direction {
    /// Signed change this direction applies to the vehicle count
    pub const fn delta(&self) -> i64 {
        match self {
            Direction::Entered => 1,
            Direction::Exited => -1,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Direction::Entered => "ENTERED",
            Direction::Exited => "EXITED",
        }
    }
}

/// One accepted gate transition, with the count after the delta was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub gate: GateId,
    pub direction: Direction,
    pub count: i64,
}

impl Crossing {
    pub const fn delta(&self) -> i64 {
        self.direction.delta()
    }
}

impl fmt::Display for Crossing {
    /// `Car ENTERED (IN). Count: 3`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Car {} ({}). Count: {}",
            self.direction.label(),
            self.gate,
            self.count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_log_lines() {
        let cases = [
            (GateId::In, Direction::Entered, 1, "Car ENTERED (IN). Count: 1"),
            (GateId::Out, Direction::Exited, 0, "Car EXITED (OUT). Count: 0"),
            (GateId::Mid, Direction::Entered, 5, "Car ENTERED (MID). Count: 5"),
            (GateId::Mid, Direction::Exited, -2, "Car EXITED (MID). Count: -2"),
        ];
        for (gate, direction, count, expected) in cases {
            let crossing = Crossing { gate, direction, count };
            assert_eq!(crossing.to_string(), expected);
        }
    }

    #[test]
    fn test_direction_deltas() {
        assert_eq!(Direction::Entered.delta(), 1);
        assert_eq!(Direction::Exited.delta(), -1);
    }
}

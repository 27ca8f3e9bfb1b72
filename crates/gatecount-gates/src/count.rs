// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Running vehicle count for the process lifetime.
///
/// Starts at zero and changes only through gate deltas. No clamping is
/// applied: more recorded exits than entries drive the count negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VehicleCount(i64);

impl VehicleCount {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add a signed delta and return the new count
    pub fn apply(&mut self, delta: i64) -> i64 {
        self.0 += delta;
        self.0
    }

    pub const fn get(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_count_may_go_negative() {
        let mut count = VehicleCount::new();
        assert_eq!(count.apply(-1), -1);
        assert_eq!(count.apply(-1), -2);
        assert_eq!(count.apply(1), -1);
        assert_eq!(count.get(), -1);
    }

    proptest! {
        #[test]
        fn prop_count_is_exact_signed_sum(deltas in prop::collection::vec(-1i64..=1, 0..500)) {
            let mut count = VehicleCount::new();
            for delta in &deltas {
                count.apply(*delta);
            }
            prop_assert_eq!(count.get(), deltas.iter().sum::<i64>());
        }
    }
}

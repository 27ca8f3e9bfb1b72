// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Threshold detection for analog sensor channels

/// One ADC reading in the converter's native resolution.
pub type RawSample = u16;

/// A sample triggers its channel when it is strictly above the threshold.
#[inline]
pub fn triggered(sample: RawSample, threshold: RawSample) -> bool {
    sample > threshold
}

/// One physical sensor input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel {
    index: u8,
    threshold: RawSample,
}

impl Channel {
    pub const fn new(index: u8, threshold: RawSample) -> Self {
        Self { index, threshold }
    }

    /// ADC input index
    pub const fn index(&self) -> u8 {
        self.index
    }

    pub const fn threshold(&self) -> RawSample {
        self.threshold
    }

    #[inline]
    pub fn is_triggered(&self, sample: RawSample) -> bool {
        triggered(sample, self.threshold)
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Gate State Machines
//!
//! All counting logic in one place, free of bus and clock I/O:
//! - **Threshold**: raw ADC sample to trigger state per channel
//! - **Single**: debounced single-sensor gate with a merge window
//! - **Directional**: two-sensor gate inferring travel direction from firing order
//! - **Count**: the running vehicle count every gate applies its delta to
//! - **GateSet**: the three field gates driven in their fixed per-tick order
//!
//! Time enters as a [`Timestamp`] argument; callers own the clock.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod count;
pub mod crossing;
pub mod directional;
pub mod gate_set;
pub mod single;
pub mod threshold;

#[cfg(feature = "payload")]
pub mod summary;

pub use count::VehicleCount;
pub use crossing::{Crossing, Direction, GateId};
pub use directional::{DirectionalPairGate, EdgeEvent, SEQUENCE_CAPACITY};
pub use gate_set::{GateSet, TickCrossings, TriggerFrame};
pub use single::SingleSensorGate;
pub use threshold::{triggered, Channel, RawSample};

#[cfg(feature = "payload")]
pub use summary::{OccupancySummary, SpotStatus};

/// Monotonic time since the owning clock's epoch.
pub type Timestamp = core::time::Duration;

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # gatecount - Sensor-Based Vehicle Gate Counting
//!
//! Samples analog presence sensors through an MCP3008 ADC, turns samples
//! into debounced gate crossings and keeps a running vehicle count.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! gatecount = "0.1"  # Default: engine + payload
//! ```
//!
//! ## Feature Flags
//!
//! ### Components
//! - **`engine`** (default): control loop, configuration, logging
//! - **`payload`** (default): downstream occupancy JSON type
//!
//! ### Platforms
//! - **`linux-spidev`**: `/dev/spidevB.C` transport
//! - **`embedded-hal`**: any embedded-hal 1.0 `SpiDevice`
//! - **`scripted`**: scripted bus for tests and bench runs
//!
//! ## Usage Examples
//!
//! ### Gate logic only
//!
//! ```rust
//! use gatecount::prelude::*;
//! use std::time::Duration;
//!
//! let mut gates = GateSet::new(Duration::from_secs(1));
//! let mut count = VehicleCount::new();
//! let frame = TriggerFrame { entry: true, ..Default::default() };
//!
//! let crossings = gates.drive(&frame, Duration::ZERO, &mut count);
//! assert_eq!(crossings.entry.unwrap().to_string(), "Car ENTERED (IN). Count: 1");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: gatecount-gates                            │
//! │  (Threshold, SingleSensorGate, DirectionalPairGate)     │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Platform: gatecount-hal                                │
//! │  (SpiTransport, AdcReader/MCP3008, TimeProvider)        │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application: gatecount-engine                          │
//! │  (ControlLoop, `gatecount` binary)                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use gatecount_gates as gates;
pub use gatecount_hal as hal;

// Re-export application layer
#[cfg(feature = "engine")]
pub use gatecount_config as config;

#[cfg(feature = "engine")]
pub use gatecount_engine as engine;

#[cfg(feature = "engine")]
pub use gatecount_observability as observability;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::gates::{
        Channel, Crossing, Direction, DirectionalPairGate, EdgeEvent, GateId, GateSet,
        SingleSensorGate, TickCrossings, Timestamp, TriggerFrame, VehicleCount,
    };
    pub use crate::hal::{AdcReader, BusError, Mcp3008, SpiTransport, TimeProvider};

    #[cfg(feature = "engine")]
    pub use crate::engine::{ControlLoop, EngineError, GateChannels, LoopStats, RunSummary};

    #[cfg(feature = "engine")]
    pub use crate::config::GateCountConfig;
}

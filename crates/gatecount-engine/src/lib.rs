// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! gatecount engine library
//!
//! The control loop that turns gate sensor samples into a running vehicle
//! count, exported for the `gatecount` binary and for testing.

pub mod control_loop;
pub mod error;

// Re-export key types for convenience
pub use control_loop::{ControlLoop, GateChannels, LoopStats, RunSummary, StopReason};
pub use error::{EngineError, EngineResult};

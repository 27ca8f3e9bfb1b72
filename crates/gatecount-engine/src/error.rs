// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use gatecount_config::ConfigError;
use gatecount_hal::BusError;
use thiserror::Error;

/// Failures that stop the counting loop
#[derive(Debug, Error)]
pub enum EngineError {
    /// Bus fault while sampling; the tick was abandoned before any gate update
    #[error("Transport fault: {0}")]
    Transport(#[from] BusError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type EngineResult<T> = Result<T, EngineError>;

//! Errors raised when restoring a snapshot or loading a config

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("malformed state JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("gate list has {count} entries, expected left/right pairs")]
    UnpairedGates { count: usize },
    #[error("gates at index {index} do not form a left/right pair at one z")]
    GatePairMismatch { index: usize },
    #[error("soldier count {count} exceeds the squad cap")]
    SoldierCountOutOfRange { count: u32 },
    #[error("field `{field}` is not a finite number")]
    NonFiniteValue { field: &'static str },
}

/// Errors raised when loading an environment config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config field `{field}` must be a finite positive number")]
    Invalid { field: &'static str },
    #[error("start soldier count {count} must be between 1 and {max}")]
    StartSoldiers { count: u32, max: u32 },
    #[error("step distance {step} (speed * tickDt) must be below {limit}")]
    StepTooLong { step: f64, limit: f64 },
}

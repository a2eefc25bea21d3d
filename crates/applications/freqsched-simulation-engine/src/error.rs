//! Error types for the simulation engine

use thiserror::Error;

/// Simulation result type
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors that reject a run before the first tick
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Base job durations are drawn from `[10, max_execution)`
    #[error("max execution should be at least 10")]
    MaxExecutionTooSmall { max_execution: i64 },

    /// Arrival probability is `1 / arrival_rate`
    #[error("arrival rate must be a positive integer")]
    ZeroArrivalRate,

    #[error("server count must be at least 1")]
    InvalidServerCount,

    #[error("simulation duration must be at least 1 tick")]
    ZeroDuration,

    #[error("at least one frequency tier is required")]
    NoFrequencyTiers,

    /// Tier frequencies must be finite, positive and non-decreasing
    #[error("invalid frequency {frequency} for tier {tier}")]
    InvalidFrequency { tier: usize, frequency: f64 },

    #[error("idle power must be finite and non-negative, got {0}")]
    InvalidIdlePower(f64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimulationError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Legacy behaviour reports this rejection and exits successfully
    pub fn is_legacy_rejection(&self) -> bool {
        matches!(self, Self::MaxExecutionTooSmall { .. })
    }
}

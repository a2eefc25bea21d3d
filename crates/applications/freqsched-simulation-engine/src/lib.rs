//! Freqsched Simulation Engine
//!
//! Discrete-time simulator comparing job-scheduling heuristics on a server
//! farm split into frequency tiers, by resulting utilization and energy.

pub mod types;
pub mod error;
pub mod config;
pub mod random;
pub mod arrival;
pub mod pool;
pub mod policies;
pub mod energy;
pub mod simulator;

pub use config::SimulationConfig;
pub use error::{Result, SimulationError};
pub use policies::{PolicyKind, SchedulingPolicy};
pub use simulator::{SimulationResult, Simulator, compare_policies};

//! Simulation configuration
//!
//! Defaults reproduce the fixed farm the heuristics are compared on:
//! 100 servers in five frequency tiers, 10000 ticks, idle draw 0.4.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::policies::PolicyKind;
use crate::types::Tick;

/// Lower bound of every base job duration
pub const MIN_EXECUTION: i64 = 10;

pub const DEFAULT_SERVERS: usize = 100;
pub const DEFAULT_DURATION: u64 = 10_000;
pub const DEFAULT_IDLE_POWER: f64 = 0.4;
pub const DEFAULT_FREQUENCY_TIERS: [f64; 5] = [0.6, 0.7, 0.8, 0.9, 1.0];

/// Latest tick a run may reach; finish times stay exact as `f64` below it
pub const MAX_HORIZON: Tick = 1 << 53;

/// Parameters of a single simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of servers in the farm
    pub servers: usize,

    /// Number of ticks; the clock runs 1..=duration
    pub duration: u64,

    /// Operating frequency of each tier, slowest first
    pub frequency_tiers: Vec<f64>,

    /// Power drawn by a server while idle, independent of tier
    pub idle_power: f64,

    /// A job arrives on a tick with probability 1 / arrival_rate
    pub arrival_rate: u64,

    /// Upper bound (exclusive) of base job durations
    pub max_execution: i64,

    pub policy: PolicyKind,

    /// Fixed seed for reproducible runs; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            servers: DEFAULT_SERVERS,
            duration: DEFAULT_DURATION,
            frequency_tiers: DEFAULT_FREQUENCY_TIERS.to_vec(),
            idle_power: DEFAULT_IDLE_POWER,
            arrival_rate: 1,
            max_execution: MIN_EXECUTION,
            policy: PolicyKind::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Default farm with the two user-facing parameters set
    pub fn new(arrival_rate: u64, max_execution: i64) -> Self {
        SimulationConfig {
            arrival_rate,
            max_execution,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter before a run starts
    ///
    /// The legacy `max_execution` check comes first so that its message wins
    /// when several parameters are wrong at once.
    pub fn validate(&self) -> Result<()> {
        if self.max_execution < MIN_EXECUTION {
            return Err(SimulationError::MaxExecutionTooSmall {
                max_execution: self.max_execution,
            });
        }
        if self.arrival_rate == 0 {
            return Err(SimulationError::ZeroArrivalRate);
        }
        if self.servers == 0 {
            return Err(SimulationError::InvalidServerCount);
        }
        if self.duration == 0 {
            return Err(SimulationError::ZeroDuration);
        }
        if self.frequency_tiers.is_empty() {
            return Err(SimulationError::NoFrequencyTiers);
        }

        let mut previous = 0.0;
        for (tier, &frequency) in self.frequency_tiers.iter().enumerate() {
            if !frequency.is_finite() || frequency <= 0.0 || frequency < previous {
                return Err(SimulationError::InvalidFrequency { tier, frequency });
            }
            previous = frequency;
        }

        if !self.idle_power.is_finite() || self.idle_power < 0.0 {
            return Err(SimulationError::InvalidIdlePower(self.idle_power));
        }

        let horizon = self.worst_case_horizon();
        if horizon > MAX_HORIZON as f64 {
            return Err(SimulationError::config(format!(
                "max execution {} over {} ticks can push finish times past tick {}",
                self.max_execution, self.duration, MAX_HORIZON
            )));
        }

        Ok(())
    }

    /// Upper bound on the last finish tick
    ///
    /// Every tick schedules a job, all on one server, each running at the
    /// slowest frequency with a fully frequency-bound workload, plus one tick
    /// of rounding per job.
    pub fn worst_case_horizon(&self) -> f64 {
        let slowest = self
            .frequency_tiers
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min);
        let longest_task = (self.max_execution as f64 / slowest).ceil() + 1.0;
        let duration = self.duration as f64;
        duration + duration * longest_task
    }

    /// Tier index of server `index`; contiguous blocks, sizes differ by at most one
    pub fn tier_of(&self, index: usize) -> usize {
        index * self.frequency_tiers.len() / self.servers
    }

    /// Operating frequency of server `index`
    pub fn frequency_of(&self, index: usize) -> f64 {
        self.frequency_tiers[self.tier_of(index)]
    }
}

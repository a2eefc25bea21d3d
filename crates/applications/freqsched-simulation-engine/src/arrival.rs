//! Bernoulli job arrivals
//!
//! Each tick draws one uniform sample; a job arrives iff it falls below
//! `1 / arrival_rate`. Arriving jobs get a base duration uniform in
//! `[min_execution, max_execution)` and a frequency factor uniform in `[0, 1)`.

use crate::config::{MIN_EXECUTION, SimulationConfig};
use crate::error::{Result, SimulationError};
use crate::random::UniformSource;
use crate::types::{Job, Tick};

/// Per-tick arrival sampler
#[derive(Debug, Clone)]
pub struct ArrivalProcess {
    probability: f64,
    min_execution: f64,
    max_execution: f64,
}

impl ArrivalProcess {
    /// Build from validated parameters
    ///
    /// # Arguments
    /// * `arrival_rate` - Mean ticks between arrivals (must be > 0)
    /// * `max_execution` - Exclusive upper bound of base durations (must be >= 10)
    pub fn new(arrival_rate: u64, max_execution: i64) -> Result<Self> {
        if max_execution < MIN_EXECUTION {
            return Err(SimulationError::MaxExecutionTooSmall { max_execution });
        }
        if arrival_rate == 0 {
            return Err(SimulationError::ZeroArrivalRate);
        }

        Ok(ArrivalProcess {
            probability: 1.0 / arrival_rate as f64,
            min_execution: MIN_EXECUTION as f64,
            max_execution: max_execution as f64,
        })
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        Self::new(config.arrival_rate, config.max_execution)
    }

    /// Per-tick arrival probability
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Sample the arrival (if any) for `tick`
    ///
    /// Consumes one draw when no job arrives and three when one does.
    pub fn sample(&self, tick: Tick, source: &mut dyn UniformSource) -> Option<Job> {
        if source.next_uniform() >= self.probability {
            return None;
        }

        let base_duration = self.min_execution
            + (self.max_execution - self.min_execution) * source.next_uniform();
        let factor = source.next_uniform();

        Some(Job::new(tick, base_duration, factor))
    }
}

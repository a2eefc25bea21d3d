//! Core types for the simulation engine

use serde::{Deserialize, Serialize};

/// Simulated time unit
pub type Tick = u64;

/// One server of the farm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: usize,
    pub frequency: f64,       // Speed multiplier, 1.0 = fastest tier
    pub next_available: Tick, // Earliest tick at which the server is free
    pub busy_time: f64,       // Sum of task durations assigned so far
    pub jobs: u64,            // Number of tasks assigned so far
}

impl Server {
    pub fn new(id: usize, frequency: f64) -> Self {
        Server {
            id,
            frequency,
            next_available: 0,
            busy_time: 0.0,
            jobs: 0,
        }
    }

    /// Tick at which a task handed over at `tick` can start
    pub fn start_time(&self, tick: Tick) -> Tick {
        self.next_available.max(tick)
    }

    /// Predicted completion of `task_duration` handed over at `tick`
    pub fn finish_time(&self, tick: Tick, task_duration: f64) -> f64 {
        self.start_time(tick) as f64 + task_duration
    }
}

/// An arriving job; consumed by the scheduling decision on the tick it arrives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub arrival: Tick,
    pub base_duration: f64, // Duration at frequency 1.0
    pub factor: f64,        // Frequency-sensitive share of the work, in [0, 1)
}

impl Job {
    pub fn new(arrival: Tick, base_duration: f64, factor: f64) -> Self {
        Job {
            arrival,
            base_duration,
            factor,
        }
    }

    /// Execution time on a server running at `frequency`
    ///
    /// Amdahl-style split: `1 - factor` of the work ignores frequency,
    /// `factor` of it scales with `1 / frequency`.
    pub fn duration_on(&self, frequency: f64) -> f64 {
        self.base_duration * (1.0 + self.factor * (1.0 / frequency - 1.0))
    }
}

/// Outcome of a scheduling decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub server: usize,
    pub task_duration: f64, // Duration computed for this server specifically
}

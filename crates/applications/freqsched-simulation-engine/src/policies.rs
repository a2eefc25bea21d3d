//! Scheduling policies for job placement
//!
//! Implements the heuristics to compare:
//! - Random: uniformly random server, no look at farm state
//! - Greedy EFT: server with the earliest predicted finish time

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pool::ServerPool;
use crate::random::UniformSource;
use crate::types::{Assignment, Job, Tick};

/// Scheduling policy trait
pub trait SchedulingPolicy {
    /// Pick the server for `job` arriving at `tick`
    ///
    /// Returns `None` only for an empty pool.
    fn select_server(
        &mut self,
        job: &Job,
        tick: Tick,
        pool: &ServerPool,
        source: &mut dyn UniformSource,
    ) -> Option<Assignment>;

    /// Get policy name
    fn name(&self) -> &str;

    /// Sampled server indices that fell outside the pool and were clamped
    fn clamped_draws(&self) -> usize {
        0
    }
}

/// Selectable policy, used by the CLI and config files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum PolicyKind {
    /// Earliest finish time over all servers
    #[default]
    #[serde(rename = "greedy")]
    #[value(name = "greedy")]
    GreedyEft,

    /// Uniformly random server
    #[serde(rename = "random")]
    #[value(name = "random")]
    Random,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 2] = [PolicyKind::GreedyEft, PolicyKind::Random];

    pub fn build(self) -> Box<dyn SchedulingPolicy> {
        match self {
            PolicyKind::GreedyEft => Box::new(GreedyEftPolicy::new()),
            PolicyKind::Random => Box::new(RandomPolicy::new()),
        }
    }
}

/// Random policy: draw a server index uniformly in `[0, N)`
pub struct RandomPolicy {
    clamped: usize,
}

impl RandomPolicy {
    pub fn new() -> Self {
        RandomPolicy { clamped: 0 }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulingPolicy for RandomPolicy {
    fn select_server(
        &mut self,
        job: &Job,
        tick: Tick,
        pool: &ServerPool,
        source: &mut dyn UniformSource,
    ) -> Option<Assignment> {
        let servers = pool.len();
        if servers == 0 {
            return None;
        }

        let mut index = (source.next_uniform() * servers as f64) as usize;
        if index >= servers {
            warn!(tick, index, servers, "random server index out of bounds, clamping");
            self.clamped += 1;
            index = servers - 1;
        }

        let server = pool.get(index)?;
        Some(Assignment {
            server: index,
            task_duration: job.duration_on(server.frequency),
        })
    }

    fn name(&self) -> &str {
        "Random"
    }

    fn clamped_draws(&self) -> usize {
        self.clamped
    }
}

/// Greedy policy: minimise `task_duration(i) + max(tick, next_available(i))`
///
/// Every candidate is judged against its own backlog. The comparison is
/// strict, so ties go to the lowest index.
pub struct GreedyEftPolicy;

impl GreedyEftPolicy {
    pub fn new() -> Self {
        GreedyEftPolicy
    }
}

impl Default for GreedyEftPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulingPolicy for GreedyEftPolicy {
    fn select_server(
        &mut self,
        job: &Job,
        tick: Tick,
        pool: &ServerPool,
        _source: &mut dyn UniformSource,
    ) -> Option<Assignment> {
        let mut best: Option<(Assignment, f64)> = None;

        for (index, server) in pool.servers().iter().enumerate() {
            let task_duration = job.duration_on(server.frequency);
            let finish = server.finish_time(tick, task_duration);

            let better = match best {
                None => true,
                Some((_, best_finish)) => finish < best_finish,
            };
            if better {
                best = Some((
                    Assignment {
                        server: index,
                        task_duration,
                    },
                    finish,
                ));
            }
        }

        best.map(|(assignment, _)| assignment)
    }

    fn name(&self) -> &str {
        "GreedyEFT"
    }
}

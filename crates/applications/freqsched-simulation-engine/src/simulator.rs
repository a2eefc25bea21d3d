//! Discrete-time simulator for frequency-tiered server farms
//!
//! The clock runs ticks `1..=duration`. On every tick the arrival process
//! may produce a job, which the scheduling policy places immediately: there
//! is no queue. After the last tick the final pool state is handed to the
//! energy accountant.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::arrival::ArrivalProcess;
use crate::config::SimulationConfig;
use crate::energy::{EnergyAccountant, TierReport};
use crate::error::Result;
use crate::policies::SchedulingPolicy;
use crate::pool::ServerPool;
use crate::random::{SeededSource, UniformSource};
use crate::types::{Assignment, Tick};

/// Result of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub policy_name: String,
    pub seed: Option<u64>,
    pub arrival_rate: u64,
    pub max_execution: i64,
    pub servers: usize,
    pub duration: Tick,
    pub jobs_scheduled: u64,
    pub first_arrival: Option<Tick>,
    pub last_finish: Tick,
    pub effective_duration: Tick,
    pub overall_utilization: f64,
    pub energy: f64,
    pub tiers: Vec<TierReport>,
    /// Random server indices clamped back into the pool
    #[serde(default)]
    pub clamped_draws: usize,
}

impl SimulationResult {
    /// Plain-text report, one statistic per line, then a blank line
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(out, "Number of Jobs Scheduled: {}", self.jobs_scheduled);
        let _ = writeln!(
            out,
            "First job arrived at time: {}",
            self.first_arrival.unwrap_or(0)
        );
        let _ = writeln!(out, "Last job finished at: {}", self.last_finish);
        let _ = writeln!(out, "Overall utilization: {:.12}", self.overall_utilization);
        let _ = writeln!(out, "Energy: {:.6}", self.energy);
        out.push('\n');
        out
    }
}

/// Mutable run state, owned by the simulator and threaded through the tick loop
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub pool: ServerPool,
    pub jobs_scheduled: u64,
    pub first_arrival: Option<Tick>,
    pub current_tick: Tick,
}

impl SimulationState {
    pub fn new(pool: ServerPool) -> Self {
        SimulationState {
            pool,
            jobs_scheduled: 0,
            first_arrival: None,
            current_tick: 0,
        }
    }
}

/// Tick-driven simulator
pub struct Simulator {
    config: SimulationConfig,
    arrivals: ArrivalProcess,
    policy: Box<dyn SchedulingPolicy>,
    source: Box<dyn UniformSource>,
    seed: Option<u64>,
    state: SimulationState,
}

impl Simulator {
    /// Create a simulator with an explicit policy and random source
    ///
    /// Fails if the configuration is rejected; no tick runs in that case.
    /// The result carries no seed: an injected source is not replayable.
    pub fn new(
        config: SimulationConfig,
        policy: Box<dyn SchedulingPolicy>,
        source: Box<dyn UniformSource>,
    ) -> Result<Self> {
        config.validate()?;
        let arrivals = ArrivalProcess::from_config(&config)?;
        let state = SimulationState::new(ServerPool::from_config(&config));

        Ok(Simulator {
            seed: None,
            config,
            arrivals,
            policy,
            source,
            state,
        })
    }

    /// Wire policy and random source from the configuration
    ///
    /// Without a configured seed the source is seeded from OS entropy; the
    /// seed drawn is kept in the result so the run can be replayed.
    pub fn from_config(config: SimulationConfig) -> Result<Self> {
        let source = match config.seed {
            Some(seed) => SeededSource::from_seed(seed),
            None => SeededSource::from_entropy(),
        };
        let seed = source.seed();
        let policy = config.policy.build();

        let mut simulator = Self::new(config, policy, Box::new(source))?;
        simulator.seed = Some(seed);
        Ok(simulator)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.current_tick >= self.config.duration
    }

    /// Advance the clock by one tick
    ///
    /// Returns the assignment made on this tick, if a job arrived.
    pub fn step(&mut self) -> Option<Assignment> {
        if self.is_finished() {
            return None;
        }

        self.state.current_tick += 1;
        let tick = self.state.current_tick;

        let job = self.arrivals.sample(tick, &mut *self.source)?;
        self.state.jobs_scheduled += 1;
        self.state.first_arrival.get_or_insert(tick);

        let Some(assignment) =
            self.policy
                .select_server(&job, tick, &self.state.pool, &mut *self.source)
        else {
            warn!(tick, "no server available for arriving job");
            return None;
        };

        let finish = self.state.pool.assign(tick, &assignment);
        debug!(
            tick,
            server = assignment.server,
            task_duration = assignment.task_duration,
            finish,
            "job scheduled"
        );

        Some(assignment)
    }

    /// Run every remaining tick and account for the final state
    pub fn run(mut self) -> SimulationResult {
        info!(
            policy = self.policy.name(),
            servers = self.config.servers,
            duration = self.config.duration,
            arrival_rate = self.config.arrival_rate,
            max_execution = self.config.max_execution,
            seed = self.seed,
            "simulation starting"
        );

        while !self.is_finished() {
            self.step();
        }

        if self.state.first_arrival.is_none() {
            warn!("no job arrived during the simulation");
        }

        let result = self.collect_results();
        info!(
            policy = %result.policy_name,
            jobs = result.jobs_scheduled,
            last_finish = result.last_finish,
            utilization = result.overall_utilization,
            energy = result.energy,
            "simulation complete"
        );
        result
    }

    /// Collect simulation results
    fn collect_results(&self) -> SimulationResult {
        let report = EnergyAccountant::new(self.config.idle_power)
            .account(&self.state.pool, self.config.duration);

        SimulationResult {
            policy_name: self.policy.name().to_string(),
            seed: self.seed,
            arrival_rate: self.config.arrival_rate,
            max_execution: self.config.max_execution,
            servers: self.config.servers,
            duration: self.config.duration,
            jobs_scheduled: self.state.jobs_scheduled,
            first_arrival: self.state.first_arrival,
            last_finish: report.last_finish,
            effective_duration: report.effective_duration,
            overall_utilization: report.overall_utilization,
            energy: report.energy,
            tiers: report.tiers,
            clamped_draws: self.policy.clamped_draws(),
        }
    }
}

/// Run every policy on the same configuration and seed
///
/// Each run gets its own random source and its own farm; nothing is shared
/// between runs.
pub fn compare_policies(config: &SimulationConfig) -> Result<Vec<SimulationResult>> {
    config.validate()?;
    let seed = config
        .seed
        .unwrap_or_else(|| SeededSource::from_entropy().seed());

    crate::policies::PolicyKind::ALL
        .iter()
        .map(|&kind| {
            let run_config = config.clone().with_policy(kind).with_seed(seed);
            Simulator::from_config(run_config).map(Simulator::run)
        })
        .collect()
}

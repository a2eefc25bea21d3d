//! Post-run utilization and energy accounting
//!
//! Active power equals the server's frequency; idle power is a constant
//! draw independent of tier. The accounting window is the configured
//! duration, widened to the last finish when jobs run past the horizon.

use serde::{Deserialize, Serialize};

use crate::pool::ServerPool;
use crate::types::Tick;

/// Busy time and energy of one frequency tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierReport {
    pub frequency: f64,
    pub servers: usize,
    pub jobs: u64,
    pub busy_time: f64,
    pub utilization: f64,
    pub energy: f64,
}

/// Farm-wide summary produced after the last tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyReport {
    pub last_finish: Tick,
    pub effective_duration: Tick,
    pub total_busy_time: f64,
    pub overall_utilization: f64,
    pub energy: f64,
    pub tiers: Vec<TierReport>,
}

pub struct EnergyAccountant {
    idle_power: f64,
}

impl EnergyAccountant {
    pub fn new(idle_power: f64) -> Self {
        EnergyAccountant { idle_power }
    }

    /// Energy of one server over `window` ticks
    pub fn server_energy(&self, frequency: f64, busy_time: f64, window: Tick) -> f64 {
        busy_time * frequency + self.idle_power * (window as f64 - busy_time)
    }

    /// Summarise the final pool state
    pub fn account(&self, pool: &ServerPool, duration: Tick) -> EnergyReport {
        let last_finish = pool.last_finish();
        let effective_duration = duration.max(last_finish);
        let total_busy_time = pool.total_busy_time();

        let capacity = effective_duration as f64 * pool.len() as f64;
        let overall_utilization = if capacity > 0.0 {
            total_busy_time / capacity
        } else {
            0.0
        };

        let energy = pool
            .servers()
            .iter()
            .map(|s| self.server_energy(s.frequency, s.busy_time, effective_duration))
            .sum();

        EnergyReport {
            last_finish,
            effective_duration,
            total_busy_time,
            overall_utilization,
            energy,
            tiers: self.tier_breakdown(pool, effective_duration),
        }
    }

    /// Group servers into runs of equal frequency, in pool order
    fn tier_breakdown(&self, pool: &ServerPool, window: Tick) -> Vec<TierReport> {
        let mut tiers: Vec<TierReport> = Vec::new();

        for server in pool.servers() {
            let energy = self.server_energy(server.frequency, server.busy_time, window);
            match tiers.last_mut() {
                Some(tier) if tier.frequency == server.frequency => {
                    tier.servers += 1;
                    tier.jobs += server.jobs;
                    tier.busy_time += server.busy_time;
                    tier.energy += energy;
                }
                _ => tiers.push(TierReport {
                    frequency: server.frequency,
                    servers: 1,
                    jobs: server.jobs,
                    busy_time: server.busy_time,
                    utilization: 0.0,
                    energy,
                }),
            }
        }

        if window > 0 {
            for tier in &mut tiers {
                tier.utilization = tier.busy_time / (window as f64 * tier.servers as f64);
            }
        }

        tiers
    }
}

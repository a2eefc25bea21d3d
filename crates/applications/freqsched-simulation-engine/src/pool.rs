//! Server farm state
//!
//! Holds, per server, its operating frequency, the next tick at which it is
//! free and the busy time accumulated so far. The pool is only mutated
//! through [`ServerPool::assign`], once per scheduled job.

use crate::config::SimulationConfig;
use crate::types::{Assignment, Server, Tick};

#[derive(Debug, Clone)]
pub struct ServerPool {
    servers: Vec<Server>,
}

impl ServerPool {
    /// Build the farm with servers laid out tier by tier, slowest first
    pub fn from_config(config: &SimulationConfig) -> Self {
        let servers = (0..config.servers)
            .map(|id| Server::new(id, config.frequency_of(id)))
            .collect();
        ServerPool { servers }
    }

    /// Pool from an explicit list of frequencies, all servers free at tick 0
    pub fn with_frequencies(frequencies: &[f64]) -> Self {
        let servers = frequencies
            .iter()
            .enumerate()
            .map(|(id, &frequency)| Server::new(id, frequency))
            .collect();
        ServerPool { servers }
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn get(&self, index: usize) -> Option<&Server> {
        self.servers.get(index)
    }

    /// Record a task on its server
    ///
    /// The server's next free tick becomes `max(next_available, tick)` plus the
    /// task duration rounded up to a whole tick, so it never precedes the
    /// task's true completion. Returns the new next free tick, or `None` if
    /// the index is outside the pool (nothing is written in that case).
    pub fn assign(&mut self, tick: Tick, assignment: &Assignment) -> Option<Tick> {
        let server = self.servers.get_mut(assignment.server)?;

        server.busy_time += assignment.task_duration;
        server.jobs += 1;
        server.next_available = server.start_time(tick) + assignment.task_duration.ceil() as Tick;

        Some(server.next_available)
    }

    /// Latest next-free tick over the farm, 0 for an untouched pool
    pub fn last_finish(&self) -> Tick {
        self.servers
            .iter()
            .map(|s| s.next_available)
            .max()
            .unwrap_or(0)
    }

    pub fn total_busy_time(&self) -> f64 {
        self.servers.iter().map(|s| s.busy_time).sum()
    }

    #[cfg(test)]
    pub(crate) fn server_mut(&mut self, index: usize) -> &mut Server {
        &mut self.servers[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_from_default_config() {
        let pool = ServerPool::from_config(&SimulationConfig::default());
        assert_eq!(pool.len(), 100);
        assert!(pool.servers().iter().all(|s| s.next_available == 0));
        assert!(pool.servers().iter().all(|s| s.busy_time == 0.0));

        let frequencies: Vec<f64> = pool.servers().iter().map(|s| s.frequency).collect();
        assert!(frequencies.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(frequencies.iter().filter(|&&f| f == 0.6).count(), 20);
        assert_eq!(frequencies.iter().filter(|&&f| f == 1.0).count(), 20);
    }

    #[test]
    fn test_assign_to_idle_server() {
        let mut pool = ServerPool::with_frequencies(&[1.0, 1.0]);
        let next = pool.assign(
            5,
            &Assignment {
                server: 1,
                task_duration: 12.3,
            },
        );
        assert_eq!(next, Some(18));

        let server = pool.get(1).unwrap();
        assert_eq!(server.busy_time, 12.3);
        assert_eq!(server.jobs, 1);
        assert!(server.next_available as f64 >= 5.0 + 12.3);
    }

    #[test]
    fn test_assign_queues_behind_backlog() {
        let mut pool = ServerPool::with_frequencies(&[0.8]);
        pool.server_mut(0).next_available = 40;
        let next = pool.assign(
            10,
            &Assignment {
                server: 0,
                task_duration: 10.0,
            },
        );
        assert_eq!(next, Some(50));
        assert_eq!(pool.last_finish(), 50);
    }

    #[test]
    fn test_assign_out_of_range_is_ignored() {
        let mut pool = ServerPool::with_frequencies(&[1.0]);
        let next = pool.assign(
            1,
            &Assignment {
                server: 3,
                task_duration: 10.0,
            },
        );
        assert_eq!(next, None);
        assert_eq!(pool.total_busy_time(), 0.0);
    }

    #[test]
    fn test_next_available_is_monotonic() {
        let mut pool = ServerPool::with_frequencies(&[1.0]);
        let mut previous = 0;
        for tick in [1, 2, 50, 51, 200] {
            let next = pool
                .assign(
                    tick,
                    &Assignment {
                        server: 0,
                        task_duration: 17.25,
                    },
                )
                .unwrap();
            assert!(next >= previous);
            previous = next;
        }
        assert!((pool.total_busy_time() - 5.0 * 17.25).abs() < 1e-9);
    }
}

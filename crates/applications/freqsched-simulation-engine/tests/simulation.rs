//! End-to-end runs through the public API

use freqsched_simulation_engine::policies::{GreedyEftPolicy, PolicyKind};
use freqsched_simulation_engine::random::SequenceSource;
use freqsched_simulation_engine::{SimulationConfig, SimulationError, Simulator, compare_policies};

fn seeded(arrival_rate: u64, max_execution: i64, policy: PolicyKind, seed: u64) -> SimulationConfig {
    SimulationConfig::new(arrival_rate, max_execution)
        .with_policy(policy)
        .with_seed(seed)
}

#[test]
fn test_same_seed_same_result() {
    for policy in PolicyKind::ALL {
        let a = Simulator::from_config(seeded(3, 80, policy, 1234)).unwrap().run();
        let b = Simulator::from_config(seeded(3, 80, policy, 1234)).unwrap().run();
        assert_eq!(a, b);
        assert_eq!(a.render(), b.render());
    }
}

#[test]
fn test_utilization_stays_in_unit_interval() {
    for (arrival_rate, max_execution) in [(1, 10), (1, 500), (2, 200), (5, 60), (50, 1000)] {
        for policy in PolicyKind::ALL {
            let result = Simulator::from_config(seeded(arrival_rate, max_execution, policy, 99))
                .unwrap()
                .run();
            assert!(
                (0.0..=1.0).contains(&result.overall_utilization),
                "utilization {} out of range for rate {} max {} {:?}",
                result.overall_utilization,
                arrival_rate,
                max_execution,
                policy
            );
            assert!(result.effective_duration >= result.duration);
            assert!(result.effective_duration >= result.last_finish);
        }
    }
}

#[test]
fn test_saturated_farm_widens_the_window() {
    // One job per tick averaging ~255 ticks overwhelms 100 servers
    let result = Simulator::from_config(seeded(1, 500, PolicyKind::GreedyEft, 7))
        .unwrap()
        .run();
    assert!(result.last_finish > result.duration);
    assert_eq!(result.effective_duration, result.last_finish);
    assert!(result.overall_utilization <= 1.0);
    assert!(result.overall_utilization > 0.9);
}

#[test]
fn test_rate_one_schedules_every_tick() {
    for policy in PolicyKind::ALL {
        let result = Simulator::from_config(seeded(1, 40, policy, 5)).unwrap().run();
        assert_eq!(result.jobs_scheduled, 10_000);
        assert_eq!(result.first_arrival, Some(1));
    }
}

#[test]
fn test_rejection_schedules_nothing() {
    let config = seeded(1, 9, PolicyKind::GreedyEft, 1);
    match Simulator::from_config(config.clone()) {
        Err(e @ SimulationError::MaxExecutionTooSmall { .. }) => {
            assert_eq!(e.to_string(), "max execution should be at least 10");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("max execution 9 must be rejected"),
    }
    assert!(compare_policies(&config).is_err());
}

#[test]
fn test_zero_arrival_rate_rejected_before_run() {
    let result = Simulator::from_config(seeded(0, 50, PolicyKind::Random, 1));
    assert!(matches!(result, Err(SimulationError::ZeroArrivalRate)));
}

#[test]
fn test_unused_servers_draw_idle_energy() {
    // A single job on a farm of 100: 99 servers stay idle all run
    let mut config = SimulationConfig::new(1, 20);
    config.duration = 1;
    let simulator = Simulator::new(
        config,
        Box::new(GreedyEftPolicy::new()),
        Box::new(SequenceSource::new(vec![0.0, 0.5, 1.0])),
    )
    .unwrap();
    let result = simulator.run();

    assert_eq!(result.jobs_scheduled, 1);
    let window = result.effective_duration as f64;
    let fastest = result.tiers.last().unwrap();
    assert_eq!(fastest.jobs, 1);

    let idle_tiers: f64 = result.tiers[..result.tiers.len() - 1]
        .iter()
        .map(|t| t.energy)
        .sum();
    assert!((idle_tiers - 80.0 * 0.4 * window).abs() < 1e-6);
}

#[test]
fn test_greedy_spreads_load_toward_fast_tiers() {
    let result = Simulator::from_config(seeded(2, 100, PolicyKind::GreedyEft, 21))
        .unwrap()
        .run();
    let slowest = result.tiers.first().unwrap();
    let fastest = result.tiers.last().unwrap();
    assert_eq!(result.tiers.len(), 5);
    assert!(fastest.jobs >= slowest.jobs);
}

#[test]
fn test_compare_keeps_runs_independent() {
    let config = seeded(4, 150, PolicyKind::GreedyEft, 77);
    let results = compare_policies(&config).unwrap();
    let greedy = Simulator::from_config(config.clone()).unwrap().run();
    let random = Simulator::from_config(config.with_policy(PolicyKind::Random))
        .unwrap()
        .run();

    assert_eq!(results, vec![greedy, random]);
}

#[test]
fn test_result_serializes_to_json() {
    let result = Simulator::from_config(seeded(5, 30, PolicyKind::Random, 3))
        .unwrap()
        .run();
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"policy_name\":\"Random\""));
    assert!(json.contains("\"seed\":3"));
}

#[test]
fn test_unbounded_max_execution_rejected_before_run() {
    let mut config = seeded(1, i64::MAX, PolicyKind::GreedyEft, 1);
    config.duration = 300;
    assert!(matches!(
        Simulator::from_config(config.clone()),
        Err(SimulationError::Config(_))
    ));
    assert!(compare_policies(&config).is_err());
}

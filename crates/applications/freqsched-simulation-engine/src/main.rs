//! Freqsched Simulation Engine CLI
//!
//! Command-line interface for comparing scheduling heuristics on a
//! frequency-tiered server farm.
//!
//! ```bash
//! # Greedy EFT, one job every 2 ticks on average, base durations in [10, 100)
//! freqsched-sim 2 100
//!
//! # Same run for every policy with a fixed seed, results as JSON
//! freqsched-sim 2 100 --compare --seed 42 --output results.json
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use freqsched_simulation_engine::{
    PolicyKind, SimulationConfig, SimulationResult, Simulator, compare_policies,
};

#[derive(Parser, Debug)]
#[command(name = "freqsched-sim")]
#[command(about = "Simulate job scheduling heuristics on a frequency-tiered server farm", long_about = None)]
struct Args {
    /// Mean ticks between arrivals; a job arrives with probability 1/ARRIVAL_RATE per tick
    arrival_rate: u64,

    /// Exclusive upper bound of base job durations (at least 10)
    #[arg(allow_negative_numbers = true)]
    max_execution: i64,

    /// Scheduling policy
    #[arg(short, long, value_enum)]
    policy: Option<PolicyKind>,

    /// Run every policy on the same seed and report each
    #[arg(long)]
    compare: bool,

    /// Seed for a reproducible run (default: OS entropy)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of servers
    #[arg(long)]
    servers: Option<usize>,

    /// Simulation duration in ticks
    #[arg(short, long)]
    duration: Option<u64>,

    /// Base configuration file (JSON); command-line values take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON file path (optional)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exit with a failure status when max execution is below 10
    #[arg(long)]
    strict: bool,
}

impl Args {
    fn to_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        config.arrival_rate = self.arrival_rate;
        config.max_execution = self.max_execution;
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(servers) = self.servers {
            config.servers = servers;
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    // stdout carries the report; logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "freqsched_simulation_engine=warn,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the process should exit successfully
fn run(args: &Args) -> Result<bool> {
    let config = args.to_config()?;

    if let Err(e) = config.validate() {
        if e.is_legacy_rejection() {
            // Historical behaviour: report on stdout and exit successfully
            println!("{e}");
            return Ok(!args.strict);
        }
        return Err(e).context("invalid simulation configuration");
    }

    let results: Vec<SimulationResult> = if args.compare {
        compare_policies(&config)?
    } else {
        vec![Simulator::from_config(config)?.run()]
    };

    for result in &results {
        if args.compare {
            println!("Policy: {}", result.policy_name);
        }
        print!("{}", result.render());
    }

    if let Some(output_path) = &args.output {
        let json = serde_json::to_string_pretty(&results)?;
        fs::write(output_path, json)
            .with_context(|| format!("failed to write results to {}", output_path.display()))?;
        info!(path = %output_path.display(), "results saved");
    }

    Ok(true)
}

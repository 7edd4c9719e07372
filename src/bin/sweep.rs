//! Queue-size sweep across all trackers.
//!
//! Runs every algorithm over a range of window capacities with a fixed
//! uniform workload and prints per-configuration timing statistics, for
//! comparing how the trackers scale with the window.

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use rankkit::experiment::{AlgorithmKind, Params, run_repeated};

const QUEUE_SIZES: &[usize] = &[1, 2, 5, 10, 20, 50, 100, 200, 500];

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize logging: {err}"))?;

    for algorithm in [
        AlgorithmKind::NoProcessing,
        AlgorithmKind::Baseline,
        AlgorithmKind::Ranked,
    ] {
        for &queue_size in QUEUE_SIZES {
            let params = Params {
                algorithm,
                queue_size,
                flow_count: 150,
                seq_size: 1_000_000,
                k: 1,
                seed: 1,
                validate: false,
                repetitions: 10,
            };
            info!(%params, "sweep point");
            let stats = run_repeated(&params)
                .map_err(|err| anyhow::anyhow!("sweep point failed: {err}"))?;
            println!("ran as: {params}");
            println!("execution time statistics: {stats}");
        }
    }
    Ok(())
}

//! Sliding-window heaviest-hitters experiment runner.
//!
//! Drives the selected tracker over the uniform workload and prints timing
//! statistics aggregated over the requested repetitions.

use std::process::exit;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use rankkit::experiment::{AlgorithmKind, Params, run_repeated};
use rankkit::error::RunError;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("run with --help for usage");
            exit(2);
        }
    };

    if cli.help {
        print_help();
        return Ok(());
    }
    if cli.version {
        println!("rankkit experiment {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize logging: {err}"))?;

    let mut params = Params::default();
    if let Some(algorithm) = cli.algorithm {
        params.algorithm = algorithm;
    }
    if let Some(queue_size) = cli.queue_size {
        params.queue_size = queue_size;
    }
    if let Some(flow_count) = cli.flow_count {
        params.flow_count = flow_count;
    }
    if let Some(seq_size) = cli.seq_size {
        params.seq_size = seq_size;
    }
    if let Some(k) = cli.k {
        params.k = k;
    }
    if let Some(seed) = cli.seed {
        params.seed = seed;
    }
    if let Some(repetitions) = cli.repetitions {
        params.repetitions = repetitions;
    }
    params.validate = cli.validate;

    if let Err(err) = params.validate() {
        eprintln!("error: {err}");
        exit(2);
    }

    info!(%params, "starting experiment");
    match run_repeated(&params) {
        Ok(stats) => {
            println!("ran as: {params}");
            println!("execution time statistics: {stats}");
            Ok(())
        }
        Err(RunError::Validation(err)) => {
            error!(iteration = err.iteration(), "ranked results diverged from baseline");
            eprintln!("error: {err}");
            exit(1);
        }
        Err(RunError::Config(err)) => {
            eprintln!("error: {err}");
            exit(2);
        }
    }
}

/// CLI arguments
struct CliArgs {
    algorithm: Option<AlgorithmKind>,
    queue_size: Option<usize>,
    flow_count: Option<u64>,
    seq_size: Option<usize>,
    k: Option<usize>,
    seed: Option<u64>,
    validate: bool,
    repetitions: Option<usize>,
    help: bool,
    version: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs {
        algorithm: None,
        queue_size: None,
        flow_count: None,
        seq_size: None,
        k: None,
        seed: None,
        validate: false,
        repetitions: None,
        help: false,
        version: false,
    };

    fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
        args.get(i)
            .map(String::as_str)
            .ok_or_else(|| format!("{flag} requires a value"))
    }

    fn number<T: std::str::FromStr>(raw: &str, flag: &str) -> Result<T, String> {
        raw.parse()
            .map_err(|_| format!("{flag} expects a non-negative integer, got '{raw}'"))
    }

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--alg" | "-a" => {
                i += 1;
                let raw = value(args, i, "--alg")?;
                cli.algorithm = Some(
                    AlgorithmKind::parse(raw)
                        .ok_or_else(|| format!("unknown algorithm '{raw}' (expected none, baseline or ranked)"))?,
                );
            }
            "--queue" | "-q" => {
                i += 1;
                cli.queue_size = Some(number(value(args, i, "--queue")?, "--queue")?);
            }
            "--flows" | "-f" => {
                i += 1;
                cli.flow_count = Some(number(value(args, i, "--flows")?, "--flows")?);
            }
            "--seqsize" | "-s" => {
                i += 1;
                cli.seq_size = Some(number(value(args, i, "--seqsize")?, "--seqsize")?);
            }
            "--k" | "-k" => {
                i += 1;
                cli.k = Some(number(value(args, i, "--k")?, "--k")?);
            }
            "--seed" | "-r" => {
                i += 1;
                cli.seed = Some(number(value(args, i, "--seed")?, "--seed")?);
            }
            "--validate" | "-v" => {
                cli.validate = true;
            }
            "--repetitions" | "-n" => {
                i += 1;
                cli.repetitions = Some(number(value(args, i, "--repetitions")?, "--repetitions")?);
            }
            "--help" | "-h" => {
                cli.help = true;
            }
            "--version" | "-V" => {
                cli.version = true;
            }
            other => {
                return Err(format!("unknown option '{other}'"));
            }
        }
        i += 1;
    }

    Ok(cli)
}

fn print_help() {
    println!(
        "\
rankkit experiment: sliding-window heaviest-hitters benchmark

USAGE:
    experiment [OPTIONS]

OPTIONS:
    -a, --alg <none|baseline|ranked>   Tracker to exercise (default: none)
    -q, --queue <N>                    Window capacity in items (default: 50)
    -f, --flows <N>                    Number of distinct flows (default: 100)
    -s, --seqsize <N>                  Total items to process (default: 10000)
    -k, --k <N>                        Heaviest hitters to query per append (default: 1)
    -r, --seed <N>                     RNG seed (default: 1)
    -v, --validate                     Check ranked results against the baseline
                                       after every update (ranked only)
    -n, --repetitions <N>              Identical runs to aggregate timing over (default: 1)
    -h, --help                         Print this help
    -V, --version                      Print version

EXIT CODES:
    0   success
    1   validation mismatch
    2   argument error"
    );
}

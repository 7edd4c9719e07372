//! Sliding-window experiment harness.
//!
//! Drives a heaviest-hitters tracker the way a router queue would: a
//! bounded FIFO window of flow ids is filled to capacity, then cycled one
//! expire and one append at a time, then drained. The top-k ranking is
//! queried after every append. With validation enabled, a
//! [`BaselineCounter`] mirrors every update and the two full rankings are
//! compared after each one.
//!
//! Flow ids are drawn uniformly from a seeded [`SmallRng`], so runs with
//! identical parameters replay the identical update sequence.

pub mod timing;

use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::baseline::BaselineCounter;
use crate::error::{ConfigError, RunError, ValidationError};
use crate::ranked::RankedMultiset;
use timing::TimingStats;

/// Which tracker the experiment exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmKind {
    /// No tracking at all; measures the bare cost of moving items through
    /// the window.
    NoProcessing,
    /// The map-and-sort [`BaselineCounter`].
    Baseline,
    /// The [`RankedMultiset`].
    Ranked,
}

impl AlgorithmKind {
    /// Parses the command-line spelling of an algorithm name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::NoProcessing),
            "baseline" => Some(Self::Baseline),
            "ranked" => Some(Self::Ranked),
            _ => None,
        }
    }

    /// Returns the command-line spelling of this algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoProcessing => "none",
            Self::Baseline => "baseline",
            Self::Ranked => "ranked",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Experiment parameters.
#[derive(Debug, Clone)]
pub struct Params {
    /// Tracker to exercise.
    pub algorithm: AlgorithmKind,
    /// Window capacity in items.
    pub queue_size: usize,
    /// Number of distinct flow ids.
    pub flow_count: u64,
    /// Total items to generate across the run.
    pub seq_size: usize,
    /// Top-k parameter for the per-append query.
    pub k: usize,
    /// RNG seed; equal seeds replay equal sequences.
    pub seed: u64,
    /// Mirror every update into a baseline oracle and compare.
    pub validate: bool,
    /// Identical sequential runs to aggregate timing over.
    pub repetitions: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmKind::NoProcessing,
            queue_size: 50,
            flow_count: 100,
            seq_size: 10_000,
            k: 1,
            seed: 1,
            validate: false,
            repetitions: 1,
        }
    }
}

impl Params {
    /// Rejects parameter combinations the harness cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_size == 0 {
            return Err(ConfigError::new("queue size must be at least 1"));
        }
        if self.flow_count == 0 {
            return Err(ConfigError::new("flow count must be at least 1"));
        }
        if self.seq_size == 0 {
            return Err(ConfigError::new("sequence size must be at least 1"));
        }
        if self.k == 0 {
            return Err(ConfigError::new("k must be at least 1"));
        }
        if self.repetitions == 0 {
            return Err(ConfigError::new("repetitions must be at least 1"));
        }
        if self.validate && self.algorithm != AlgorithmKind::Ranked {
            return Err(ConfigError::new(
                "validation is only available for the ranked algorithm",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alg:{} queue:{} flows:{} seqsize:{} k:{} seed:{} validate:{} repetitions:{}",
            self.algorithm,
            self.queue_size,
            self.flow_count,
            self.seq_size,
            self.k,
            self.seed,
            self.validate,
            self.repetitions
        )
    }
}

#[derive(Debug)]
enum Tracker {
    NoProcessing,
    Baseline(BaselineCounter<u64>),
    Ranked(RankedMultiset<u64>),
}

impl Tracker {
    fn new(kind: AlgorithmKind, queue_size: usize) -> Self {
        match kind {
            AlgorithmKind::NoProcessing => Self::NoProcessing,
            AlgorithmKind::Baseline => Self::Baseline(BaselineCounter::new()),
            AlgorithmKind::Ranked => Self::Ranked(RankedMultiset::new(queue_size)),
        }
    }

    fn append(&mut self, flow: u64) {
        match self {
            Self::NoProcessing => {}
            Self::Baseline(counter) => counter.append(flow),
            Self::Ranked(set) => set.append(flow),
        }
    }

    fn expire(&mut self, flow: &u64) {
        match self {
            Self::NoProcessing => {}
            Self::Baseline(counter) => counter.expire(flow),
            Self::Ranked(set) => set.expire(flow),
        }
    }

    fn query_heaviest(&self, k: usize) -> Vec<(u64, usize)> {
        match self {
            Self::NoProcessing => Vec::new(),
            Self::Baseline(counter) => counter.query_heaviest(k),
            Self::Ranked(set) => set.query_heaviest(k),
        }
    }

    fn key_count(&self) -> usize {
        match self {
            Self::NoProcessing => 0,
            Self::Baseline(counter) => counter.len(),
            Self::Ranked(set) => set.len(),
        }
    }
}

/// One configured run over the uniform workload.
#[derive(Debug)]
pub struct Experiment {
    params: Params,
    rng: SmallRng,
    window: VecDeque<u64>,
    tracker: Tracker,
    oracle: Option<BaselineCounter<u64>>,
    iteration: u64,
    generated: usize,
}

impl Experiment {
    /// Builds an experiment, rejecting invalid parameters.
    pub fn new(params: Params) -> Result<Self, ConfigError> {
        params.validate()?;
        let tracker = Tracker::new(params.algorithm, params.queue_size);
        let oracle = params.validate.then(BaselineCounter::new);
        Ok(Self {
            rng: SmallRng::seed_from_u64(params.seed),
            window: VecDeque::with_capacity(params.queue_size),
            tracker,
            oracle,
            iteration: 0,
            generated: 0,
            params,
        })
    }

    /// Returns the number of updates applied so far.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Runs the uniform workload to completion: fill the window, cycle it
    /// until `seq_size` items have been generated, then drain it.
    pub fn run(&mut self) -> Result<(), ValidationError> {
        while self.window.len() < self.params.queue_size && self.generated < self.params.seq_size {
            self.append_item()?;
        }
        while self.generated < self.params.seq_size {
            self.expire_item()?;
            self.append_item()?;
        }
        while !self.window.is_empty() {
            self.expire_item()?;
        }
        Ok(())
    }

    fn append_item(&mut self) -> Result<(), ValidationError> {
        let flow = self.rng.random::<u64>() % self.params.flow_count;
        self.window.push_back(flow);
        self.iteration += 1;
        self.generated += 1;

        self.tracker.append(flow);
        std::hint::black_box(self.tracker.query_heaviest(self.params.k));

        if self.oracle.is_some() {
            self.oracle.as_mut().expect("oracle missing").append(flow);
            self.check_against_oracle()?;
        }
        Ok(())
    }

    fn expire_item(&mut self) -> Result<(), ValidationError> {
        let flow = self.window.pop_front().expect("expire on empty window");
        self.iteration += 1;

        self.tracker.expire(&flow);

        if self.oracle.is_some() {
            self.oracle.as_mut().expect("oracle missing").expire(&flow);
            self.check_against_oracle()?;
        }
        Ok(())
    }

    fn check_against_oracle(&self) -> Result<(), ValidationError> {
        let oracle = self.oracle.as_ref().expect("oracle missing");
        let expected = oracle.query_heaviest(oracle.len());
        let actual = self
            .tracker
            .query_heaviest(self.tracker.key_count().max(oracle.len()));
        if results_match(&expected, &actual) {
            Ok(())
        } else {
            Err(ValidationError::new(self.iteration, expected, actual))
        }
    }
}

/// Compares two rankings, treating equal-count groups as unordered sets.
///
/// Both inputs must be sorted non-increasing by count, which every tracker
/// guarantees. Group boundaries are taken from `expected`; the same count
/// must span the same index range in `actual` with the same key set.
pub fn results_match(expected: &[(u64, usize)], actual: &[(u64, usize)]) -> bool {
    if expected.len() != actual.len() {
        return false;
    }
    let mut start = 0;
    while start < expected.len() {
        let count = expected[start].1;
        let mut end = start;
        while end < expected.len() && expected[end].1 == count {
            end += 1;
        }
        if actual[start..end].iter().any(|&(_, c)| c != count) {
            return false;
        }
        let mut expected_keys: Vec<u64> = expected[start..end].iter().map(|&(f, _)| f).collect();
        let mut actual_keys: Vec<u64> = actual[start..end].iter().map(|&(f, _)| f).collect();
        expected_keys.sort_unstable();
        actual_keys.sort_unstable();
        if expected_keys != actual_keys {
            return false;
        }
        start = end;
    }
    true
}

/// Runs `params.repetitions` identical experiments and aggregates their
/// wall-clock times.
pub fn run_repeated(params: &Params) -> Result<TimingStats, RunError> {
    params.validate()?;
    let mut stats = TimingStats::new();
    for repetition in 1..=params.repetitions {
        let mut experiment = Experiment::new(params.clone())?;
        let started = Instant::now();
        experiment.run()?;
        let elapsed = started.elapsed();
        stats.record(elapsed);
        debug!(repetition, ?elapsed, "experiment run complete");
    }
    info!(%params, %stats, "experiment finished");
    Ok(stats)
}

// ==============================================
// ORACLE EQUIVALENCE TESTS (integration)
// ==============================================
//
// Property tests pitting the ranked multiset against the map-and-sort
// baseline over seeded pseudo-random sliding-window workloads. Equal-count
// groups are compared as unordered sets; everything else must agree
// exactly, after every single update.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use rankkit::baseline::BaselineCounter;
use rankkit::experiment::{AlgorithmKind, Experiment, Params, results_match};
use rankkit::ranked::RankedMultiset;

/// Asserts that the two trackers agree on the full ranking and on every
/// top-k prefix group-wise.
fn assert_equivalent(set: &RankedMultiset<u64>, oracle: &BaselineCounter<u64>, step: usize) {
    assert_eq!(set.len(), oracle.len(), "key population diverged at step {step}");

    let expected = oracle.query_heaviest(oracle.len());
    let actual = set.query_heaviest(set.len());
    assert!(
        results_match(&expected, &actual),
        "full ranking diverged at step {step}: expected {expected:?}, got {actual:?}"
    );

    // Top-k prefixes agree on the count sequence for any k; key sets may
    // only differ inside a count group that the cut k splits.
    for k in [1, 2, 5] {
        let expected_counts: Vec<usize> =
            oracle.query_heaviest(k).iter().map(|&(_, c)| c).collect();
        let actual_counts: Vec<usize> = set.query_heaviest(k).iter().map(|&(_, c)| c).collect();
        assert_eq!(expected_counts, actual_counts, "top-{k} counts diverged at step {step}");
    }
}

/// Drives both trackers through a full uniform window workload, checking
/// equivalence after every update.
fn run_mirrored(window_capacity: usize, flow_count: u64, seq_size: usize, seed: u64) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut window: VecDeque<u64> = VecDeque::with_capacity(window_capacity);
    let mut set = RankedMultiset::new(window_capacity);
    let mut oracle = BaselineCounter::new();
    let mut step = 0usize;

    let append = |window: &mut VecDeque<u64>,
                  set: &mut RankedMultiset<u64>,
                  oracle: &mut BaselineCounter<u64>,
                  rng: &mut SmallRng,
                  step: &mut usize| {
        let flow = rng.random::<u64>() % flow_count;
        window.push_back(flow);
        set.append(flow);
        oracle.append(flow);
        *step += 1;
        set.debug_validate_invariants();
        assert_equivalent(set, oracle, *step);
    };
    let expire = |window: &mut VecDeque<u64>,
                  set: &mut RankedMultiset<u64>,
                  oracle: &mut BaselineCounter<u64>,
                  step: &mut usize| {
        let flow = window.pop_front().expect("window empty");
        set.expire(&flow);
        oracle.expire(&flow);
        *step += 1;
        set.debug_validate_invariants();
        assert_equivalent(set, oracle, *step);
    };

    let mut generated = 0usize;
    while window.len() < window_capacity && generated < seq_size {
        append(&mut window, &mut set, &mut oracle, &mut rng, &mut step);
        generated += 1;
    }
    while generated < seq_size {
        expire(&mut window, &mut set, &mut oracle, &mut step);
        append(&mut window, &mut set, &mut oracle, &mut rng, &mut step);
        generated += 1;
    }
    while !window.is_empty() {
        expire(&mut window, &mut set, &mut oracle, &mut step);
    }

    assert!(set.is_empty());
    assert!(oracle.is_empty());
}

#[test]
fn mirrored_run_small_window_heavy_collisions() {
    // Tiny key space forces constant promotion and demotion churn.
    run_mirrored(8, 3, 400, 11);
}

#[test]
fn mirrored_run_medium_window() {
    run_mirrored(32, 20, 1_500, 42);
}

#[test]
fn mirrored_runs_across_seeds() {
    for seed in 1..=6 {
        run_mirrored(16, 10, 600, seed);
    }
}

#[test]
fn mirrored_run_single_flow_degenerate() {
    // One flow: the window is a single key rising to capacity and falling.
    run_mirrored(12, 1, 300, 5);
}

// The reference configuration: a 50-item window, 100 flows, 10000 items,
// validated after every update by the experiment harness itself.
#[test]
fn reference_configuration_validates_end_to_end() {
    let params = Params {
        algorithm: AlgorithmKind::Ranked,
        queue_size: 50,
        flow_count: 100,
        seq_size: 10_000,
        k: 1,
        seed: 1,
        validate: true,
        repetitions: 1,
    };
    let mut experiment = Experiment::new(params).expect("valid params");
    experiment
        .run()
        .expect("ranked results must match the baseline at every update");
}

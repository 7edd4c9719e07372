// ==============================================
// RANKED MULTISET BEHAVIOR TESTS (integration)
// ==============================================
//
// End-to-end scenarios for the ranked multiset driven through its public
// API only: canonical query shapes, boundary cases, and the algebraic
// laws (unmatched-pair neutrality, independent-key commutativity) that
// the internal splice logic must preserve.

use rankkit::ranked::RankedMultiset;

fn counts_of(result: &[(&str, usize)]) -> Vec<usize> {
    result.iter().map(|&(_, count)| count).collect()
}

fn keys_sorted<'a>(result: &'a [(&'a str, usize)]) -> Vec<&'a str> {
    let mut keys: Vec<&str> = result.iter().map(|&(key, _)| key).collect();
    keys.sort_unstable();
    keys
}

// ==============================================
// Canonical query scenarios
// ==============================================

#[test]
fn singleton_key_reported_for_any_k() {
    let mut set = RankedMultiset::new(8);
    set.append("a");
    assert_eq!(set.query_heaviest(1), vec![("a", 1)]);
    assert_eq!(set.query_heaviest(5), vec![("a", 1)]);
}

#[test]
fn distinct_keys_tie_group_is_unordered() {
    let mut set = RankedMultiset::new(8);
    set.append("a");
    set.append("b");
    set.append("c");

    let result = set.query_heaviest(2);
    assert_eq!(result.len(), 2);
    assert_eq!(counts_of(&result), vec![1, 1]);
    for (key, _) in &result {
        assert!(["a", "b", "c"].contains(key));
    }
    assert_ne!(result[0].0, result[1].0);
}

#[test]
fn rise_and_fall_between_queries() {
    let mut set = RankedMultiset::new(8);
    set.append("a");
    set.append("a");
    set.append("b");
    assert_eq!(set.query_heaviest(1), vec![("a", 2)]);

    set.expire(&"a");
    let result = set.query_heaviest(2);
    assert_eq!(counts_of(&result), vec![1, 1]);
    assert_eq!(keys_sorted(&result), vec!["a", "b"]);
}

#[test]
fn tie_bucket_traversal_is_count_ordered() {
    let mut set = RankedMultiset::new(8);
    for key in ["a", "b", "b", "c", "c", "c"] {
        set.append(key);
    }
    assert_eq!(set.query_heaviest(3), vec![("c", 3), ("b", 2), ("a", 1)]);
}

#[test]
fn full_drain_leaves_nothing_behind() {
    let mut set = RankedMultiset::new(3);
    set.append("a");
    set.append("b");
    set.append("a");
    set.expire(&"a");
    set.expire(&"b");
    set.expire(&"a");

    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
    assert_eq!(set.item_count(), 0);
    assert!(set.query_heaviest(1).is_empty());
    set.debug_validate_invariants();
}

// ==============================================
// Boundary cases
// ==============================================

#[test]
fn empty_structure_answers_every_k_with_nothing() {
    let set: RankedMultiset<&str> = RankedMultiset::new(4);
    for k in [1, 2, 100] {
        assert!(set.query_heaviest(k).is_empty());
    }
}

#[test]
fn k_beyond_live_keys_returns_all_live_keys() {
    let mut set = RankedMultiset::new(8);
    set.append("a");
    set.append("b");
    set.append("b");
    let result = set.query_heaviest(50);
    assert_eq!(result.len(), 2);
    assert_eq!(result[0], ("b", 2));
    assert_eq!(result[1], ("a", 1));
}

#[test]
fn capacity_one_window_cycles_cleanly() {
    let mut set = RankedMultiset::new(1);
    for key in ["a", "b", "a", "c"] {
        set.append(key);
        assert_eq!(set.query_heaviest(3), vec![(key, 1)]);
        set.expire(&key);
        assert!(set.is_empty());
    }
}

#[test]
fn single_key_saturates_and_drains() {
    let capacity = 6;
    let mut set = RankedMultiset::new(capacity);
    for expected in 1..=capacity {
        set.append("only");
        assert_eq!(set.query_heaviest(1), vec![("only", expected)]);
        set.debug_validate_invariants();
    }
    for expected in (1..capacity).rev() {
        set.expire(&"only");
        assert_eq!(set.query_heaviest(1), vec![("only", expected)]);
        set.debug_validate_invariants();
    }
    set.expire(&"only");
    assert!(set.query_heaviest(1).is_empty());
}

// ==============================================
// Algebraic laws
// ==============================================

// A state with several runs and a key at each interesting position.
fn populated() -> RankedMultiset<&'static str> {
    let mut set = RankedMultiset::new(16);
    for key in ["a", "b", "b", "c", "c", "c", "d", "e", "e"] {
        set.append(key);
    }
    set
}

#[test]
fn unmatched_pair_restores_exact_state() {
    // In the populated state the runs are [d, a] at count 1, [e, b] at
    // count 2, and [c] at count 3. A probed key alone in its run, at its
    // run's low end, or absent comes back to the identical position; a key
    // at the high end re-enters at the low end, so only the logical state
    // is pinned for it (see the commuting test below).
    for probe in ["fresh", "c", "d", "e"] {
        let mut set = populated();
        let before = set.debug_snapshot();

        set.append(probe);
        set.expire(&probe);

        assert_eq!(set.debug_snapshot(), before, "probe {probe} left residue");
        assert_eq!(set.item_count(), 9);
        set.debug_validate_invariants();
    }
}

#[test]
fn unmatched_pair_restores_counts_for_every_key() {
    for probe in ["a", "b", "c", "d", "e", "fresh"] {
        let mut set = populated();
        let reference = populated();

        set.append(probe);
        set.expire(&probe);

        for key in ["a", "b", "c", "d", "e", "fresh"] {
            assert_eq!(set.count(&key), reference.count(&key));
        }
        assert_eq!(set.item_count(), reference.item_count());
        set.debug_validate_invariants();
    }
}

#[test]
fn independent_key_updates_commute() {
    type Op = (&'static str, bool); // (key, is_append)
    let cases: &[(Op, Op)] = &[
        (("a", true), ("c", true)),
        (("a", true), ("c", false)),
        (("b", false), ("e", true)),
        (("b", false), ("c", false)),
    ];

    for &((key1, append1), (key2, append2)) in cases {
        let apply = |set: &mut RankedMultiset<&'static str>, key, is_append: bool| {
            if is_append {
                set.append(key);
            } else {
                set.expire(&key);
            }
        };

        let mut forward = populated();
        apply(&mut forward, key1, append1);
        apply(&mut forward, key2, append2);

        let mut reversed = populated();
        apply(&mut reversed, key2, append2);
        apply(&mut reversed, key1, append1);

        forward.debug_validate_invariants();
        reversed.debug_validate_invariants();
        for key in ["a", "b", "c", "d", "e"] {
            assert_eq!(
                forward.count(&key),
                reversed.count(&key),
                "{key1}/{key2} order changed {key}'s count"
            );
        }
        assert_eq!(forward.item_count(), reversed.item_count());
    }
}

//! Exact frequency-ranked multiset for sliding-window heaviest hitters.
//!
//! [`RankedMultiset`] tracks the multiplicity of every key currently inside
//! a bounded FIFO window and answers top-k queries in O(k), with O(1)
//! amortized cost per update. Three indexes are kept mutually consistent:
//!
//! ```text
//!   index (FxHashMap<K, NodeId>)     list (CountList<Entry<K>>, sorted by count)
//!   ┌──────┬────────┐
//!   │ key  │ handle │               head ─► (b,1) ◄─► (a,1) ◄─► (c,3) ◄── tail
//!   └──────┴────────┘                         ▲         ▲         ▲
//!                                             │         │         │
//!   buckets (RankBuckets, W+1 slots)          │         │         │
//!     count 1: { first ───────────────────────┘, last ──┘ }       │
//!     count 2: empty                                              │
//!     count 3: { first = last ────────────────────────────────────┘ }
//! ```
//!
//! The list is sorted non-decreasing by count, so the tail always holds the
//! heaviest hitters and a query is a bounded walk from the tail. Each
//! bucket delimits the contiguous run of nodes sharing one count; append
//! and expire splice the affected node to the boundary of the adjacent run
//! instead of scanning for its new position.
//!
//! Updates are positional: an append detaches the key's node and reinserts
//! it just past its old run, which lands it at the front (low-position end)
//! of the next-higher run. An expire reinserts just before the old run. New
//! nodes of a run therefore always enter at its low end, the convention the
//! bucket update rules in [`RankBuckets`] rely on.
//!
//! ## Complexity
//!
//! | Operation         | Time | Notes                                |
//! |-------------------|------|--------------------------------------|
//! | `append`          | O(1) | hash lookup + list splice            |
//! | `expire`          | O(1) | hash lookup + list splice            |
//! | `query_heaviest`  | O(k) | tail walk, allocates only the result |
//!
//! The structure is single-threaded and non-reentrant; distinct instances
//! are independent. Callers drive window membership: every `expire` must
//! match an earlier `append` still in effect, and the summed multiplicity
//! never exceeds the construction-time capacity.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::arena::NodeId;
use crate::ds::count_list::CountList;
use crate::ds::rank_buckets::RankBuckets;

#[derive(Debug)]
struct Entry<K> {
    key: K,
    count: usize,
}

/// Order-by-count multiset over an externally driven sliding window.
#[derive(Debug)]
pub struct RankedMultiset<K> {
    capacity: usize,
    list: CountList<Entry<K>>,
    index: FxHashMap<K, NodeId>,
    buckets: RankBuckets,
    items: usize,
}

impl<K> RankedMultiset<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a multiset for a window of at most `capacity` items.
    ///
    /// `capacity` bounds the summed multiplicity, and therefore any single
    /// count, so the rank vector is sized once here and never grows.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be at least 1");
        Self {
            capacity,
            list: CountList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: RankBuckets::new(capacity),
            items: 0,
        }
    }

    /// Returns the window capacity the multiset was built for.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of distinct keys currently tracked.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no key is currently tracked.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the summed multiplicity across all keys, i.e. the number of
    /// window items currently accounted for.
    pub fn item_count(&self) -> usize {
        self.items
    }

    /// Returns the current multiplicity of `key`, if tracked.
    pub fn count(&self, key: &K) -> Option<usize> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| entry.count)
    }

    /// Records one more occurrence of `key` in the window.
    ///
    /// The caller guarantees the window is not full; exceeding the capacity
    /// is a driver bug and is only caught by debug assertions.
    pub fn append(&mut self, key: K) {
        debug_assert!(self.items < self.capacity, "append past window capacity");
        match self.index.get(&key).copied() {
            Some(id) => {
                let count = self.list.get(id).expect("indexed node missing").count;
                let run_end = self
                    .buckets
                    .get(count)
                    .last()
                    .expect("occupied count has empty bucket");
                // First position past the old run; every node there has a
                // higher count, so the promoted node re-enters right before
                // it, at the low end of the count+1 run.
                let anchor = self.list.next(run_end);

                self.detach(id, count);
                let entry = Entry {
                    key: self.list.remove(id).expect("indexed node missing").key,
                    count: count + 1,
                };
                let new_id = match anchor {
                    Some(at) => self.list.insert_before(at, entry).expect("anchor missing"),
                    None => self.list.push_back(entry),
                };
                self.buckets.note_inserted(count + 1, new_id);
                *self.index.get_mut(&key).expect("index entry missing") = new_id;
            }
            None => {
                // Lowest legal position for count 1.
                let id = self.list.push_front(Entry {
                    key: key.clone(),
                    count: 1,
                });
                self.buckets.note_inserted(1, id);
                self.index.insert(key, id);
            }
        }
        self.items += 1;
    }

    /// Records one fewer occurrence of `key` in the window.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not currently tracked; expiring an item that was
    /// never appended is a driver bug.
    pub fn expire(&mut self, key: &K) {
        let id = *self.index.get(key).expect("expire on untracked key");
        let count = self.list.get(id).expect("indexed node missing").count;
        let run_start = self
            .buckets
            .get(count)
            .first()
            .expect("occupied count has empty bucket");

        // Where the demoted node re-enters: at the list head, or relative
        // to the node just before the old run.
        let before_run = if Some(run_start) == self.list.head() {
            None
        } else {
            Some(self.list.prev(run_start).expect("run start has no predecessor"))
        };

        self.detach(id, count);
        let mut entry = self.list.remove(id).expect("indexed node missing");
        self.items -= 1;

        entry.count -= 1;
        if entry.count == 0 {
            self.index.remove(key);
            return;
        }

        let new_count = entry.count;
        let new_id = match before_run {
            None => self.list.push_front(entry),
            Some(prev_id) => {
                let prev_count = self.list.get(prev_id).expect("predecessor missing").count;
                if prev_count == new_count {
                    // The adjacent lower run already has the demoted count;
                    // enter it at the low end.
                    let at = self
                        .buckets
                        .get(new_count)
                        .first()
                        .expect("adjacent run has empty bucket");
                    self.list.insert_before(at, entry).expect("run start missing")
                } else {
                    // Strictly lower neighbor: the demoted node starts a
                    // new single-node run after it.
                    self.list.insert_after(prev_id, entry).expect("predecessor missing")
                }
            }
        };
        self.buckets.note_inserted(new_count, new_id);
        *self.index.get_mut(key).expect("index entry missing") = new_id;
    }

    /// Returns the up-to-`k` heaviest keys with their counts, in
    /// non-increasing count order.
    ///
    /// Keys sharing a count appear contiguously; their relative order
    /// within the group is unspecified. Queries never mutate state.
    pub fn query_heaviest(&self, k: usize) -> Vec<(K, usize)> {
        let mut result = Vec::with_capacity(k.min(self.index.len()));
        for entry in self.list.iter_rev().take(k) {
            result.push((entry.key.clone(), entry.count));
        }
        result
    }

    /// Forgets all keys and items.
    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
        self.buckets.clear();
        self.items = 0;
    }

    fn detach(&mut self, id: NodeId, count: usize) {
        let prev = self.list.prev(id);
        let next = self.list.next(id);
        self.buckets.note_removed(count, id, prev, next);
    }

    /// Head-to-tail `(key, count)` sequence, the full positional state of
    /// the list. Two multisets with equal snapshots are indistinguishable:
    /// the index and buckets are fully determined by the list.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_snapshot(&self) -> Vec<(K, usize)> {
        self.list
            .iter()
            .map(|entry| (entry.key.clone(), entry.count))
            .collect()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();

        // Walk head to tail collecting the contiguous runs.
        let mut runs: Vec<(usize, NodeId, NodeId)> = Vec::new();
        let mut total = 0usize;
        let mut current = self.list.head();
        while let Some(id) = current {
            let entry = self.list.get(id).expect("node missing");
            assert!(entry.count >= 1, "tracked key with count 0");
            assert!(entry.count <= self.capacity);
            total += entry.count;

            assert_eq!(
                self.index.get(&entry.key).copied(),
                Some(id),
                "index does not resolve to the key's node"
            );

            match runs.last_mut() {
                Some((count, _, last)) if *count == entry.count => *last = id,
                Some((count, _, _)) => {
                    assert!(*count < entry.count, "count list not sorted");
                    runs.push((entry.count, id, id));
                }
                None => runs.push((entry.count, id, id)),
            }
            current = self.list.next(id);
        }

        assert_eq!(total, self.items, "summed counts diverge from item count");
        assert_eq!(self.index.len(), self.list.len(), "index domain mismatch");

        for &(count, first, last) in &runs {
            let bucket = self.buckets.get(count);
            assert_eq!(bucket.first(), Some(first), "bucket first not at run start");
            assert_eq!(bucket.last(), Some(last), "bucket last not at run end");
        }
        let occupied: Vec<usize> = self.buckets.debug_occupied().map(|(count, _)| count).collect();
        assert_eq!(
            occupied,
            runs.iter().map(|&(count, _, _)| count).collect::<Vec<_>>(),
            "bucket occupied for absent count"
        );
    }
}

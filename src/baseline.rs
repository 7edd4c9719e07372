//! Direct-counting reference for validating the ranked multiset.
//!
//! A plain key-to-count map that sorts on every query. Nowhere near the
//! ranked structure's performance, but trivially correct, which is the
//! point: tests and the experiment validator compare the ranked answers
//! against this one.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Map-and-sort heaviest-hitters counter.
#[derive(Debug, Default)]
pub struct BaselineCounter<K> {
    counts: FxHashMap<K, usize>,
}

impl<K> BaselineCounter<K>
where
    K: Eq + Hash + Ord + Clone,
{
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self {
            counts: FxHashMap::default(),
        }
    }

    /// Returns the number of distinct keys with a positive count.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if no key is currently counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns the current multiplicity of `key`, if positive.
    pub fn count(&self, key: &K) -> Option<usize> {
        self.counts.get(key).copied()
    }

    /// Records one more occurrence of `key`.
    pub fn append(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// Records one fewer occurrence of `key`, dropping it at zero.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not currently counted.
    pub fn expire(&mut self, key: &K) {
        let count = self.counts.get_mut(key).expect("expire on untracked key");
        if *count > 1 {
            *count -= 1;
        } else {
            self.counts.remove(key);
        }
    }

    /// Returns the up-to-`k` heaviest keys by copying the map out and
    /// sorting it, descending by count with a descending-key tie-break.
    pub fn query_heaviest(&self, k: usize) -> Vec<(K, usize)> {
        let mut all: Vec<(K, usize)> = self
            .counts
            .iter()
            .map(|(key, &count)| (key.clone(), count))
            .collect();
        all.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
        all.truncate(k);
        all
    }

    /// Forgets all keys.
    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

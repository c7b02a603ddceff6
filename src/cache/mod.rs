//! Word Weight Cache
//!
//! Keeps per-word selection weights behind a time-bounded cache and a
//! [`WeightedSelectionTree`] in sync with the active word pool.
//!
//! - Weights are recomputed lazily once their entry is older than the TTL
//! - The tree is rebuilt (O(N log N)) only when the pool tracker reports a
//!   different pool or a word was invalidated; otherwise each draw is O(log N)
//! - If tree selection fails, a linear O(N) weighted scan takes over and
//!   always yields a word for a non-empty pool

mod tracker;
pub mod weight;

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::{PoolTracking, WeightConfig};
use crate::random::RandomSource;
use crate::stats::StatsProvider;
use crate::tree::WeightedSelectionTree;
use crate::types::{Word, WordKey};

pub use tracker::{tracker_for, EndpointPoolTracker, ExactPoolTracker, PoolIdentityTracker};
pub use weight::{base_weight, compute_word_weight, time_multiplier};

// ==================== Data Structures ====================

#[derive(Clone, Copy, Debug)]
struct CachedWeight {
    weight: f64,
    computed_at: DateTime<Utc>,
}

/// Diagnostic snapshot of the cache
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub cached_weights: usize,
    pub tree_built: bool,
    pub tree_size: usize,
    pub total_weight: f64,
    pub dirty: bool,
    /// Weight computations performed since creation
    pub computations: u64,
}

pub struct WordWeightCache {
    config: WeightConfig,
    entries: HashMap<WordKey, CachedWeight>,
    tree: WeightedSelectionTree,
    tracker: Box<dyn PoolIdentityTracker>,
    tree_built: bool,
    dirty: bool,
    computations: u64,
}

impl std::fmt::Debug for WordWeightCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordWeightCache")
            .field("entries", &self.entries.len())
            .field("tree_size", &self.tree.len())
            .field("tree_built", &self.tree_built)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Default for WordWeightCache {
    fn default() -> Self {
        Self::new(WeightConfig::default())
    }
}

impl WordWeightCache {
    pub fn new(config: WeightConfig) -> Self {
        Self::with_tracker(config, Box::new(EndpointPoolTracker::default()))
    }

    pub fn with_tracking(config: WeightConfig, tracking: PoolTracking) -> Self {
        Self::with_tracker(config, tracker_for(tracking))
    }

    pub fn with_tracker(config: WeightConfig, tracker: Box<dyn PoolIdentityTracker>) -> Self {
        Self {
            config,
            entries: HashMap::new(),
            tree: WeightedSelectionTree::default(),
            tracker,
            tree_built: false,
            dirty: false,
            computations: 0,
        }
    }

    fn is_fresh(&self, computed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match Duration::try_seconds(self.config.cache_ttl_secs) {
            Some(ttl) => now - computed_at < ttl,
            None => true,
        }
    }

    // ==================== Weights ====================

    /// Cached weight for `word`, recomputed once the entry reaches the TTL
    pub fn get_word_weight<S>(&mut self, word: &Word, stats: &S, now: DateTime<Utc>) -> f64
    where
        S: StatsProvider + ?Sized,
    {
        let key = word.key();
        if let Some(cached) = self.entries.get(&key) {
            if self.is_fresh(cached.computed_at, now) {
                trace!(word = %key, weight = cached.weight, "weight cache hit");
                return cached.weight;
            }
        }

        let weight = compute_word_weight(&stats.word_stats(word), now, &self.config);
        self.computations += 1;
        self.entries.insert(
            key,
            CachedWeight {
                weight,
                computed_at: now,
            },
        );
        weight
    }

    /// Drop the cached weight for `word` and force a tree rebuild
    pub fn invalidate_word(&mut self, word: &Word) {
        self.entries.remove(&word.key());
        self.dirty = true;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.tree.resize(0);
        self.tracker.reset();
        self.tree_built = false;
        self.dirty = false;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cached_weights: self.entries.len(),
            tree_built: self.tree_built,
            tree_size: self.tree.len(),
            total_weight: if self.tree_built {
                self.tree.total_weight()
            } else {
                0.0
            },
            dirty: self.dirty,
            computations: self.computations,
        }
    }

    // ==================== Tree maintenance ====================

    pub fn needs_rebuild(&self, words: &[Word]) -> bool {
        !self.tree_built || self.dirty || !self.tracker.matches(words)
    }

    pub fn build_selection_tree<S>(&mut self, words: &[Word], stats: &S, now: DateTime<Utc>)
    where
        S: StatsProvider + ?Sized,
    {
        debug!(pool_size = words.len(), "rebuilding word selection tree");

        // Same-size pools would otherwise keep stale words around
        self.tree.resize(words.len());
        self.tree.clear();
        for (i, word) in words.iter().enumerate() {
            let weight = self.get_word_weight(word, stats, now);
            self.tree.update_weight(i + 1, weight);
            self.tree.set_word(i + 1, word.clone());
        }

        self.tracker.record(words);
        self.tree_built = true;
        self.dirty = false;
    }

    /// Draw from the current tree; `None` if it was never built or is empty
    pub fn select_word_from_tree<R>(&self, rng: &mut R) -> Option<Word>
    where
        R: RandomSource + ?Sized,
    {
        if !self.tree_built || self.tree.is_empty() {
            return None;
        }

        let total = self.tree.total_weight();
        let index = if total > 0.0 && total.is_finite() {
            // (0, total]
            let target = (1.0 - rng.next_f64()) * total;
            self.tree.select_by_weight(target)?
        } else {
            rng.index(self.tree.len()) + 1
        };

        self.tree.get_word(index).cloned()
    }

    /// Weighted draw over `words`, rebuilding the tree when the pool changed
    pub fn select_word_by_weight<S, R>(
        &mut self,
        words: &[Word],
        stats: &S,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<Word>
    where
        S: StatsProvider + ?Sized,
        R: RandomSource + ?Sized,
    {
        if words.is_empty() {
            return None;
        }

        if self.needs_rebuild(words) {
            self.build_selection_tree(words, stats, now);
        }

        if let Some(word) = self.select_word_from_tree(rng) {
            return Some(word);
        }

        warn!(pool_size = words.len(), "tree selection failed, using linear scan");
        let selected = select_linear(words, |word| self.get_word_weight(word, stats, now), rng);
        selected.cloned()
    }
}

/// O(N) weighted draw
///
/// Negative or non-finite weights count as zero. An all-zero pool falls back
/// to a uniform pick, so any non-empty pool yields a word.
pub fn select_linear<'a, F, R>(words: &'a [Word], mut weight_of: F, rng: &mut R) -> Option<&'a Word>
where
    F: FnMut(&Word) -> f64,
    R: RandomSource + ?Sized,
{
    if words.is_empty() {
        return None;
    }

    let weights: Vec<f64> = words
        .iter()
        .map(|word| {
            let w = weight_of(word);
            if w.is_finite() && w > 0.0 {
                w
            } else {
                0.0
            }
        })
        .collect();
    let total: f64 = weights.iter().sum();

    if !(total > 0.0 && total.is_finite()) {
        return words.get(rng.index(words.len()));
    }

    let mut remaining = rng.uniform(total);
    for (word, weight) in words.iter().zip(&weights) {
        if *weight > 0.0 && remaining < *weight {
            return Some(word);
        }
        remaining -= weight;
    }

    // Floating-point overshoot: take the last word that can be drawn
    words
        .iter()
        .zip(&weights)
        .rev()
        .find(|(_, w)| **w > 0.0)
        .map(|(word, _)| word)
}

// ==================== Unit Tests ====================

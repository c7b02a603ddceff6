//! Weighted Selection Tree
//!
//! A Fenwick (binary indexed) tree over item weights, used to sample words
//! with probability proportional to their weight.
//!
//! Core operations:
//! - Point update: propagate a weight delta along `i += i & -i`, O(log N)
//! - Prefix sum: accumulate along `i -= i & -i`, O(log N)
//! - Weighted search: descend by powers of two to find the smallest index whose
//!   prefix sum reaches a target, O(log N)
//!
//! Indices are 1-based. Each index also carries the word stored there, with a
//! reverse key -> index map for lookups.

use std::collections::HashMap;

use crate::types::{Word, WordKey};

#[derive(Clone, Debug, Default)]
pub struct WeightedSelectionTree {
    /// Number of leaves
    size: usize,
    /// Fenwick array, `tree[0]` unused
    tree: Vec<f64>,
    /// Words by index, `words[0]` unused
    words: Vec<Option<Word>>,
    index_of: HashMap<WordKey, usize>,
}

impl WeightedSelectionTree {
    pub fn new(size: usize) -> Self {
        let mut tree = Self::default();
        tree.allocate(size);
        tree
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Reallocate for `size` items, dropping all weights and words
    ///
    /// Does nothing when the size is unchanged.
    pub fn resize(&mut self, size: usize) {
        if size == self.size && self.tree.len() == size + 1 {
            return;
        }
        self.allocate(size);
    }

    /// Zero every weight and forget every word, keeping the size
    pub fn clear(&mut self) {
        self.allocate(self.size);
    }

    fn allocate(&mut self, size: usize) {
        self.size = size;
        self.tree = vec![0.0; size + 1];
        self.words = vec![None; size + 1];
        self.index_of.clear();
    }

    fn check_index(&self, index: usize) {
        assert!(
            (1..=self.size).contains(&index),
            "tree index {} out of range 1..={}",
            index,
            self.size
        );
    }

    // ==================== Weights ====================

    /// Set the weight at `index` by propagating the delta from its current value
    pub fn update_weight(&mut self, index: usize, weight: f64) {
        self.check_index(index);
        let delta = weight - self.get_weight(index);
        if delta == 0.0 {
            return;
        }

        let mut i = index;
        while i <= self.size {
            self.tree[i] += delta;
            i += lowbit(i);
        }
    }

    /// Sum of weights over `1..=index`; `0` yields `0.0`
    pub fn get_prefix_sum(&self, index: usize) -> f64 {
        if index != 0 {
            self.check_index(index);
        }

        let mut sum = 0.0;
        let mut i = index;
        while i > 0 {
            sum += self.tree[i];
            i -= lowbit(i);
        }
        sum
    }

    pub fn get_weight(&self, index: usize) -> f64 {
        self.check_index(index);
        self.get_prefix_sum(index) - self.get_prefix_sum(index - 1)
    }

    pub fn total_weight(&self) -> f64 {
        self.get_prefix_sum(self.size)
    }

    /// Smallest index whose prefix sum is at least `target`
    ///
    /// Callers should pass `target` in `(0, total_weight]`. Smaller targets
    /// resolve to index 1 and larger ones to the last index. Returns `None`
    /// only for an empty tree.
    pub fn select_by_weight(&self, target: f64) -> Option<usize> {
        if self.size == 0 {
            return None;
        }

        let mut pos = 0;
        let mut remaining = target;
        let mut step = highest_power_of_two(self.size);
        while step > 0 {
            let next = pos + step;
            if next <= self.size && self.tree[next] < remaining {
                pos = next;
                remaining -= self.tree[next];
            }
            step >>= 1;
        }

        Some((pos + 1).min(self.size))
    }

    // ==================== Identity ====================

    pub fn set_word(&mut self, index: usize, word: Word) {
        self.check_index(index);
        if let Some(previous) = self.words[index].take() {
            self.index_of.remove(&previous.key());
        }
        self.index_of.insert(word.key(), index);
        self.words[index] = Some(word);
    }

    pub fn get_word(&self, index: usize) -> Option<&Word> {
        self.check_index(index);
        self.words[index].as_ref()
    }

    /// Index of `word`, or `None` if it was never stored here
    pub fn get_word_index(&self, word: &Word) -> Option<usize> {
        self.index_of.get(&word.key()).copied()
    }
}

#[inline]
fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn highest_power_of_two(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}

// ==================== Unit Tests ====================

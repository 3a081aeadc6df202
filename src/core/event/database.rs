// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event sequence database with a memoized support cache.

use super::sequence::HybridEventSequence;
use crate::core::pattern::HybridTemporalPattern;
use dashmap::DashMap;
use std::fmt;

/// The database handed to a mining run: an ordered list of sequences plus a
/// `pattern -> support` memo keyed by structural pattern equality.
///
/// Cache entries are written once by the mining engines as levels complete
/// and retained for the lifetime of the database value; there is no
/// eviction. The cache is concurrent so parallel engine variants can record
/// supports without external locking.
#[derive(Default)]
pub struct Database {
    sequences: Vec<HybridEventSequence>,
    support_cache: DashMap<HybridTemporalPattern, f64>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sequences(sequences: Vec<HybridEventSequence>) -> Self {
        Self {
            sequences,
            support_cache: DashMap::new(),
        }
    }

    pub fn add_sequence(&mut self, sequence: HybridEventSequence) {
        self.sequences.push(sequence);
    }

    #[inline]
    pub fn sequences(&self) -> &[HybridEventSequence] {
        &self.sequences
    }

    #[inline]
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// Support previously recorded for a structurally equal pattern
    pub fn cached_support(&self, pattern: &HybridTemporalPattern) -> Option<f64> {
        self.support_cache.get(pattern).map(|v| *v)
    }

    /// Record a computed support value; the first writer wins
    pub fn record_support(&self, pattern: HybridTemporalPattern, support: f64) {
        self.support_cache.entry(pattern).or_insert(support);
    }

    /// Number of memoized support entries
    pub fn cached_pattern_count(&self) -> usize {
        self.support_cache.len()
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("sequences", &self.sequences.len())
            .field("cached_patterns", &self.support_cache.len())
            .finish()
    }
}

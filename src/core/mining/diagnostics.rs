// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pruning counters for one mining run.
//!
//! Pruning outcomes are silent exclusions, not errors; the counters exist
//! so a run can report where candidates were dropped.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-run pruning and work counters, shared across workers
#[derive(Debug, Default)]
pub struct MiningDiagnostics {
    alignments: AtomicU64,
    pattern_pairs_rejected: AtomicU64,
    occurrence_pairs_rejected: AtomicU64,
    occurrences_rejected: AtomicU64,
    patterns_rejected: AtomicU64,
}

impl MiningDiagnostics {
    pub(crate) fn count_alignment(&self) {
        self.alignments.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_pattern_pair_rejected(&self) {
        self.pattern_pairs_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_occurrence_pair_rejected(&self) {
        self.occurrence_pairs_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_occurrence_rejected(&self) {
        self.occurrences_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_pattern_rejected(&self) {
        self.patterns_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn alignments(&self) -> u64 {
        self.alignments.load(Ordering::Relaxed)
    }

    pub fn pattern_pairs_rejected(&self) -> u64 {
        self.pattern_pairs_rejected.load(Ordering::Relaxed)
    }

    pub fn occurrence_pairs_rejected(&self) -> u64 {
        self.occurrence_pairs_rejected.load(Ordering::Relaxed)
    }

    pub fn occurrences_rejected(&self) -> u64 {
        self.occurrences_rejected.load(Ordering::Relaxed)
    }

    pub fn patterns_rejected(&self) -> u64 {
        self.patterns_rejected.load(Ordering::Relaxed)
    }

    pub(crate) fn log_summary(&self, engine: &str) {
        log::debug!(
            "[{engine}] alignments={} pattern_pairs_rejected={} occurrence_pairs_rejected={} \
             occurrences_rejected={} patterns_rejected={}",
            self.alignments(),
            self.pattern_pairs_rejected(),
            self.occurrence_pairs_rejected(),
            self.occurrences_rejected(),
            self.patterns_rejected(),
        );
    }
}

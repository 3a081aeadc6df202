// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frequency constraints: relative support and absolute occurrence count.

use super::MiningConstraint;
use crate::core::error::{HtpmError, HtpmResult};
use crate::core::pattern::{HybridTemporalPattern, Occurrence};
use std::collections::HashSet;
use std::sync::Arc;

/// Fraction of distinct sequences that contain at least one occurrence of a
/// pattern
pub fn relative_support(occurrences: &[Arc<Occurrence>], sequence_count: usize) -> f64 {
    if sequence_count == 0 {
        return 0.0;
    }
    let distinct: HashSet<&str> = occurrences.iter().map(|o| o.sequence_id()).collect();
    distinct.len() as f64 / sequence_count as f64
}

/// Minimum relative support: a pattern survives when the fraction of
/// distinct sequences contributing at least one occurrence is at least the
/// threshold. Anti-monotone, since an extension can only lose sequences.
#[derive(Debug, Clone)]
pub struct MinSupportConstraint {
    min_support: f64,
    sequence_count: usize,
}

impl MinSupportConstraint {
    /// `min_support` must lie in `(0, 1]`
    pub fn new(min_support: f64, sequence_count: usize) -> HtpmResult<Self> {
        if !(min_support > 0.0 && min_support <= 1.0) {
            return Err(HtpmError::validation_with_field(
                format!("min_support {min_support} outside (0, 1]"),
                "min_support",
            ));
        }
        Ok(Self {
            min_support,
            sequence_count,
        })
    }

    pub fn min_support(&self) -> f64 {
        self.min_support
    }
}

impl MiningConstraint for MinSupportConstraint {
    fn pattern_fulfills_constraints(
        &self,
        _pattern: &HybridTemporalPattern,
        occurrences: &[Arc<Occurrence>],
        _k: usize,
    ) -> bool {
        relative_support(occurrences, self.sequence_count) >= self.min_support
    }
}

/// Minimum absolute occurrence count, episode-mining style: no
/// normalization by sequence count. Anti-monotone.
#[derive(Debug, Clone)]
pub struct MinOccurrencesConstraint {
    min_occurrences: usize,
}

impl MinOccurrencesConstraint {
    pub fn new(min_occurrences: usize) -> HtpmResult<Self> {
        if min_occurrences == 0 {
            return Err(HtpmError::validation_with_field(
                "min_occurrences must be positive",
                "min_occurrences",
            ));
        }
        Ok(Self { min_occurrences })
    }
}

impl MiningConstraint for MinOccurrencesConstraint {
    fn pattern_fulfills_constraints(
        &self,
        _pattern: &HybridTemporalPattern,
        occurrences: &[Arc<Occurrence>],
        _k: usize,
    ) -> bool {
        occurrences.len() >= self.min_occurrences
    }
}

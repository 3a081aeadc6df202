// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pluggable admissibility and pruning predicates.
//!
//! A [`MiningConstraint`] is consulted by every engine variant at four
//! pruning decision points plus one output decision:
//!
//! 1. [`should_generate_patterns_of_length`]: global early stop before a
//!    level is attempted;
//! 2. [`patterns_qualify_for_join`]: structural pre-filter on a pattern
//!    pair before any occurrence-level work;
//! 3. [`occurrence_records_qualify_for_join`]: per occurrence pair before
//!    alignment;
//! 4. [`new_occurrence_fulfills_constraints`]: per aligned occurrence;
//! 5. [`pattern_fulfills_constraints`]: per accumulated pattern at
//!    partition completion.
//!
//! Every predicate above must be **anti-monotone**: once it rejects a
//! pattern or occurrence, it must reject every extension of it. Callers
//! trust a failing check to justify pruning the entire downstream subtree;
//! a non-anti-monotone implementation silently loses results.
//!
//! [`should_output`] is the exception: it is applied only at emission time,
//! and a rejected pattern still participates in further joins.
//!
//! [`should_generate_patterns_of_length`]: MiningConstraint::should_generate_patterns_of_length
//! [`patterns_qualify_for_join`]: MiningConstraint::patterns_qualify_for_join
//! [`occurrence_records_qualify_for_join`]: MiningConstraint::occurrence_records_qualify_for_join
//! [`new_occurrence_fulfills_constraints`]: MiningConstraint::new_occurrence_fulfills_constraints
//! [`pattern_fulfills_constraints`]: MiningConstraint::pattern_fulfills_constraints
//! [`should_output`]: MiningConstraint::should_output

pub mod cooccurrence;
pub mod duration;
pub mod gap;
pub mod regex_match;
pub mod size;
pub mod support;

pub use cooccurrence::CooccurrenceConstraint;
pub use duration::MaxDurationConstraint;
pub use gap::MaxGapConstraint;
pub use regex_match::RegexConstraint;
pub use size::PatternSizeConstraint;
pub use support::{MinOccurrencesConstraint, MinSupportConstraint};

use crate::core::pattern::{HybridTemporalPattern, Occurrence};
use std::sync::Arc;

/// One admissibility rule consulted during mining
pub trait MiningConstraint: Send + Sync {
    /// Whether patterns of length `k` should be generated at all
    fn should_generate_patterns_of_length(&self, _k: usize) -> bool {
        true
    }

    /// Structural pre-filter on a join candidate pair sharing `prefix`,
    /// before any occurrence-level work
    fn patterns_qualify_for_join(
        &self,
        _prefix: Option<&Arc<HybridTemporalPattern>>,
        _p1: &HybridTemporalPattern,
        _p2: &HybridTemporalPattern,
        _k: usize,
    ) -> bool {
        true
    }

    /// Per occurrence-record pair filter, applied before alignment
    fn occurrence_records_qualify_for_join(
        &self,
        _p1: &HybridTemporalPattern,
        _o1: &Occurrence,
        _p2: &HybridTemporalPattern,
        _o2: &Occurrence,
        _k: usize,
    ) -> bool {
        true
    }

    /// Post-alignment filter on a freshly produced occurrence
    fn new_occurrence_fulfills_constraints(
        &self,
        _pattern: &HybridTemporalPattern,
        _occurrence: &Occurrence,
        _k: usize,
    ) -> bool {
        true
    }

    /// Whole-pattern filter over all accumulated occurrences
    fn pattern_fulfills_constraints(
        &self,
        _pattern: &HybridTemporalPattern,
        _occurrences: &[Arc<Occurrence>],
        _k: usize,
    ) -> bool {
        true
    }

    /// Emission-time filter; **not** required to be anti-monotone. Patterns
    /// rejected here still participate in further joins.
    fn should_output(
        &self,
        _pattern: &HybridTemporalPattern,
        _occurrences: &[Arc<Occurrence>],
    ) -> bool {
        true
    }

    /// Notification that `pattern` of length `k` survived pattern-level
    /// filtering. Used by precomputing rules such as the co-occurrence
    /// pre-filter; most constraints ignore it.
    fn observe_frequent_pattern(&self, _k: usize, _pattern: &HybridTemporalPattern) {}
}

/// Ordered AND-composition of constraints.
///
/// Every decision point short-circuits on the first rejecting rule, in
/// insertion order; cheap structural rules should therefore be registered
/// before expensive ones.
#[derive(Default)]
pub struct ConstraintCollection {
    constraints: Vec<Box<dyn MiningConstraint>>,
}

impl ConstraintCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, constraint: Box<dyn MiningConstraint>) {
        self.constraints.push(constraint);
    }

    /// Builder-style registration
    pub fn with(mut self, constraint: Box<dyn MiningConstraint>) -> Self {
        self.push(constraint);
        self
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl MiningConstraint for ConstraintCollection {
    fn should_generate_patterns_of_length(&self, k: usize) -> bool {
        self.constraints
            .iter()
            .all(|c| c.should_generate_patterns_of_length(k))
    }

    fn patterns_qualify_for_join(
        &self,
        prefix: Option<&Arc<HybridTemporalPattern>>,
        p1: &HybridTemporalPattern,
        p2: &HybridTemporalPattern,
        k: usize,
    ) -> bool {
        self.constraints
            .iter()
            .all(|c| c.patterns_qualify_for_join(prefix, p1, p2, k))
    }

    fn occurrence_records_qualify_for_join(
        &self,
        p1: &HybridTemporalPattern,
        o1: &Occurrence,
        p2: &HybridTemporalPattern,
        o2: &Occurrence,
        k: usize,
    ) -> bool {
        self.constraints
            .iter()
            .all(|c| c.occurrence_records_qualify_for_join(p1, o1, p2, o2, k))
    }

    fn new_occurrence_fulfills_constraints(
        &self,
        pattern: &HybridTemporalPattern,
        occurrence: &Occurrence,
        k: usize,
    ) -> bool {
        self.constraints
            .iter()
            .all(|c| c.new_occurrence_fulfills_constraints(pattern, occurrence, k))
    }

    fn pattern_fulfills_constraints(
        &self,
        pattern: &HybridTemporalPattern,
        occurrences: &[Arc<Occurrence>],
        k: usize,
    ) -> bool {
        self.constraints
            .iter()
            .all(|c| c.pattern_fulfills_constraints(pattern, occurrences, k))
    }

    fn should_output(
        &self,
        pattern: &HybridTemporalPattern,
        occurrences: &[Arc<Occurrence>],
    ) -> bool {
        self.constraints
            .iter()
            .all(|c| c.should_output(pattern, occurrences))
    }

    fn observe_frequent_pattern(&self, k: usize, pattern: &HybridTemporalPattern) {
        for constraint in &self.constraints {
            constraint.observe_frequent_pattern(k, pattern);
        }
    }
}

impl std::fmt::Debug for ConstraintCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintCollection")
            .field("len", &self.constraints.len())
            .finish()
    }
}

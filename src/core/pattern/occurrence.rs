// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concrete occurrences of a pattern within one sequence.
//!
//! An occurrence binds every node of its pattern to a real event of a
//! single sequence, in node order. The time of slot *i* is derived from the
//! node variant: point time, interval start, or interval end of the bound
//! event. Occurrences are immutable.
//!
//! Each occurrence optionally links to the occurrence of its canonical
//! prefix pattern that produced it. This is the provenance edge the
//! low-storage engine uses: two occurrences are joinable there only when
//! their prefix links are the *same* occurrence, tested in O(1) by
//! reference identity rather than by structural comparison.

use super::pattern::HybridTemporalPattern;
use crate::core::event::Event;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A pattern occurrence: one bound event per pattern node
#[derive(Debug, Clone)]
pub struct Occurrence {
    sequence_id: Arc<str>,
    events: Vec<Arc<Event>>,
    prefix: Option<Arc<Occurrence>>,
}

impl Occurrence {
    pub(crate) fn new(
        sequence_id: Arc<str>,
        events: Vec<Arc<Event>>,
        prefix: Option<Arc<Occurrence>>,
    ) -> Self {
        Self {
            sequence_id,
            events,
            prefix,
        }
    }

    #[inline]
    pub fn sequence_id(&self) -> &str {
        &self.sequence_id
    }

    #[inline]
    pub fn sequence_id_arc(&self) -> &Arc<str> {
        &self.sequence_id
    }

    #[inline]
    pub fn events(&self) -> &[Arc<Event>] {
        &self.events
    }

    #[inline]
    pub fn event(&self, slot: usize) -> &Arc<Event> {
        &self.events[slot]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The occurrence of the canonical prefix pattern this occurrence was
    /// aligned from, if retained
    #[inline]
    pub fn prefix(&self) -> Option<&Arc<Occurrence>> {
        self.prefix.as_ref()
    }

    /// Whether `self` and `other` were aligned from the same prefix
    /// occurrence, by reference identity. Two occurrences without a link
    /// both extend the empty occurrence and therefore share it.
    pub fn shares_prefix_occurrence(&self, other: &Occurrence) -> bool {
        match (&self.prefix, &other.prefix) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Derived time of slot `i` under `pattern`
    pub fn time_at(&self, pattern: &HybridTemporalPattern, slot: usize) -> f64 {
        pattern.nodes()[slot].time_in(&self.events[slot])
    }

    /// All slot times in node order (non-decreasing by construction)
    pub fn times(&self, pattern: &HybridTemporalPattern) -> Vec<f64> {
        pattern
            .nodes()
            .iter()
            .zip(&self.events)
            .map(|(node, event)| node.time_in(event))
            .collect()
    }

    /// Earliest derived time of the occurrence
    pub fn first_time(&self, pattern: &HybridTemporalPattern) -> f64 {
        self.time_at(pattern, 0)
    }

    /// Latest derived time of the occurrence
    pub fn last_time(&self, pattern: &HybridTemporalPattern) -> f64 {
        self.time_at(pattern, self.events.len() - 1)
    }

    /// Total span covered by the occurrence
    pub fn span(&self, pattern: &HybridTemporalPattern) -> f64 {
        self.last_time(pattern) - self.first_time(pattern)
    }
}

// Equality is the sequence id plus the bound events, compared slot by slot
// by identity: occurrences reference the database's event instances, never
// copies.
impl PartialEq for Occurrence {
    fn eq(&self, other: &Self) -> bool {
        self.sequence_id == other.sequence_id
            && self.events.len() == other.events.len()
            && self
                .events
                .iter()
                .zip(&other.events)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }
}

impl Eq for Occurrence {}

impl Hash for Occurrence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sequence_id.hash(state);
        for event in &self.events {
            (Arc::as_ptr(event) as usize).hash(state);
        }
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[", self.sequence_id)?;
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{event}")?;
        }
        write!(f, "]")
    }
}

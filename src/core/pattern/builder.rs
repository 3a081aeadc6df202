// SPDX-License-Identifier: MIT OR Apache-2.0

//! Incremental construction of a pattern together with one occurrence.
//!
//! The builder accepts `(node, event)` slots in non-decreasing derived-time
//! order and produces the immutable pattern/occurrence pair in one shot at
//! the end. Appending a slot whose time precedes the current tail is a
//! violation of the builder contract and panics; closing an interval that
//! was never opened is a [`StructuralInconsistency`] error.
//!
//! Interval starts allocate fresh occurrence marks per symbol in append
//! order, so the marks of a finished pattern are canonical for its node
//! sequence. An interval end appended at an equal-time boundary slides
//! backwards past immediately preceding equal-time end nodes that compare
//! greater under the node total order: mark remapping during alignment can
//! change the relative mark order of simultaneous ends, and the canonical
//! node ordering must hold regardless of append order.
//!
//! [`StructuralInconsistency`]: crate::core::error::HtpmError::StructuralInconsistency

use super::occurrence::Occurrence;
use super::pattern::HybridTemporalPattern;
use crate::core::error::{HtpmError, HtpmResult};
use crate::core::event::{Event, EventNode, OrderRelation};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Builder for one `(pattern, occurrence)` pair
#[derive(Debug)]
pub struct PatternBuilder {
    sequence_id: Arc<str>,
    nodes: Vec<EventNode>,
    relations: Vec<OrderRelation>,
    events: Vec<Arc<Event>>,
    times: Vec<f64>,
    next_mark: HashMap<u32, u32>,
    open: HashSet<(u32, u32)>,
}

impl PatternBuilder {
    pub fn new(sequence_id: Arc<str>) -> Self {
        Self {
            sequence_id,
            nodes: Vec::new(),
            relations: Vec::new(),
            events: Vec::new(),
            times: Vec::new(),
            next_mark: HashMap::new(),
            open: HashSet::new(),
        }
    }

    /// Number of slots appended so far
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a point node bound to `event`
    pub fn append_point(&mut self, event: &Arc<Event>) {
        let node = EventNode::point(event.symbol().clone());
        let time = event.start();
        self.push_tail(node, Arc::clone(event), time);
    }

    /// Append an interval start bound to `event`, allocating and returning
    /// a fresh occurrence mark for the event's symbol
    pub fn append_start(&mut self, event: &Arc<Event>) -> u32 {
        let key = event.symbol().key();
        let mark_slot = self.next_mark.entry(key).or_insert(0);
        let mark = *mark_slot;
        *mark_slot += 1;
        self.open.insert((key, mark));
        let node = EventNode::interval_start(event.symbol().clone(), mark);
        let time = event.start();
        self.push_tail(node, Arc::clone(event), time);
        mark
    }

    /// Append the interval end closing the start previously opened with
    /// `mark` for this event's symbol
    pub fn append_end(&mut self, event: &Arc<Event>, mark: u32) -> HtpmResult<()> {
        let key = event.symbol().key();
        if !self.open.remove(&(key, mark)) {
            return Err(HtpmError::structural(format!(
                "interval end {}-{mark} has no matching open start",
                event.symbol()
            )));
        }
        let time = event.end().ok_or_else(|| {
            HtpmError::structural(format!(
                "interval end node bound to point event {}",
                event.symbol()
            ))
        })?;
        if let Some(&last) = self.times.last() {
            assert!(
                time >= last,
                "time regression in pattern construction: {time} < {last}"
            );
        }
        let node = EventNode::interval_end(event.symbol().clone(), mark);

        // Slide back past equal-time end nodes that would sort after this
        // one, keeping the equal-time run in canonical node order.
        let mut idx = self.nodes.len();
        while idx > 0
            && self.times[idx - 1] == time
            && self.nodes[idx - 1].is_end()
            && self.nodes[idx - 1] > node
        {
            idx -= 1;
        }

        if idx == self.nodes.len() {
            self.push_tail(node, Arc::clone(event), time);
        } else {
            // Insertion lands inside an equal-time run, so every affected
            // relation is Equal.
            self.nodes.insert(idx, node);
            self.events.insert(idx, Arc::clone(event));
            self.times.insert(idx, time);
            self.relations.insert(idx - 1, OrderRelation::Equal);
        }
        Ok(())
    }

    fn push_tail(&mut self, node: EventNode, event: Arc<Event>, time: f64) {
        if let Some(&last) = self.times.last() {
            self.relations.push(OrderRelation::from_times(last, time));
        }
        self.nodes.push(node);
        self.events.push(event);
        self.times.push(time);
    }

    /// Finalize into the immutable pattern and occurrence, recording the
    /// canonical-prefix pattern and the prefix occurrence this pair was
    /// derived from
    pub fn finish(
        self,
        prefix_pattern: Option<&Arc<HybridTemporalPattern>>,
        prefix_occurrence: Option<Arc<Occurrence>>,
    ) -> HtpmResult<(Arc<HybridTemporalPattern>, Arc<Occurrence>)> {
        if let Some((key, mark)) = self.open.iter().next() {
            return Err(HtpmError::structural(format!(
                "pattern finished with open interval (id {key}, mark {mark})"
            )));
        }
        let pattern = Arc::new(HybridTemporalPattern::with_prefix(
            self.nodes,
            self.relations,
            prefix_pattern,
        )?);
        let occurrence = Arc::new(Occurrence::new(
            self.sequence_id,
            self.events,
            prefix_occurrence,
        ));
        Ok((pattern, occurrence))
    }

    /// Build the length-1 pattern and occurrence for a single event: one
    /// point node, or a start/end pair for an interval. The canonical
    /// prefix is the empty pattern, represented as `None`.
    pub fn length_one(
        sequence_id: &Arc<str>,
        event: &Arc<Event>,
    ) -> HtpmResult<(Arc<HybridTemporalPattern>, Arc<Occurrence>)> {
        let mut builder = PatternBuilder::new(Arc::clone(sequence_id));
        if event.is_point() {
            builder.append_point(event);
        } else {
            let mark = builder.append_start(event);
            builder.append_end(event, mark)?;
        }
        builder.finish(None, None)
    }
}

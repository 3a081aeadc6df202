// SPDX-License-Identifier: MIT OR Apache-2.0

//! The hybrid temporal pattern value type.
//!
//! A pattern is an odd-length alternating sequence `node, relation, node,
//! ..., node` (n nodes, n-1 relations). Pattern length counts the elements
//! of the pattern (points and interval starts), not the raw node count.
//!
//! Equality and hashing are structural over the node and relation sequence
//! only: two patterns reached through different join paths but with the
//! same canonical sequence compare equal and hash identically, which is
//! what the join accumulation maps rely on for deduplication. The optional
//! canonical-prefix back-reference is mining lineage bookkeeping and takes
//! no part in equality.

use crate::core::error::{HtpmError, HtpmResult};
use crate::core::event::node::write_id;
use crate::core::event::{EventNode, OrderRelation, Symbol};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// Immutable temporal pattern over point and interval event nodes
#[derive(Debug, Clone)]
pub struct HybridTemporalPattern {
    nodes: Vec<EventNode>,
    relations: Vec<OrderRelation>,
    length: usize,
    hash: u64,
    prefix: Option<Weak<HybridTemporalPattern>>,
}

impl HybridTemporalPattern {
    /// Build and validate a pattern from its node and relation sequence.
    ///
    /// Validation: the sequence must be non-empty and alternating
    /// (`relations.len() == nodes.len() - 1`), and every `(id, mark)`
    /// interval must open exactly once before it closes.
    pub fn new(nodes: Vec<EventNode>, relations: Vec<OrderRelation>) -> HtpmResult<Self> {
        Self::with_prefix(nodes, relations, None)
    }

    /// As [`HybridTemporalPattern::new`], recording the canonical-prefix
    /// pattern this pattern was derived from.
    pub fn with_prefix(
        nodes: Vec<EventNode>,
        relations: Vec<OrderRelation>,
        prefix: Option<&Arc<HybridTemporalPattern>>,
    ) -> HtpmResult<Self> {
        if nodes.is_empty() {
            return Err(HtpmError::validation("pattern has no nodes"));
        }
        if relations.len() + 1 != nodes.len() {
            return Err(HtpmError::validation(format!(
                "pattern has {} nodes but {} relations",
                nodes.len(),
                relations.len()
            )));
        }
        let mut open: HashSet<(u32, u32)> = HashSet::new();
        for node in &nodes {
            let key = node.symbol().key();
            match node {
                EventNode::IntervalStart { mark, .. } => {
                    if !open.insert((key, *mark)) {
                        return Err(HtpmError::validation(format!(
                            "interval {}+{} opened twice",
                            node.symbol(),
                            mark
                        )));
                    }
                }
                EventNode::IntervalEnd { mark, .. } => {
                    if !open.remove(&(key, *mark)) {
                        return Err(HtpmError::validation(format!(
                            "interval end {}-{} has no open start",
                            node.symbol(),
                            mark
                        )));
                    }
                }
                EventNode::Point { .. } => {}
            }
        }
        if let Some((key, mark)) = open.iter().next() {
            return Err(HtpmError::validation(format!(
                "interval (id {key}, mark {mark}) is never closed"
            )));
        }

        let length = nodes.iter().filter(|n| n.opens_element()).count();
        let hash = structural_hash(&nodes, &relations);
        Ok(Self {
            nodes,
            relations,
            length,
            hash,
            prefix: prefix.map(Arc::downgrade),
        })
    }

    #[inline]
    pub fn nodes(&self) -> &[EventNode] {
        &self.nodes
    }

    #[inline]
    pub fn relations(&self) -> &[OrderRelation] {
        &self.relations
    }

    /// Pattern length: the number of elements (points plus interval starts)
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The canonical-prefix pattern this pattern extends, if it is still
    /// alive. Held weakly: lineage lookup only, never structural data.
    pub fn canonical_prefix(&self) -> Option<Arc<HybridTemporalPattern>> {
        self.prefix.as_ref().and_then(Weak::upgrade)
    }

    /// Ordered element list: the symbol of each point or interval start,
    /// tagged with whether it is an interval element.
    pub fn elements(&self) -> Vec<(Symbol, bool)> {
        self.nodes
            .iter()
            .filter(|n| n.opens_element())
            .map(|n| (n.symbol().clone(), n.is_start()))
            .collect()
    }

    /// Canonical mini-language rendition, e.g. `b+0<a<b-0`
    pub fn pattern_string(&self) -> String {
        self.to_string()
    }
}

fn structural_hash(nodes: &[EventNode], relations: &[OrderRelation]) -> u64 {
    let mut hasher = DefaultHasher::new();
    nodes.hash(&mut hasher);
    relations.hash(&mut hasher);
    hasher.finish()
}

impl PartialEq for HybridTemporalPattern {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.nodes == other.nodes && self.relations == other.relations
    }
}

impl Eq for HybridTemporalPattern {}

impl Hash for HybridTemporalPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Display for HybridTemporalPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", self.relations[i - 1])?;
            }
            match node {
                EventNode::Point { symbol } => write_id(f, symbol.text())?,
                _ => write!(f, "{node}")?,
            }
        }
        Ok(())
    }
}

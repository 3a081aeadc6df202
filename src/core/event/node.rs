// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern-level event nodes.
//!
//! A node is the symbol a pattern is written in: a point, an interval
//! start, or an interval end. Interval nodes carry an occurrence mark that
//! disambiguates multiple concurrently open intervals of the same id inside
//! one pattern.
//!
//! Nodes are totally ordered by (1) interned integer id, (2) variant
//! precedence `End < Point < Start`, (3) occurrence mark. This order is the
//! single tie-break used everywhere two nodes compete at the same time
//! point, both during alignment and inside the canonical node sequence of a
//! pattern.

use super::event::{Event, RESERVED_ID_CHARS};
use super::interner::Symbol;
use std::cmp::Ordering;
use std::fmt;

/// A pattern node: point, interval start, or interval end
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventNode {
    Point { symbol: Symbol },
    IntervalStart { symbol: Symbol, mark: u32 },
    IntervalEnd { symbol: Symbol, mark: u32 },
}

impl EventNode {
    pub fn point(symbol: Symbol) -> Self {
        EventNode::Point { symbol }
    }

    pub fn interval_start(symbol: Symbol, mark: u32) -> Self {
        EventNode::IntervalStart { symbol, mark }
    }

    pub fn interval_end(symbol: Symbol, mark: u32) -> Self {
        EventNode::IntervalEnd { symbol, mark }
    }

    #[inline]
    pub fn symbol(&self) -> &Symbol {
        match self {
            EventNode::Point { symbol }
            | EventNode::IntervalStart { symbol, .. }
            | EventNode::IntervalEnd { symbol, .. } => symbol,
        }
    }

    /// Occurrence mark; `None` for points
    #[inline]
    pub fn mark(&self) -> Option<u32> {
        match self {
            EventNode::Point { .. } => None,
            EventNode::IntervalStart { mark, .. } | EventNode::IntervalEnd { mark, .. } => {
                Some(*mark)
            }
        }
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        matches!(self, EventNode::Point { .. })
    }

    #[inline]
    pub fn is_start(&self) -> bool {
        matches!(self, EventNode::IntervalStart { .. })
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self, EventNode::IntervalEnd { .. })
    }

    /// Whether this node opens or names a pattern element (points and
    /// interval starts count towards pattern length, interval ends do not)
    #[inline]
    pub fn opens_element(&self) -> bool {
        !self.is_end()
    }

    /// Same node with a different occurrence mark; identity for points
    pub fn with_mark(&self, mark: u32) -> EventNode {
        match self {
            EventNode::Point { symbol } => EventNode::Point {
                symbol: symbol.clone(),
            },
            EventNode::IntervalStart { symbol, .. } => EventNode::IntervalStart {
                symbol: symbol.clone(),
                mark,
            },
            EventNode::IntervalEnd { symbol, .. } => EventNode::IntervalEnd {
                symbol: symbol.clone(),
                mark,
            },
        }
    }

    /// Variant precedence used by the total order: `End < Point < Start`
    #[inline]
    pub fn variant_rank(&self) -> u8 {
        match self {
            EventNode::IntervalEnd { .. } => 0,
            EventNode::Point { .. } => 1,
            EventNode::IntervalStart { .. } => 2,
        }
    }

    /// Whether `self` and `other` denote the same id and variant, marks ignored
    pub fn same_shape(&self, other: &EventNode) -> bool {
        self.symbol() == other.symbol() && self.variant_rank() == other.variant_rank()
    }

    /// The concrete time this node takes when bound to `event`
    ///
    /// Points and starts take the event's start time; ends take the event's
    /// end time. Binding an end node to a point event is a structural
    /// impossibility maintained by the builder.
    #[inline]
    pub fn time_in(&self, event: &Event) -> f64 {
        match self {
            EventNode::IntervalEnd { .. } => event
                .end()
                .expect("interval end node bound to a point event"),
            _ => event.start(),
        }
    }
}

impl PartialOrd for EventNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.symbol()
            .cmp(other.symbol())
            .then_with(|| self.variant_rank().cmp(&other.variant_rank()))
            .then_with(|| self.mark().unwrap_or(0).cmp(&other.mark().unwrap_or(0)))
    }
}

/// Write an id, double-quoting it when it contains reserved characters
pub(crate) fn write_id(f: &mut fmt::Formatter<'_>, id: &str) -> fmt::Result {
    let needs_quoting = id
        .chars()
        .any(|c| RESERVED_ID_CHARS.contains(&c) || c.is_whitespace());
    if needs_quoting {
        write!(f, "\"{id}\"")
    } else {
        f.write_str(id)
    }
}

impl fmt::Display for EventNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventNode::Point { symbol } => write_id(f, symbol.text()),
            EventNode::IntervalStart { symbol, mark } => {
                write_id(f, symbol.text())?;
                write!(f, "+{mark}")
            }
            EventNode::IntervalEnd { symbol, mark } => {
                write_id(f, symbol.text())?;
                write!(f, "-{mark}")
            }
        }
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! A named, ordered collection of events.

use super::event::Event;
use std::sync::Arc;

/// One event sequence of the database. Append-only during construction;
/// events are shared via `Arc` so occurrences can reference them without
/// copying.
#[derive(Debug, Clone)]
pub struct HybridEventSequence {
    id: Arc<str>,
    events: Vec<Arc<Event>>,
}

impl HybridEventSequence {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn id_arc(&self) -> &Arc<str> {
        &self.id
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(Arc::new(event));
    }

    pub fn push_arc(&mut self, event: Arc<Event>) {
        self.events.push(event);
    }

    #[inline]
    pub fn events(&self) -> &[Arc<Event>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

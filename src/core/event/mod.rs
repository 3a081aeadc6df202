// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event model: events, nodes, relations, sequences, and the database.

pub mod database;
pub mod event;
pub mod interner;
pub mod node;
pub mod relation;
pub mod sequence;

pub use database::Database;
pub use event::{validate_event_id, Event, RESERVED_ID_CHARS};
pub use interner::{IdInterner, Symbol};
pub use node::EventNode;
pub use relation::OrderRelation;
pub use sequence::HybridEventSequence;

// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON mapping for event sequence databases.
//!
//! Bidirectional mapping between the in-memory [`Database`] shape and a
//! JSON document:
//!
//! ```json
//! {
//!   "sequences": [
//!     {
//!       "id": "1",
//!       "events": [
//!         { "id": "c", "time": 6.0 },
//!         { "id": "a", "start": 5.0, "end": 10.0 }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Point events carry `time`, interval events `start` and `end`.
//! Deserialization funnels through the validating [`Event`] constructors,
//! so illegal ids and inverted intervals are rejected with the same
//! validation errors as programmatic construction.

use crate::core::error::HtpmResult;
use crate::core::event::{Database, Event, HybridEventSequence};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

#[derive(Debug, Serialize, Deserialize)]
struct DatabaseDto {
    sequences: Vec<SequenceDto>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SequenceDto {
    id: String,
    events: Vec<EventDto>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum EventDto {
    Interval { id: String, start: f64, end: f64 },
    Point { id: String, time: f64 },
}

/// Read a database from a JSON document
pub fn read_database(reader: impl Read) -> HtpmResult<Database> {
    let dto: DatabaseDto = serde_json::from_reader(reader)?;
    database_from_dto(dto)
}

/// Read a database from a JSON string
pub fn database_from_str(json: &str) -> HtpmResult<Database> {
    let dto: DatabaseDto = serde_json::from_str(json)?;
    database_from_dto(dto)
}

/// Write a database as a pretty-printed JSON document
pub fn write_database(database: &Database, writer: impl Write) -> HtpmResult<()> {
    let dto = database_to_dto(database);
    serde_json::to_writer_pretty(writer, &dto)?;
    Ok(())
}

/// Render a database as a JSON string
pub fn database_to_string(database: &Database) -> HtpmResult<String> {
    Ok(serde_json::to_string_pretty(&database_to_dto(database))?)
}

fn database_from_dto(dto: DatabaseDto) -> HtpmResult<Database> {
    let mut sequences = Vec::with_capacity(dto.sequences.len());
    for sequence_dto in dto.sequences {
        let mut sequence = HybridEventSequence::new(sequence_dto.id);
        for event_dto in sequence_dto.events {
            let event = match event_dto {
                EventDto::Point { id, time } => Event::point(&id, time)?,
                EventDto::Interval { id, start, end } => Event::interval(&id, start, end)?,
            };
            sequence.push(event);
        }
        sequences.push(sequence);
    }
    Ok(Database::from_sequences(sequences))
}

fn database_to_dto(database: &Database) -> DatabaseDto {
    DatabaseDto {
        sequences: database
            .sequences()
            .iter()
            .map(|sequence| SequenceDto {
                id: sequence.id().to_string(),
                events: sequence
                    .events()
                    .iter()
                    .map(|event| match event.end() {
                        Some(end) => EventDto::Interval {
                            id: event.id().to_string(),
                            start: event.start(),
                            end,
                        },
                        None => EventDto::Point {
                            id: event.id().to_string(),
                            time: event.start(),
                        },
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "sequences": [
            {
                "id": "1",
                "events": [
                    { "id": "js_c", "time": 6.0 },
                    { "id": "js_a", "start": 5.0, "end": 10.0 }
                ]
            },
            { "id": "2", "events": [ { "id": "js_c", "time": 4.0 } ] }
        ]
    }"#;

    #[test]
    fn test_read_database() {
        let database = database_from_str(SAMPLE).unwrap();
        assert_eq!(database.sequence_count(), 2);
        let first = &database.sequences()[0];
        assert_eq!(first.id(), "1");
        assert_eq!(first.len(), 2);
        assert!(first.events()[0].is_point());
        assert!(first.events()[1].is_interval());
    }

    #[test]
    fn test_round_trip() {
        let database = database_from_str(SAMPLE).unwrap();
        let json = database_to_string(&database).unwrap();
        let back = database_from_str(&json).unwrap();
        assert_eq!(back.sequence_count(), 2);
        assert_eq!(back.sequences()[0].events()[1].duration(), 5.0);
    }

    #[test]
    fn test_invalid_events_rejected() {
        let inverted = r#"{"sequences":[{"id":"1","events":[{"id":"js_a","start":9.0,"end":3.0}]}]}"#;
        assert!(database_from_str(inverted).is_err());

        let bad_id = r#"{"sequences":[{"id":"1","events":[{"id":"a<b","time":1.0}]}]}"#;
        assert!(database_from_str(bad_id).is_err());
    }
}

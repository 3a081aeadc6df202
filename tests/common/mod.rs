// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use htpm_rust::core::event::{Database, Event, HybridEventSequence};
use htpm_rust::core::mining::PatternWithOccurrences;

/// A small three-sequence database mixing point and interval events.
///
/// sequence "1": c@6, c@8, a[5,10], b[6,12], a[8,12]
/// sequence "2": c@6, c@8, b[6,11], a[8,11]
/// sequence "3": c@4, a[4,10], b[4,12], a[9,12]
///
/// Construction order fixes the interner keys to c < a < b, which the
/// expected canonical strings below rely on for equal-time tie-breaks.
pub fn scenario_db() -> Database {
    let mut s1 = HybridEventSequence::new("1");
    s1.push(Event::point("c", 6.0).unwrap());
    s1.push(Event::point("c", 8.0).unwrap());
    s1.push(Event::interval("a", 5.0, 10.0).unwrap());
    s1.push(Event::interval("b", 6.0, 12.0).unwrap());
    s1.push(Event::interval("a", 8.0, 12.0).unwrap());

    let mut s2 = HybridEventSequence::new("2");
    s2.push(Event::point("c", 6.0).unwrap());
    s2.push(Event::point("c", 8.0).unwrap());
    s2.push(Event::interval("b", 6.0, 11.0).unwrap());
    s2.push(Event::interval("a", 8.0, 11.0).unwrap());

    let mut s3 = HybridEventSequence::new("3");
    s3.push(Event::point("c", 4.0).unwrap());
    s3.push(Event::interval("a", 4.0, 10.0).unwrap());
    s3.push(Event::interval("b", 4.0, 12.0).unwrap());
    s3.push(Event::interval("a", 9.0, 12.0).unwrap());

    Database::from_sequences(vec![s1, s2, s3])
}

/// Sorted canonical strings of a pattern list
pub fn pattern_strings(patterns: &[PatternWithOccurrences]) -> Vec<String> {
    let mut strings: Vec<String> = patterns
        .iter()
        .map(|p| p.pattern.pattern_string())
        .collect();
    strings.sort();
    strings
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

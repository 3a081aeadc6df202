// SPDX-License-Identifier: MIT OR Apache-2.0

//! Point and interval event instances.
//!
//! An [`Event`] is immutable after construction. Points carry a single
//! timestamp; intervals carry a start and a strictly greater end. Event ids
//! are validated at construction: the characters `<`, `+`, `=`, `-`, and
//! `"` are reserved by the pattern mini-language and whitespace would make
//! printed patterns ambiguous, so both are rejected. Ids containing
//! reserved characters can only enter the system through the quoted path of
//! the pattern parser, never through event construction.

use super::interner::{IdInterner, Symbol};
use crate::core::error::{HtpmError, HtpmResult};
use std::fmt;

/// Characters that cannot appear in a bare event id
pub const RESERVED_ID_CHARS: [char; 5] = ['<', '+', '=', '-', '"'];

/// Validate an event id against the reserved character set
pub fn validate_event_id(id: &str) -> HtpmResult<()> {
    if id.is_empty() {
        return Err(HtpmError::validation_with_field("event id is empty", "id"));
    }
    if let Some(c) = id
        .chars()
        .find(|c| RESERVED_ID_CHARS.contains(c) || c.is_whitespace())
    {
        return Err(HtpmError::validation_with_field(
            format!("event id {id:?} contains reserved character {c:?}"),
            "id",
        ));
    }
    Ok(())
}

/// A single point or interval event instance
#[derive(Debug, Clone)]
pub struct Event {
    symbol: Symbol,
    start: f64,
    end: Option<f64>,
}

impl Event {
    /// Create a point event occurring at `time`
    pub fn point(id: &str, time: f64) -> HtpmResult<Self> {
        validate_event_id(id)?;
        if !time.is_finite() {
            return Err(HtpmError::validation_with_field(
                format!("point event {id:?} has non-finite time {time}"),
                "time",
            ));
        }
        Ok(Self {
            symbol: IdInterner::global().intern(id),
            start: time,
            end: None,
        })
    }

    /// Create an interval event spanning `[start, end)` with `end > start`
    pub fn interval(id: &str, start: f64, end: f64) -> HtpmResult<Self> {
        validate_event_id(id)?;
        if !start.is_finite() || !end.is_finite() {
            return Err(HtpmError::validation_with_field(
                format!("interval event {id:?} has non-finite bounds [{start}, {end}]"),
                "start",
            ));
        }
        if end <= start {
            return Err(HtpmError::validation_with_field(
                format!("interval event {id:?} has end {end} <= start {start}"),
                "end",
            ));
        }
        Ok(Self {
            symbol: IdInterner::global().intern(id),
            start,
            end: Some(end),
        })
    }

    #[inline]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    #[inline]
    pub fn id(&self) -> &str {
        self.symbol.text()
    }

    /// Point time, or interval start
    #[inline]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Interval end; `None` for points
    #[inline]
    pub fn end(&self) -> Option<f64> {
        self.end
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        self.end.is_none()
    }

    #[inline]
    pub fn is_interval(&self) -> bool {
        self.end.is_some()
    }

    /// Interval length; zero for points
    pub fn duration(&self) -> f64 {
        self.end.map_or(0.0, |e| e - self.start)
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol && self.start == other.start && self.end == other.end
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}[{}, {}]", self.symbol, self.start, end),
            None => write!(f, "{}@{}", self.symbol, self.start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_and_interval_construction() {
        let p = Event::point("c", 6.0).unwrap();
        assert!(p.is_point());
        assert_eq!(p.start(), 6.0);
        assert_eq!(p.duration(), 0.0);

        let i = Event::interval("a", 5.0, 10.0).unwrap();
        assert!(i.is_interval());
        assert_eq!(i.duration(), 5.0);
    }

    #[test]
    fn test_inverted_interval_rejected() {
        assert!(Event::interval("a", 10.0, 10.0).is_err());
        assert!(Event::interval("a", 10.0, 5.0).is_err());
    }

    #[test]
    fn test_reserved_id_rejected() {
        for bad in ["a<b", "a+b", "x=y", "a-b", "a\"b", "a b", ""] {
            assert!(Event::point(bad, 1.0).is_err(), "id {bad:?} should be rejected");
        }
        assert!(Event::point("a_b.1", 1.0).is_ok());
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maximum total duration of an occurrence.

use super::MiningConstraint;
use crate::core::error::{HtpmError, HtpmResult};
use crate::core::pattern::{HybridTemporalPattern, Occurrence};

/// Upper bound on the total span (latest minus earliest derived time) of an
/// occurrence.
///
/// The bound is enforced twice: on every fresh occurrence after alignment,
/// and before alignment on the span the merged occurrence *would* cover, so
/// hopeless pairs never reach the aligner. Anti-monotone: extending an
/// occurrence can only widen its span.
#[derive(Debug, Clone)]
pub struct MaxDurationConstraint {
    max_duration: f64,
}

impl MaxDurationConstraint {
    pub fn new(max_duration: f64) -> HtpmResult<Self> {
        if !(max_duration > 0.0) {
            return Err(HtpmError::validation_with_field(
                format!("max_duration {max_duration} must be positive"),
                "max_duration",
            ));
        }
        Ok(Self { max_duration })
    }
}

impl MiningConstraint for MaxDurationConstraint {
    fn occurrence_records_qualify_for_join(
        &self,
        p1: &HybridTemporalPattern,
        o1: &Occurrence,
        p2: &HybridTemporalPattern,
        o2: &Occurrence,
        _k: usize,
    ) -> bool {
        let first = o1.first_time(p1).min(o2.first_time(p2));
        let last = o1.last_time(p1).max(o2.last_time(p2));
        last - first <= self.max_duration
    }

    fn new_occurrence_fulfills_constraints(
        &self,
        pattern: &HybridTemporalPattern,
        occurrence: &Occurrence,
        _k: usize,
    ) -> bool {
        occurrence.span(pattern) <= self.max_duration
    }
}

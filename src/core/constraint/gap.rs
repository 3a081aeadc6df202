// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maximum internal gap between consecutive time points.

use super::MiningConstraint;
use crate::core::error::{HtpmError, HtpmResult};
use crate::core::pattern::{HybridTemporalPattern, Occurrence};

/// Upper bound on the gap between consecutive time points of the settled
/// portion of an occurrence.
///
/// The transition into the final time point is the open frontier of the
/// occurrence: a later join may still place an element inside it, so it is
/// deliberately left unchecked. Each frontier gap becomes settled (and is
/// checked) one level later, once something has been appended behind it.
/// A span that passed at a previous level is therefore never re-rejected:
/// an inserted element can only split a settled gap into smaller ones.
#[derive(Debug, Clone)]
pub struct MaxGapConstraint {
    max_gap: f64,
}

impl MaxGapConstraint {
    pub fn new(max_gap: f64) -> HtpmResult<Self> {
        if !(max_gap > 0.0) {
            return Err(HtpmError::validation_with_field(
                format!("max_gap {max_gap} must be positive"),
                "max_gap",
            ));
        }
        Ok(Self { max_gap })
    }
}

impl MiningConstraint for MaxGapConstraint {
    fn new_occurrence_fulfills_constraints(
        &self,
        pattern: &HybridTemporalPattern,
        occurrence: &Occurrence,
        _k: usize,
    ) -> bool {
        let times = occurrence.times(pattern);
        if times.len() < 3 {
            return true;
        }
        // all consecutive gaps except the frontier transition
        times[..times.len() - 1]
            .windows(2)
            .all(|w| w[1] - w[0] <= self.max_gap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::Event;
    use crate::core::pattern::{or_align, PatternBuilder};
    use std::sync::Arc;

    #[test]
    fn test_frontier_gap_unchecked() {
        let seq: Arc<str> = Arc::from("s");
        let constraint = MaxGapConstraint::new(2.0).unwrap();

        // c@0 < c@1 < c@9: internal gap 1 passes, frontier gap 8 ignored
        let e0 = Arc::new(Event::point("gap_c", 0.0).unwrap());
        let e1 = Arc::new(Event::point("gap_c", 1.0).unwrap());
        let e9 = Arc::new(Event::point("gap_c", 9.0).unwrap());

        let (p0, o0) = PatternBuilder::length_one(&seq, &e0).unwrap();
        let (_, o1) = PatternBuilder::length_one(&seq, &e1).unwrap();
        let (_, o9) = PatternBuilder::length_one(&seq, &e9).unwrap();

        let near = or_align(None, &p0, &o0, &p0, &o1).unwrap().unwrap();
        let far = or_align(None, &p0, &o0, &p0, &o9).unwrap().unwrap();
        assert!(constraint.new_occurrence_fulfills_constraints(&near.pattern, &near.occurrence, 2));
        assert!(constraint.new_occurrence_fulfills_constraints(&far.pattern, &far.occurrence, 2));

        // c@0 < c@5 < c@9: the 0->5 gap is now settled and violates the bound
        let e5 = Arc::new(Event::point("gap_c", 5.0).unwrap());
        let (_, o5) = PatternBuilder::length_one(&seq, &e5).unwrap();
        let wide = or_align(None, &p0, &o0, &p0, &o5).unwrap().unwrap();
        let three = or_align(
            Some(&p0),
            &wide.pattern,
            &wide.occurrence,
            &far.pattern,
            &far.occurrence,
        )
        .unwrap()
        .unwrap();
        assert_eq!(three.occurrence.times(&three.pattern), vec![0.0, 5.0, 9.0]);
        assert!(
            !constraint.new_occurrence_fulfills_constraints(&three.pattern, &three.occurrence, 3)
        );
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Co-occurrence pre-filter over frequent 2-patterns.
//!
//! While level 2 is materialized, the rule records for every frequent
//! 2-pattern the unordered pair of elements it is built from (symbol plus
//! point/interval kind). At higher levels, a join candidate pair is
//! rejected without any occurrence-level work when the two divergent
//! elements it would combine were never part of any frequent 2-pattern: by
//! anti-monotonicity of support no child of that join can be frequent
//! either, whatever the temporal arrangement turns out to be.
//!
//! Best-effort pruning: whenever the divergent element of a side cannot be
//! determined unambiguously the rule accepts, degrading to a no-op rather
//! than risking a false rejection. The rule is only sound when every
//! 2-pattern has been materialized and observed before the first k>2 join,
//! which is the breadth-first level-2 phase all engine variants share.

use super::MiningConstraint;
use crate::core::pattern::HybridTemporalPattern;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

type ElementKey = (u32, bool);

/// Known-frequent element pair filter (CMAP-style)
#[derive(Debug, Default)]
pub struct CooccurrenceConstraint {
    frequent_pairs: RwLock<HashSet<(ElementKey, ElementKey)>>,
}

impl CooccurrenceConstraint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct element pairs recorded so far
    pub fn recorded_pairs(&self) -> usize {
        self.frequent_pairs
            .read()
            .expect("co-occurrence lock poisoned")
            .len()
    }

    /// The element a pattern adds over its canonical prefix, if it can be
    /// determined unambiguously
    fn divergent_element(
        pattern: &HybridTemporalPattern,
        prefix: Option<&Arc<HybridTemporalPattern>>,
    ) -> Option<ElementKey> {
        let prefix_elements = match prefix {
            Some(p) => p.elements(),
            None => Vec::new(),
        };
        let elements = pattern.elements();
        if elements.len() != prefix_elements.len() + 1 {
            return None;
        }
        // first position where the element sequences drift apart
        let mut divergent = None;
        let mut pi = 0;
        for (symbol, kind) in &elements {
            if pi < prefix_elements.len()
                && prefix_elements[pi].0 == *symbol
                && prefix_elements[pi].1 == *kind
            {
                pi += 1;
            } else if divergent.is_none() {
                divergent = Some((symbol.key(), *kind));
            } else {
                // more than one unmatched element: ambiguous
                return None;
            }
        }
        divergent
    }

    fn normalize(a: ElementKey, b: ElementKey) -> (ElementKey, ElementKey) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl MiningConstraint for CooccurrenceConstraint {
    fn patterns_qualify_for_join(
        &self,
        prefix: Option<&Arc<HybridTemporalPattern>>,
        p1: &HybridTemporalPattern,
        p2: &HybridTemporalPattern,
        k: usize,
    ) -> bool {
        if k <= 2 {
            return true;
        }
        let (e1, e2) = match (
            Self::divergent_element(p1, prefix),
            Self::divergent_element(p2, prefix),
        ) {
            (Some(e1), Some(e2)) => (e1, e2),
            // ambiguous extraction: accept rather than risk a false negative
            _ => return true,
        };
        self.frequent_pairs
            .read()
            .expect("co-occurrence lock poisoned")
            .contains(&Self::normalize(e1, e2))
    }

    fn observe_frequent_pattern(&self, k: usize, pattern: &HybridTemporalPattern) {
        if k != 2 {
            return;
        }
        let elements = pattern.elements();
        if elements.len() != 2 {
            return;
        }
        let a = (elements[0].0.key(), elements[0].1);
        let b = (elements[1].0.key(), elements[1].1);
        self.frequent_pairs
            .write()
            .expect("co-occurrence lock poisoned")
            .insert(Self::normalize(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pattern::parse_pattern;

    #[test]
    fn test_rejects_unseen_pairs_after_level_two() {
        let constraint = CooccurrenceConstraint::new();
        let two_ab = Arc::new(parse_pattern("cm_a+0<cm_b<cm_a-0").unwrap());
        constraint.observe_frequent_pattern(2, &two_ab);
        assert_eq!(constraint.recorded_pairs(), 1);

        let prefix = Arc::new(parse_pattern("cm_a+0<cm_a-0").unwrap());
        let p_b = Arc::new(parse_pattern("cm_a+0<cm_a-0<cm_b").unwrap());
        let p_c = Arc::new(parse_pattern("cm_a+0<cm_a-0<cm_c").unwrap());

        // (b, c) was never a frequent 2-pattern; (b, b) neither
        assert!(!constraint.patterns_qualify_for_join(Some(&prefix), &p_b, &p_c, 3));
        assert!(!constraint.patterns_qualify_for_join(Some(&prefix), &p_b, &p_b, 3));

        // seeing b with b makes the self pair acceptable
        let two_bb = Arc::new(parse_pattern("cm_b<cm_b").unwrap());
        constraint.observe_frequent_pattern(2, &two_bb);
        assert!(constraint.patterns_qualify_for_join(Some(&prefix), &p_b, &p_b, 3));

        // level-2 joins are never filtered
        assert!(constraint.patterns_qualify_for_join(None, &p_b, &p_c, 2));
    }
}

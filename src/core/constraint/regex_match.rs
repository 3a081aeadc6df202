// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regex filter over the canonical pattern string.

use super::MiningConstraint;
use crate::core::error::{HtpmError, HtpmResult};
use crate::core::pattern::{HybridTemporalPattern, Occurrence};
use regex::Regex;
use std::sync::Arc;

/// Emits only patterns whose canonical string matches a regex.
///
/// Output-time only: string matching is not anti-monotone (a rejected
/// pattern's extension may well match), so the rule never prunes the
/// search itself.
#[derive(Debug, Clone)]
pub struct RegexConstraint {
    regex: Regex,
}

impl RegexConstraint {
    pub fn new(pattern: &str) -> HtpmResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            HtpmError::validation_with_field(format!("invalid regex: {e}"), "regex")
        })?;
        Ok(Self { regex })
    }
}

impl MiningConstraint for RegexConstraint {
    fn should_output(
        &self,
        pattern: &HybridTemporalPattern,
        _occurrences: &[Arc<Occurrence>],
    ) -> bool {
        self.regex.is_match(&pattern.pattern_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pattern::parse_pattern;

    #[test]
    fn test_output_filter() {
        let with_b = parse_pattern("rx_b+0<rx_a<rx_b-0").unwrap();
        let without_b = parse_pattern("rx_a<rx_a").unwrap();
        let constraint = RegexConstraint::new(r"rx_b\+0").unwrap();

        assert!(constraint.should_output(&with_b, &[]));
        assert!(!constraint.should_output(&without_b, &[]));
        // search-time decisions are untouched
        assert!(constraint.pattern_fulfills_constraints(&without_b, &[], 2));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        assert!(RegexConstraint::new("(").is_err());
    }
}

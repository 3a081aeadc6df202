// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern length bounds.

use super::MiningConstraint;
use crate::core::error::{HtpmError, HtpmResult};
use crate::core::pattern::{HybridTemporalPattern, Occurrence};
use std::sync::Arc;

/// Caps generated pattern length and optionally hides short patterns from
/// the output.
///
/// The generation cap is the anti-monotone half and stops whole levels
/// early; the minimum output length is applied only at emission time, so
/// short patterns still act as join material for longer ones.
#[derive(Debug, Clone)]
pub struct PatternSizeConstraint {
    max_length: Option<usize>,
    min_output_length: usize,
}

impl PatternSizeConstraint {
    pub fn new(max_length: Option<usize>, min_output_length: usize) -> HtpmResult<Self> {
        if let Some(max) = max_length {
            if max == 0 {
                return Err(HtpmError::validation_with_field(
                    "max_length must be positive",
                    "max_length",
                ));
            }
            if min_output_length > max {
                return Err(HtpmError::validation_with_field(
                    format!("min_output_length {min_output_length} exceeds max_length {max}"),
                    "min_output_length",
                ));
            }
        }
        Ok(Self {
            max_length,
            min_output_length,
        })
    }

    /// Generation cap only
    pub fn max_length(max_length: usize) -> HtpmResult<Self> {
        Self::new(Some(max_length), 0)
    }
}

impl MiningConstraint for PatternSizeConstraint {
    fn should_generate_patterns_of_length(&self, k: usize) -> bool {
        self.max_length.map_or(true, |max| k <= max)
    }

    fn should_output(
        &self,
        pattern: &HybridTemporalPattern,
        _occurrences: &[Arc<Occurrence>],
    ) -> bool {
        pattern.length() >= self.min_output_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_cap() {
        let constraint = PatternSizeConstraint::max_length(3).unwrap();
        assert!(constraint.should_generate_patterns_of_length(3));
        assert!(!constraint.should_generate_patterns_of_length(4));
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(PatternSizeConstraint::new(Some(0), 0).is_err());
        assert!(PatternSizeConstraint::new(Some(2), 3).is_err());
        assert!(PatternSizeConstraint::new(None, 3).is_ok());
    }
}

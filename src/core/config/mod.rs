// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mining run configuration.
//!
//! `MiningConfig` carries the scheduling knobs of the pooled engine
//! variants plus the common thresholds, and is serde-derived so host
//! applications can embed it in their own configuration files. All values
//! are validated before a run starts; invalid values never travel further
//! than the constructor.

use crate::core::constraint::{ConstraintCollection, MinSupportConstraint, PatternSizeConstraint};
use crate::core::error::{HtpmError, HtpmResult};
use crate::core::event::Database;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default drain timeout: generous on purpose, exceeding it is fatal
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration of a mining run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Minimum relative support in `(0, 1]`
    pub min_support: f64,
    /// Worker pool size for the pooled engine variants
    pub pool_size: usize,
    /// Upper bound on one level's pool drain
    pub drain_timeout: Duration,
    /// Optional cap on generated pattern length
    pub max_pattern_length: Option<usize>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: 0.5,
            pool_size: default_pool_size(),
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            max_pattern_length: None,
        }
    }
}

/// One worker per available core; order of ten on typical hosts
pub fn default_pool_size() -> usize {
    num_cpus::get().max(1)
}

impl MiningConfig {
    pub fn new(min_support: f64) -> Self {
        Self {
            min_support,
            ..Self::default()
        }
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_max_pattern_length(mut self, max_pattern_length: usize) -> Self {
        self.max_pattern_length = Some(max_pattern_length);
        self
    }

    pub fn validate(&self) -> HtpmResult<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(HtpmError::validation_with_field(
                format!("min_support {} outside (0, 1]", self.min_support),
                "min_support",
            ));
        }
        if self.pool_size == 0 {
            return Err(HtpmError::validation_with_field(
                "pool_size must be positive",
                "pool_size",
            ));
        }
        if self.drain_timeout.is_zero() {
            return Err(HtpmError::validation_with_field(
                "drain_timeout must be non-zero",
                "drain_timeout",
            ));
        }
        if self.max_pattern_length == Some(0) {
            return Err(HtpmError::validation_with_field(
                "max_pattern_length must be positive",
                "max_pattern_length",
            ));
        }
        Ok(())
    }

    /// The constraint set implied by this configuration: minimum support
    /// plus the optional length cap
    pub fn base_constraints(&self, database: &Database) -> HtpmResult<ConstraintCollection> {
        self.validate()?;
        let mut constraints = ConstraintCollection::new().with(Box::new(
            MinSupportConstraint::new(self.min_support, database.sequence_count())?,
        ));
        if let Some(max) = self.max_pattern_length {
            constraints.push(Box::new(PatternSizeConstraint::max_length(max)?));
        }
        Ok(constraints)
    }
}

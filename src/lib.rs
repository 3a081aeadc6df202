// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid temporal pattern mining over point and interval event sequences.
//!
//! Given a database of event sequences mixing instantaneous point events
//! and durable interval events, the engines in this crate perform an
//! Apriori-style generate-and-test search for frequent temporal patterns:
//! length-1 patterns are seeded from the raw events, pairs of frequent
//! patterns sharing a canonical prefix are merged into longer candidates by
//! an exact two-pointer alignment, and anti-monotone constraints prune the
//! search at every decision point.
//!
//! ```rust
//! use htpm_rust::core::config::MiningConfig;
//! use htpm_rust::core::event::{Database, Event, HybridEventSequence};
//! use htpm_rust::core::mining::{LevelMiner, NoopListener};
//!
//! # fn main() -> Result<(), htpm_rust::core::error::HtpmError> {
//! let mut sequence = HybridEventSequence::new("1");
//! sequence.push(Event::point("c", 6.0)?);
//! sequence.push(Event::interval("a", 5.0, 10.0)?);
//! let database = Database::from_sequences(vec![sequence]);
//!
//! let config = MiningConfig::new(0.5);
//! let constraints = config.base_constraints(&database)?;
//! let miner = LevelMiner::new(config, constraints)?;
//! let result = miner.mine(&database, &mut NoopListener)?;
//! assert!(result.contains("c"));
//! # Ok(())
//! # }
//! ```
//!
//! Four engine variants trade memory footprint against parallelism; see
//! [`core::mining`] for the differences.

pub mod core;

pub use crate::core::config::MiningConfig;
pub use crate::core::error::{HtpmError, HtpmResult};
pub use crate::core::event::{Database, Event, HybridEventSequence};
pub use crate::core::mining::{
    DfsMiner, ForkJoinMiner, LevelMiner, LowStorageDfsMiner, MiningResult,
};
pub use crate::core::pattern::{parse_pattern, HybridTemporalPattern, Occurrence};

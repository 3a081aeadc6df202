// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern model: the temporal pattern value type, occurrences, the
//! incremental builder, the ORAlign merge, and the string mini-language.

pub mod align;
pub mod builder;
pub mod format;
pub mod occurrence;
pub mod pattern;

pub use align::{or_align, AlignedParent, Alignment};
pub use builder::PatternBuilder;
pub use format::parse_pattern;
pub use occurrence::Occurrence;
pub use pattern::HybridTemporalPattern;

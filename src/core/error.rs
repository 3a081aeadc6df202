// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core error types for the mining runtime.
//!
//! Three failure families exist: validation failures raised while
//! constructing events, patterns, or configuration; structural
//! inconsistencies raised when a builder contract is violated; and
//! concurrency failures raised when a mining run aborts. Pruning outcomes
//! (support too low, span too long, ...) are never errors; they are silent
//! exclusions from the result set.

use thiserror::Error;

/// Result type for mining operations
pub type HtpmResult<T> = Result<T, HtpmError>;

/// Error taxonomy of the mining core
#[derive(Error, Debug)]
pub enum HtpmError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Pattern parse error at offset {position}: {message}")]
    PatternParse { message: String, position: usize },

    #[error("Structural inconsistency: {message}")]
    StructuralInconsistency { message: String },

    #[error("Concurrency failure: {message}")]
    Concurrency { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl HtpmError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error naming the offending field
    pub fn validation_with_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a pattern parse error anchored at a byte offset of the input
    pub fn pattern_parse(message: impl Into<String>, position: usize) -> Self {
        Self::PatternParse {
            message: message.into(),
            position,
        }
    }

    /// Create a structural inconsistency error (builder contract misuse)
    pub fn structural(message: impl Into<String>) -> Self {
        Self::StructuralInconsistency {
            message: message.into(),
        }
    }

    /// Create a concurrency failure error
    pub fn concurrency(message: impl Into<String>) -> Self {
        Self::Concurrency {
            message: message.into(),
        }
    }
}

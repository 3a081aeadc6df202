// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core runtime: data model, alignment, constraints, and mining engines.

pub mod config;
pub mod constraint;
pub mod error;
pub mod event;
pub mod mining;
pub mod pattern;
pub mod stream;
pub mod util;

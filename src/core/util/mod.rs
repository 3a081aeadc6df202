// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime utilities.

pub mod executor;

pub use executor::WorkerPool;

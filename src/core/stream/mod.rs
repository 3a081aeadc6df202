// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialization surfaces for event sequence databases.

pub mod json_mapper;

pub use json_mapper::{database_from_str, database_to_string, read_database, write_database};

//! Shared in-memory state.

pub mod stats;

pub use stats::{StatField, StatsStore};

//! Abuse classification and rate limiting.
//!
//! - [`classifier`]: restricted-content pattern matching
//! - [`tracker`]: per-sender sliding-window duplicate counters
//! - [`policy`]: pure escalation decision over a counter value

pub mod classifier;
pub mod policy;
pub mod tracker;

pub use classifier::ContentClassifier;
pub use policy::Escalation;
pub use tracker::{TrackerSet, WindowKey};

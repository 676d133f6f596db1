//! groupwarden - abuse mitigation for group chat platforms.
//!
//! Classifies inbound messages for restricted content and spam behavior,
//! tracks per-sender duplicate counts over sliding time windows, and
//! escalates to a human operator when thresholds are crossed. No
//! destructive action is ever taken: the worst outcome of any event is a
//! notification.

pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod notify;
pub mod security;
pub mod state;
pub mod transport;

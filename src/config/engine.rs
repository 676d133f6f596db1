//! Engine configuration: sliding window, escalation thresholds, tracker
//! scope, and the restricted-content vocabulary.

use serde::Deserialize;

/// Scope of the sliding-window tracker keys.
///
/// The historical behavior tracks spam per sender across *all* groups: a
/// sender's duplicates in one group advance their escalation cycle in
/// every group. That is debatable enough to be an explicit choice here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackerScope {
    /// One tracker per sender, shared across all groups (historical default).
    Global,
    /// One tracker per (group, sender) pair.
    PerGroup,
}

/// Rate-limiting and escalation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Sliding window length in milliseconds.
    #[serde(default = "default_window_ms")]
    pub window_ms: i64,
    /// Duplicate count that triggers a user-facing warning.
    /// This is an equality check: the warning fires exactly once per
    /// escalation cycle, on the message that brings the count to this
    /// value, not on every message past it.
    #[serde(default = "default_warn_threshold")]
    pub warn_threshold: usize,
    /// Duplicate count above which the operator is notified and the
    /// cycle resets.
    #[serde(default = "default_notify_threshold")]
    pub notify_threshold: usize,
    /// Whether trackers are keyed per sender globally or per (group, sender).
    #[serde(default = "default_tracker_scope")]
    pub tracker_scope: TrackerScope,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            warn_threshold: default_warn_threshold(),
            notify_threshold: default_notify_threshold(),
            tracker_scope: default_tracker_scope(),
        }
    }
}

fn default_window_ms() -> i64 {
    60_000
}

fn default_warn_threshold() -> usize {
    8
}

fn default_notify_threshold() -> usize {
    10
}

fn default_tracker_scope() -> TrackerScope {
    TrackerScope::Global
}

/// Restricted-content classifier configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Literal words matched case-insensitively on word boundaries.
    #[serde(default = "default_restricted_words")]
    pub words: Vec<String>,
    /// Additional raw regex patterns, combined with the word list.
    /// Uses Rust's regex crate (ReDoS safe).
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            words: default_restricted_words(),
            patterns: Vec::new(),
        }
    }
}

fn default_restricted_words() -> Vec<String> {
    ["bokep", "ngentot", "memek", "kontol", "jembut", "bencong"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

//! Escalation policy.
//!
//! A pure decision over the current in-window duplicate count. The warn
//! tier is an equality check, not threshold-or-above: it fires exactly
//! once per escalation cycle, on the message that brings the count to the
//! threshold. Past the notify threshold the caller must reset the tracker
//! key so the cycle restarts from zero.

/// Outcome of evaluating a duplicate count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// No action.
    None,
    /// Send a user-facing warning into the group (once per cycle).
    Warn,
    /// Notify the operator; the caller resets the tracker key.
    Notify,
}

/// Map an in-window count to an escalation action.
///
/// `count == warn_threshold` warns; `count > notify_threshold` notifies;
/// everything else (including the gap between the two tiers) is a no-op.
pub fn decide(count: usize, warn_threshold: usize, notify_threshold: usize) -> Escalation {
    if count == warn_threshold {
        Escalation::Warn
    } else if count > notify_threshold {
        Escalation::Notify
    } else {
        Escalation::None
    }
}

//! Per-group, per-member statistics aggregation.
//!
//! Counters are monotone for the life of the process and live only in
//! memory; a restart resets them. Group and member entries materialize
//! lazily on first event, sharded by group via `DashMap` so unrelated
//! groups never contend.

use std::collections::HashMap;

use dashmap::DashMap;

/// Which member counter to bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    /// Every processed (non-exempt) group message.
    Messages,
    /// Notify-tier spam escalations.
    Spams,
    /// Restricted-content matches.
    Badwords,
}

/// Counters for one member within one group.
#[derive(Debug, Clone, Default)]
pub struct MemberStats {
    pub name: String,
    pub number: String,
    pub messages: u64,
    pub spams: u64,
    pub badwords: u64,
}

/// Counters for one group.
#[derive(Debug, Default)]
struct GroupStats {
    display_name: String,
    members: HashMap<String, MemberStats>,
}

/// Process-wide statistics store.
#[derive(Debug, Default)]
pub struct StatsStore {
    groups: DashMap<String, GroupStats>,
}

impl StatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump exactly one counter for `(group, sender)`, materializing the
    /// group and member entries if this is the first event for either.
    /// Display names follow the most recent event.
    #[allow(clippy::too_many_arguments)]
    pub fn increment(
        &self,
        group_id: &str,
        group_name: &str,
        sender_id: &str,
        sender_name: &str,
        sender_number: &str,
        field: StatField,
    ) {
        let mut group = self.groups.entry(group_id.to_string()).or_default();
        group.display_name = group_name.to_string();
        let member = group.members.entry(sender_id.to_string()).or_default();
        member.name = sender_name.to_string();
        member.number = sender_number.to_string();
        match field {
            StatField::Messages => member.messages += 1,
            StatField::Spams => member.spams += 1,
            StatField::Badwords => member.badwords += 1,
        }
    }

    /// Snapshot a member's counters (mainly for tests and diagnostics).
    pub fn member(&self, group_id: &str, sender_id: &str) -> Option<MemberStats> {
        self.groups
            .get(group_id)
            .and_then(|g| g.members.get(sender_id).cloned())
    }

    /// Render the current snapshot as a human-readable report, grouped by
    /// group then member. Ordering is by id on both levels, so repeated
    /// renders of an unchanged store are byte-identical.
    pub fn render(&self) -> String {
        let mut out = String::from("groupwarden statistics\n");

        let mut group_ids: Vec<String> = self.groups.iter().map(|g| g.key().clone()).collect();
        group_ids.sort();

        for group_id in group_ids {
            let Some(group) = self.groups.get(&group_id) else {
                continue;
            };
            out.push_str(&format!("\n[{}] {}\n", group_id, group.display_name));

            let mut member_ids: Vec<&String> = group.members.keys().collect();
            member_ids.sort();
            for member_id in member_ids {
                let m = &group.members[member_id];
                out.push_str(&format!(
                    "  {} ({}): messages={} spams={} badwords={}\n",
                    m.name, m.number, m.messages, m.spams, m.badwords
                ));
            }
        }

        out
    }
}

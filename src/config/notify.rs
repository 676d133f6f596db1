//! Notification configuration: operator address, retry policy, and the
//! phrase pools used for randomized alert composition.

use serde::Deserialize;

/// Operator notification and deterrent-message configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Fixed operator address that receives escalation alerts.
    #[serde(default = "default_operator_address")]
    pub operator_address: String,
    /// Attempts for operator notification delivery.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Fixed delay between delivery attempts, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// First token pool for the operator alert tag.
    #[serde(default = "default_tag_openers")]
    pub tag_openers: Vec<String>,
    /// Second token pool for the operator alert tag.
    #[serde(default = "default_tag_subjects")]
    pub tag_subjects: Vec<String>,
    /// Third token pool for the operator alert tag.
    #[serde(default = "default_tag_marks")]
    pub tag_marks: Vec<String>,
    /// Group deterrent phrases for restricted-content hits.
    #[serde(default = "default_restricted_phrases")]
    pub restricted_phrases: Vec<String>,
    /// Group deterrent phrases for spam warnings.
    #[serde(default = "default_spam_phrases")]
    pub spam_phrases: Vec<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            operator_address: default_operator_address(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            tag_openers: default_tag_openers(),
            tag_subjects: default_tag_subjects(),
            tag_marks: default_tag_marks(),
            restricted_phrases: default_restricted_phrases(),
            spam_phrases: default_spam_phrases(),
        }
    }
}

fn default_operator_address() -> String {
    "operator@localhost".to_string()
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

fn default_tag_openers() -> Vec<String> {
    ["Psst", "Hey", "Oi", "Alert", "Heads-up"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_tag_subjects() -> Vec<String> {
    ["boss", "chief", "admin", "captain", "overseer"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_tag_marks() -> Vec<String> {
    ["!", "!!", "~", "...", "!?"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_restricted_phrases() -> Vec<String> {
    [
        "please keep the language clean in here.",
        "that kind of talk is not welcome in this group.",
        "watch the language, this group has rules.",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_spam_phrases() -> Vec<String> {
    [
        "you are repeating yourself a lot, slow down.",
        "easy on the copy-paste, we saw it the first time.",
        "please stop flooding the group.",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

//! Integration test common infrastructure.
//!
//! Provides a recording mock transport and event/config builders for
//! driving the engine end-to-end in-process.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use groupwarden::config::{ClassifierConfig, Config, NotifyConfig};
use groupwarden::error::TransportError;
use groupwarden::transport::{ChatTransport, GroupMember, InboundMessage};

/// One outbound send recorded by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Group {
        group_id: String,
        text: String,
        mentions: Vec<String>,
    },
    Direct {
        address: String,
        text: String,
    },
}

/// Recording transport with scriptable membership and failure injection.
#[derive(Default)]
pub struct MockTransport {
    members: Mutex<HashMap<String, Vec<GroupMember>>>,
    /// When true, every membership query fails.
    pub fail_members: std::sync::atomic::AtomicBool,
    /// Number of leading send_direct calls that will fail.
    pub direct_failures: AtomicU32,
    /// Total send_direct attempts, including failed ones.
    pub direct_attempts: AtomicU32,
    sent: Mutex<Vec<Sent>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_members(&self, group_id: &str, members: Vec<GroupMember>) {
        self.members.lock().insert(group_id.to_string(), members);
    }

    pub fn set_admin(&self, group_id: &str, sender_id: &str) {
        self.set_members(
            group_id,
            vec![GroupMember {
                id: sender_id.to_string(),
                is_admin: true,
            }],
        );
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    pub fn group_sends(&self) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| matches!(s, Sent::Group { .. }))
            .collect()
    }

    pub fn direct_sends(&self) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| matches!(s, Sent::Direct { .. }))
            .collect()
    }

    /// Group sends whose text contains `needle`.
    pub fn group_sends_containing(&self, needle: &str) -> usize {
        self.group_sends()
            .iter()
            .filter(|s| matches!(s, Sent::Group { text, .. } if text.contains(needle)))
            .count()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn group_members(&self, group_id: &str) -> Result<Vec<GroupMember>, TransportError> {
        if self.fail_members.load(Ordering::SeqCst) {
            return Err(TransportError::MembersUnavailable(group_id.to_string()));
        }
        self.members
            .lock()
            .get(group_id)
            .cloned()
            .ok_or_else(|| TransportError::MembersUnavailable(group_id.to_string()))
    }

    async fn send_to_group(
        &self,
        group_id: &str,
        text: &str,
        mentions: &[String],
    ) -> Result<(), TransportError> {
        self.sent.lock().push(Sent::Group {
            group_id: group_id.to_string(),
            text: text.to_string(),
            mentions: mentions.to_vec(),
        });
        Ok(())
    }

    async fn send_direct(&self, address: &str, text: &str) -> Result<(), TransportError> {
        self.direct_attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.direct_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.direct_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(TransportError::SendRejected("injected failure".into()));
        }
        self.sent.lock().push(Sent::Direct {
            address: address.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Test configuration with distinctive single-phrase pools so asserts can
/// tell deterrent kinds apart, and a fast retry delay.
pub fn test_config() -> Config {
    Config {
        classifier: ClassifierConfig {
            words: vec!["forbiddenword".into()],
            patterns: vec![],
        },
        notify: NotifyConfig {
            operator_address: "operator".into(),
            retry_attempts: 3,
            retry_delay_ms: 1,
            restricted_phrases: vec!["RESTRICTED-DETERRENT".into()],
            spam_phrases: vec!["SPAM-DETERRENT".into()],
            ..NotifyConfig::default()
        },
        ..Config::default()
    }
}

/// A plain group message event.
pub fn group_message(sender_id: &str, group_id: &str, body: &str) -> InboundMessage {
    InboundMessage {
        sender_id: sender_id.to_string(),
        sender_display_name: format!("name-{sender_id}"),
        sender_number: format!("+1{sender_id}"),
        group_id: group_id.to_string(),
        group_display_name: format!("group-{group_id}"),
        is_group_message: true,
        is_from_self: false,
        body_text: body.to_string(),
        has_media: false,
        mention_target: None,
    }
}

/// A group message carrying media and no usable text.
pub fn media_message(sender_id: &str, group_id: &str) -> InboundMessage {
    InboundMessage {
        body_text: String::new(),
        has_media: true,
        ..group_message(sender_id, group_id, "")
    }
}

//! Chat transport boundary.
//!
//! The engine never talks to a chat network directly; it goes through
//! [`ChatTransport`]. The production binary uses [`BridgeTransport`],
//! which speaks newline-delimited JSON on stdin/stdout to an external
//! transport process (that process owns session bootstrap, QR pairing,
//! and the actual network connection).

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::TransportError;

/// Inbound message event, validated at the boundary.
///
/// Only `sender_id` and `group_id` are required; everything else defaults
/// so a sparse event degrades to safe values rather than poisoning the
/// pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub sender_id: String,
    #[serde(default)]
    pub sender_display_name: String,
    #[serde(default)]
    pub sender_number: String,
    pub group_id: String,
    #[serde(default)]
    pub group_display_name: String,
    #[serde(default)]
    pub is_group_message: bool,
    #[serde(default)]
    pub is_from_self: bool,
    #[serde(default)]
    pub body_text: String,
    #[serde(default)]
    pub has_media: bool,
    #[serde(default)]
    pub mention_target: Option<String>,
}

impl InboundMessage {
    /// Boundary validation: reject events missing their identity keys.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.sender_id.is_empty() {
            return Err("empty senderId");
        }
        if self.group_id.is_empty() {
            return Err("empty groupId");
        }
        Ok(())
    }

    /// The contact handle to mention in group deterrents.
    pub fn mention_handle(&self) -> &str {
        self.mention_target.as_deref().unwrap_or(&self.sender_id)
    }
}

/// One entry of a group membership snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub id: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// The seam between the engine and the chat network.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Fetch the current membership of a group.
    /// Failure is recovered by the caller as "not admin".
    async fn group_members(&self, group_id: &str) -> Result<Vec<GroupMember>, TransportError>;

    /// Send text into a group, optionally mentioning contacts.
    /// Fire-and-forget: the caller logs failures and moves on.
    async fn send_to_group(
        &self,
        group_id: &str,
        text: &str,
        mentions: &[String],
    ) -> Result<(), TransportError>;

    /// Send text to one direct address (the operator).
    async fn send_direct(&self, address: &str, text: &str) -> Result<(), TransportError>;
}

/// Input lines accepted by the bridge: message events and membership
/// snapshots pushed by the external transport process.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BridgeInput {
    Message(InboundMessage),
    #[serde(rename_all = "camelCase")]
    Members {
        group_id: String,
        members: Vec<GroupMember>,
    },
}

/// Output lines emitted by the bridge.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum BridgeOutput<'a> {
    #[serde(rename_all = "camelCase")]
    SendGroup {
        group_id: &'a str,
        text: &'a str,
        mentions: &'a [String],
    },
    #[serde(rename_all = "camelCase")]
    SendDirect { address: &'a str, text: &'a str },
}

/// JSON-lines stdio transport.
///
/// Membership snapshots arrive as `members` input lines and are served
/// from the latest snapshot per group; a group with no snapshot yet
/// yields [`TransportError::MembersUnavailable`].
pub struct BridgeTransport {
    members: DashMap<String, Arc<Vec<GroupMember>>>,
    out: Mutex<Stdout>,
}

impl BridgeTransport {
    pub fn new() -> Self {
        Self {
            members: DashMap::new(),
            out: Mutex::new(tokio::io::stdout()),
        }
    }

    /// Record a membership snapshot pushed by the transport process.
    pub fn update_members(&self, group_id: String, members: Vec<GroupMember>) {
        debug!(group = %group_id, count = members.len(), "membership snapshot updated");
        self.members.insert(group_id, Arc::new(members));
    }

    async fn write_line(&self, output: &BridgeOutput<'_>) -> Result<(), TransportError> {
        let mut line = serde_json::to_vec(output)?;
        line.push(b'\n');
        let mut out = self.out.lock().await;
        out.write_all(&line).await?;
        out.flush().await?;
        Ok(())
    }
}

impl Default for BridgeTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for BridgeTransport {
    async fn group_members(&self, group_id: &str) -> Result<Vec<GroupMember>, TransportError> {
        self.members
            .get(group_id)
            .map(|snapshot| snapshot.as_ref().clone())
            .ok_or_else(|| TransportError::MembersUnavailable(group_id.to_string()))
    }

    async fn send_to_group(
        &self,
        group_id: &str,
        text: &str,
        mentions: &[String],
    ) -> Result<(), TransportError> {
        self.write_line(&BridgeOutput::SendGroup {
            group_id,
            text,
            mentions,
        })
        .await
    }

    async fn send_direct(&self, address: &str, text: &str) -> Result<(), TransportError> {
        self.write_line(&BridgeOutput::SendDirect { address, text })
            .await
    }
}

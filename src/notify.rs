//! Notification composition and dispatch.
//!
//! Operator alerts carry a randomized identity tag (three tokens drawn
//! from fixed phrase pools) followed by a templated sentence naming the
//! sender, their contact identifier, the group, and the reason. Delivery
//! to the operator is retried with bounded attempts and a fixed delay;
//! on exhaustion the alert is logged and dropped. Group deterrents are
//! fire-and-forget.

use rand::seq::SliceRandom;
use std::time::Duration;
use tracing::{error, warn};

use crate::config::NotifyConfig;
use crate::transport::{ChatTransport, InboundMessage};

/// What an alert or deterrent is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Restricted-content match.
    Restricted,
    /// Spam escalation past the notify threshold.
    Spam,
}

impl AlertKind {
    fn reason(self) -> &'static str {
        match self {
            Self::Restricted => "restricted content",
            Self::Spam => "spam flooding",
        }
    }
}

/// Composer and dispatcher for operator alerts and group deterrents.
#[derive(Debug)]
pub struct Notifier {
    config: NotifyConfig,
}

impl Notifier {
    pub fn new(config: NotifyConfig) -> Self {
        Self { config }
    }

    /// Randomized operator-facing identity tag: three tokens, one from
    /// each pool. Pools are configuration data; selection is the only
    /// source of randomness here.
    fn compose_tag(&self) -> String {
        let mut rng = rand::thread_rng();
        let mut pick = |pool: &[String]| -> String {
            pool.choose(&mut rng).cloned().unwrap_or_default()
        };
        format!(
            "{} {}{}",
            pick(&self.config.tag_openers),
            pick(&self.config.tag_subjects),
            pick(&self.config.tag_marks)
        )
    }

    /// Build the operator alert text for one event.
    pub fn compose_alert(
        &self,
        kind: AlertKind,
        event: &InboundMessage,
        extra: Option<&str>,
    ) -> String {
        let mut text = format!(
            "{} {} ({}) triggered {} in group {}",
            self.compose_tag(),
            event.sender_display_name,
            event.sender_number,
            kind.reason(),
            event.group_display_name,
        );
        if let Some(extra) = extra {
            text.push_str(&format!(" -- {extra}"));
        }
        text
    }

    /// Build the user-facing deterrent sent into the originating group.
    /// Mentions the offender by contact handle.
    pub fn compose_deterrent(&self, kind: AlertKind, event: &InboundMessage) -> String {
        let pool = match kind {
            AlertKind::Restricted => &self.config.restricted_phrases,
            AlertKind::Spam => &self.config.spam_phrases,
        };
        let phrase = pool
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default();
        format!("@{} {}", event.mention_handle(), phrase)
    }

    /// Deliver an operator alert with bounded retry and fixed delay.
    /// Best-effort: exhaustion is logged and swallowed.
    pub async fn dispatch_operator<T: ChatTransport + ?Sized>(&self, transport: &T, text: &str) {
        let attempts = self.config.retry_attempts.max(1);
        for attempt in 1..=attempts {
            match transport
                .send_direct(&self.config.operator_address, text)
                .await
            {
                Ok(()) => return,
                Err(e) => {
                    warn!(
                        attempt,
                        error_code = e.error_code(),
                        error = %e,
                        "operator notification attempt failed"
                    );
                    if attempt < attempts {
                        tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                    }
                }
            }
        }
        error!(attempts, "operator notification dropped after retries");
    }

    /// Fire-and-forget group send: failure is logged, never retried.
    pub async fn send_deterrent<T: ChatTransport + ?Sized>(
        &self,
        transport: &T,
        event: &InboundMessage,
        text: &str,
    ) {
        let mentions = vec![event.mention_handle().to_string()];
        if let Err(e) = transport
            .send_to_group(&event.group_id, text, &mentions)
            .await
        {
            warn!(
                group = %event.group_id,
                error_code = e.error_code(),
                error = %e,
                "group deterrent send failed"
            );
        }
    }
}

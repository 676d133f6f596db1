//! The event-processing engine.
//!
//! One inbound group message flows through:
//!
//! 1. Ignore filter (non-group messages, own messages, malformed events)
//! 2. Admin exemption gate (membership query, fail-open to "not admin")
//! 3. Restricted-content path (classifier → deterrent + operator alert)
//! 4. Spam path (sliding-window tracker → escalation policy)
//!
//! Both paths update the statistics store. The tracker transaction
//! (record, decide, maybe reset) runs under the per-sender lock; all
//! transport I/O happens outside it. Nothing in here is fatal: a failed
//! sub-path is logged and the rest of the event still proceeds.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{Config, TrackerScope};
use crate::error::ConfigError;
use crate::notify::{AlertKind, Notifier};
use crate::security::{ContentClassifier, Escalation, TrackerSet, WindowKey, policy};
use crate::state::{StatField, StatsStore};
use crate::transport::{ChatTransport, InboundMessage};

/// Owns all mutable engine state for the life of the process.
pub struct Engine<T: ChatTransport> {
    transport: Arc<T>,
    classifier: ContentClassifier,
    trackers: TrackerSet,
    stats: Arc<StatsStore>,
    notifier: Notifier,
    config: Config,
}

impl<T: ChatTransport> Engine<T> {
    pub fn new(config: Config, transport: Arc<T>) -> Result<Self, ConfigError> {
        let classifier = ContentClassifier::new(&config.classifier)?;
        Ok(Self {
            transport,
            classifier,
            trackers: TrackerSet::new(),
            stats: Arc::new(StatsStore::new()),
            notifier: Notifier::new(config.notify.clone()),
            config,
        })
    }

    /// Shared handle to the statistics store (read by the HTTP endpoint).
    pub fn stats(&self) -> Arc<StatsStore> {
        Arc::clone(&self.stats)
    }

    /// Process one inbound event at the current wall-clock time.
    pub async fn handle_message(&self, event: InboundMessage) {
        let now_ms = chrono::Utc::now().timestamp_millis();
        self.handle_message_at(event, now_ms).await;
    }

    /// Process one inbound event at an explicit timestamp.
    pub async fn handle_message_at(&self, event: InboundMessage, now_ms: i64) {
        if let Err(reason) = event.validate() {
            warn!(reason, "rejecting malformed event");
            return;
        }
        if !event.is_group_message || event.is_from_self {
            return;
        }
        if self.is_exempt(&event).await {
            debug!(sender = %event.sender_id, group = %event.group_id, "admin exempt, skipping");
            return;
        }

        self.bump(&event, StatField::Messages);

        self.run_restricted_path(&event).await;
        self.run_spam_path(&event, now_ms).await;
    }

    /// Membership lookup with fail-open semantics: a missing sender or a
    /// failed query both resolve to "not exempt".
    async fn is_exempt(&self, event: &InboundMessage) -> bool {
        match self.transport.group_members(&event.group_id).await {
            Ok(members) => members
                .iter()
                .find(|m| m.id == event.sender_id)
                .map(|m| m.is_admin)
                .unwrap_or(false),
            Err(e) => {
                warn!(
                    group = %event.group_id,
                    error_code = e.error_code(),
                    error = %e,
                    "membership lookup failed, treating sender as not exempt"
                );
                false
            }
        }
    }

    async fn run_restricted_path(&self, event: &InboundMessage) {
        if !self.classifier.is_restricted(&event.body_text) {
            return;
        }
        info!(
            sender = %event.sender_id,
            group = %event.group_id,
            "restricted content detected"
        );
        self.bump(event, StatField::Badwords);

        let deterrent = self.notifier.compose_deterrent(AlertKind::Restricted, event);
        self.notifier
            .send_deterrent(self.transport.as_ref(), event, &deterrent)
            .await;

        let alert =
            self.notifier
                .compose_alert(AlertKind::Restricted, event, Some(&event.body_text));
        self.notifier
            .dispatch_operator(self.transport.as_ref(), &alert)
            .await;
    }

    async fn run_spam_path(&self, event: &InboundMessage, now_ms: i64) {
        // Media and text are mutually exclusive per message: the media
        // flag wins, and an empty body with no media tracks nothing.
        let key = if event.has_media {
            WindowKey::Media
        } else if !event.body_text.trim().is_empty() {
            WindowKey::text(&event.body_text)
        } else {
            return;
        };

        let sender_key = self.sender_key(event);
        let engine_cfg = &self.config.engine;

        // One atomic transaction per sender: record, decide, reset on
        // notify. No awaits while the lock is held.
        let decision = self.trackers.with_sender(&sender_key, |windows| {
            let count = windows.record_and_count(&key, now_ms, engine_cfg.window_ms);
            let decision =
                policy::decide(count, engine_cfg.warn_threshold, engine_cfg.notify_threshold);
            if decision == Escalation::Notify {
                windows.reset_key(&key);
            }
            decision
        });

        match decision {
            Escalation::None => {}
            Escalation::Warn => {
                info!(sender = %event.sender_id, group = %event.group_id, "spam warn threshold hit");
                let deterrent = self.notifier.compose_deterrent(AlertKind::Spam, event);
                self.notifier
                    .send_deterrent(self.transport.as_ref(), event, &deterrent)
                    .await;
            }
            Escalation::Notify => {
                info!(sender = %event.sender_id, group = %event.group_id, "spam notify threshold crossed");
                self.bump(event, StatField::Spams);
                let alert = self.notifier.compose_alert(AlertKind::Spam, event, None);
                self.notifier
                    .dispatch_operator(self.transport.as_ref(), &alert)
                    .await;
            }
        }
    }

    fn sender_key(&self, event: &InboundMessage) -> String {
        match self.config.engine.tracker_scope {
            TrackerScope::Global => event.sender_id.clone(),
            TrackerScope::PerGroup => format!("{}/{}", event.group_id, event.sender_id),
        }
    }

    fn bump(&self, event: &InboundMessage, field: StatField) {
        self.stats.increment(
            &event.group_id,
            &event.group_display_name,
            &event.sender_id,
            &event.sender_display_name,
            &event.sender_number,
            field,
        );
    }
}

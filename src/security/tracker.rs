//! Per-sender sliding-window duplicate tracking.
//!
//! Each tracked sender owns an ordered log of event timestamps per
//! classification key (one per distinct normalized text, plus one shared
//! media log). Stale entries are pruned lazily on each record; nothing is
//! pruned eagerly in the background.
//!
//! # Concurrency
//!
//! Sender state lives in a `DashMap` behind a per-sender mutex, so the
//! "record, decide, maybe reset" sequence runs as one atomic transaction
//! for that sender while unrelated senders proceed in parallel. The mutex
//! is only ever held across synchronous code, never across an await.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

/// Classification key within one sender's window state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WindowKey {
    /// Normalized (trimmed, lowercased) message text.
    Text(String),
    /// Sentinel for non-text payloads.
    Media,
}

impl WindowKey {
    /// Normalize a raw text body into a tracker key.
    pub fn text(body: &str) -> Self {
        Self::Text(body.trim().to_lowercase())
    }
}

/// One sender's window state: a timestamp log per text key, plus one for
/// media. Text keys are created on first sight and reset to empty rather
/// than removed, matching the lifetime of an escalation cycle. Logs are
/// near-ascending but not guaranteed sorted; see [`Self::record_and_count`].
#[derive(Debug, Default)]
pub struct SenderWindows {
    text: HashMap<String, VecDeque<i64>>,
    media: VecDeque<i64>,
}

impl SenderWindows {
    /// Prune entries older than `now_ms - window_ms`, append `now_ms`,
    /// and return the resulting in-window count.
    ///
    /// Two in-flight events from one sender can observe their timestamps
    /// before reaching this lock, so entries may land slightly out of
    /// order; pruning scans the whole log rather than trusting the front
    /// to be oldest.
    pub fn record_and_count(&mut self, key: &WindowKey, now_ms: i64, window_ms: i64) -> usize {
        let log = self.log_mut(key);
        let cutoff = now_ms - window_ms;
        log.retain(|&t| t >= cutoff);
        log.push_back(now_ms);
        log.len()
    }

    /// Clear the log for `key`, keeping the key itself. Ends the current
    /// escalation cycle for that key.
    pub fn reset_key(&mut self, key: &WindowKey) {
        self.log_mut(key).clear();
    }

    fn log_mut(&mut self, key: &WindowKey) -> &mut VecDeque<i64> {
        match key {
            WindowKey::Text(normalized) => self.text.entry(normalized.clone()).or_default(),
            WindowKey::Media => &mut self.media,
        }
    }
}

/// Process-wide tracker state, keyed by sender (or by (group, sender),
/// depending on the configured scope — the key string is built by the
/// engine). Entries are created lazily and never destroyed.
#[derive(Debug, Default)]
pub struct TrackerSet {
    senders: DashMap<String, Arc<Mutex<SenderWindows>>>,
}

impl TrackerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access to one sender's window state.
    ///
    /// The closure must stay synchronous; the per-sender lock is released
    /// before control returns to async code.
    pub fn with_sender<R>(&self, sender_key: &str, f: impl FnOnce(&mut SenderWindows) -> R) -> R {
        let entry = self
            .senders
            .entry(sender_key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SenderWindows::default())))
            .clone();
        let mut windows = entry.lock();
        f(&mut windows)
    }

    /// Number of senders with tracker state (diagnostic).
    pub fn sender_count(&self) -> usize {
        self.senders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: i64 = 60_000;

    #[test]
    fn test_count_grows_within_window() {
        let mut windows = SenderWindows::default();
        let key = WindowKey::text("Hello");
        for i in 1..=5 {
            assert_eq!(windows.record_and_count(&key, i * 100, WINDOW), i as usize);
        }
    }

    #[test]
    fn test_stale_entries_pruned() {
        let mut windows = SenderWindows::default();
        let key = WindowKey::text("hello");
        assert_eq!(windows.record_and_count(&key, 0, WINDOW), 1);
        // 61s later the first entry is outside the window
        assert_eq!(windows.record_and_count(&key, 61_000, WINDOW), 1);
    }

    #[test]
    fn test_out_of_order_entries_still_pruned() {
        let mut windows = SenderWindows::default();
        let key = WindowKey::text("hello");
        // Concurrent handling can record an earlier timestamp after a
        // later one; the stale entry must not hide behind a fresh front.
        assert_eq!(windows.record_and_count(&key, 100, WINDOW), 1);
        assert_eq!(windows.record_and_count(&key, 0, WINDOW), 2);
        // cutoff = 50: the t=0 entry is stale even though t=100 leads
        assert_eq!(windows.record_and_count(&key, WINDOW + 50, WINDOW), 2);
    }

    #[test]
    fn test_entry_exactly_at_cutoff_is_kept() {
        let mut windows = SenderWindows::default();
        let key = WindowKey::Media;
        assert_eq!(windows.record_and_count(&key, 0, WINDOW), 1);
        assert_eq!(windows.record_and_count(&key, WINDOW, WINDOW), 2);
    }

    #[test]
    fn test_text_normalization() {
        assert_eq!(WindowKey::text("  Hello World "), WindowKey::text("hello world"));
        let mut windows = SenderWindows::default();
        assert_eq!(windows.record_and_count(&WindowKey::text("SPAM"), 0, WINDOW), 1);
        assert_eq!(windows.record_and_count(&WindowKey::text(" spam "), 1, WINDOW), 2);
    }

    #[test]
    fn test_distinct_texts_are_independent() {
        let mut windows = SenderWindows::default();
        assert_eq!(windows.record_and_count(&WindowKey::text("one"), 0, WINDOW), 1);
        assert_eq!(windows.record_and_count(&WindowKey::text("two"), 1, WINDOW), 1);
        assert_eq!(windows.record_and_count(&WindowKey::text("one"), 2, WINDOW), 2);
    }

    #[test]
    fn test_media_independent_of_text() {
        let mut windows = SenderWindows::default();
        for i in 0..4 {
            windows.record_and_count(&WindowKey::text("hi"), i, WINDOW);
        }
        assert_eq!(windows.record_and_count(&WindowKey::Media, 10, WINDOW), 1);
    }

    #[test]
    fn test_reset_clears_but_keeps_key() {
        let mut windows = SenderWindows::default();
        let key = WindowKey::text("again");
        for i in 0..11 {
            windows.record_and_count(&key, i, WINDOW);
        }
        windows.reset_key(&key);
        // Cycle restarts from one
        assert_eq!(windows.record_and_count(&key, 20, WINDOW), 1);
        assert!(windows.text.contains_key("again"));
    }

    #[test]
    fn test_tracker_set_isolates_senders() {
        let set = TrackerSet::new();
        let key = WindowKey::text("dup");
        let a = set.with_sender("alice", |w| w.record_and_count(&key, 0, WINDOW));
        let b = set.with_sender("bob", |w| w.record_and_count(&key, 0, WINDOW));
        assert_eq!((a, b), (1, 1));
        assert_eq!(set.sender_count(), 2);
    }

    #[test]
    fn test_tracker_set_concurrent_records() {
        use std::thread;

        let set = Arc::new(TrackerSet::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let set = Arc::clone(&set);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    set.with_sender("shared", |w| {
                        w.record_and_count(&WindowKey::text("x"), i, i64::MAX / 2)
                    });
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        // All 800 records landed; none lost to interleaving
        let final_count = set.with_sender("shared", |w| {
            w.record_and_count(&WindowKey::text("x"), 1_000, i64::MAX / 2)
        });
        assert_eq!(final_count, 801);
    }
}

//! # Conversation Log
//!
//! A single global, ordered, size-bounded sequence of exchanges.
//! Eviction is FIFO across all users; per-user views are filtered out of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One message/response exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationEntry {
    pub user_id: String,
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationEntry {
    pub fn new(
        user_id: impl Into<String>,
        message: impl Into<String>,
        response: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            message: message.into(),
            response: response.into(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationLog(VecDeque<ConversationEntry>);

impl ConversationLog {
    /// Append `entry` and evict from the front until the log holds at most `cap` entries.
    ///
    /// Returns the number of evicted entries. Timestamps are kept non-decreasing:
    /// an entry older than the current tail takes the tail's timestamp.
    pub fn append(&mut self, mut entry: ConversationEntry, cap: usize) -> usize {
        if let Some(last) = self.0.back() {
            if entry.timestamp < last.timestamp {
                entry.timestamp = last.timestamp;
            }
        }
        self.0.push_back(entry);
        self.enforce_cap(cap)
    }

    /// Evict from the front until the log holds at most `cap` entries.
    pub fn enforce_cap(&mut self, cap: usize) -> usize {
        let evicted = self.0.len().saturating_sub(cap);
        self.0.drain(..evicted);
        if evicted > 0 {
            tracing::debug!("Evicted {} conversation entries (cap {})", evicted, cap);
        }
        evicted
    }

    /// The last `limit` entries for `user_id`, oldest first.
    pub fn recent_for(&self, user_id: &str, limit: usize) -> Vec<ConversationEntry> {
        let mut recent: Vec<ConversationEntry> = self
            .0
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .take(limit)
            .cloned()
            .collect();
        recent.reverse();
        recent
    }

    /// Number of entries held for `user_id`
    pub fn count_for(&self, user_id: &str) -> usize {
        self.0.iter().filter(|e| e.user_id == user_id).count()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ConversationEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(user: &str, n: usize, at: DateTime<Utc>) -> ConversationEntry {
        ConversationEntry::new(user, format!("msg {}", n), format!("reply {}", n), at)
    }

    #[test]
    fn test_cap_evicts_oldest_first() {
        let mut log = ConversationLog::default();
        let start = Utc::now();

        for i in 1..=101 {
            let evicted = log.append(entry("u1", i, start + Duration::seconds(i as i64)), 100);
            assert_eq!(evicted, if i == 101 { 1 } else { 0 });
        }

        assert_eq!(log.len(), 100);
        let messages: Vec<&str> = log.entries().map(|e| e.message.as_str()).collect();
        assert!(!messages.contains(&"msg 1"));
        assert_eq!(messages.first(), Some(&"msg 2"));
        assert_eq!(messages.last(), Some(&"msg 101"));
    }

    #[test]
    fn test_enforce_cap_trims_oversized_log() {
        let mut log = ConversationLog::default();
        let now = Utc::now();
        for i in 0..10 {
            log.append(entry("u1", i, now), 100);
        }

        assert_eq!(log.enforce_cap(4), 6);
        assert_eq!(log.len(), 4);
        assert_eq!(log.entries().next().unwrap().message, "msg 6");
        assert_eq!(log.enforce_cap(4), 0);
    }

    #[test]
    fn test_eviction_is_global() {
        let mut log = ConversationLog::default();
        let now = Utc::now();

        log.append(entry("quiet", 0, now), 3);
        for i in 1..=3 {
            log.append(entry("busy", i, now), 3);
        }

        assert_eq!(log.count_for("quiet"), 0);
        assert_eq!(log.count_for("busy"), 3);
    }

    #[test]
    fn test_recent_for_filters_interleaved_users() {
        let mut log = ConversationLog::default();
        let now = Utc::now();
        let mut n = 0;

        for round in 0..10 {
            log.append(entry("u2", n, now), 100);
            n += 1;
            if round % 3 == 0 && log.count_for("u1") < 3 {
                log.append(entry("u1", n, now), 100);
                n += 1;
            }
        }

        let recent = log.recent_for("u1", 5);
        assert_eq!(recent.len(), 3);
        assert!(recent.iter().all(|e| e.user_id == "u1"));
        let numbers: Vec<&str> = recent.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(numbers, vec!["msg 1", "msg 5", "msg 9"]);
    }

    #[test]
    fn test_recent_for_keeps_last_matches() {
        let mut log = ConversationLog::default();
        let now = Utc::now();
        for i in 0..6 {
            log.append(entry("u1", i, now), 100);
        }

        let recent = log.recent_for("u1", 2);
        assert_eq!(recent[0].message, "msg 4");
        assert_eq!(recent[1].message, "msg 5");
        assert!(log.recent_for("nobody", 5).is_empty());
    }

    #[test]
    fn test_timestamps_stay_monotonic() {
        let mut log = ConversationLog::default();
        let now = Utc::now();

        log.append(entry("u1", 0, now), 10);
        log.append(entry("u1", 1, now - Duration::seconds(30)), 10);

        let stamps: Vec<DateTime<Utc>> = log.entries().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![now, now]);
    }

    #[test]
    fn test_serializes_as_array() {
        let mut log = ConversationLog::default();
        log.append(entry("u1", 0, Utc::now()), 10);
        let value = serde_json::to_value(&log).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["userId"], "u1");
    }
}

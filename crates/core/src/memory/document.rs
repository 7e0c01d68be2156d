//! # Memory Document
//!
//! The root aggregate persisted as one JSON object. Missing keys load as
//! empty collections so older files stay readable.

use super::conversation::ConversationLog;
use super::registry::UserRegistry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryDocument {
    pub users: UserRegistry,
    pub conversations: ConversationLog,
    /// Keyed facts learned from conversations
    pub learnings: BTreeMap<String, LearningRecord>,
    /// Code-generation requests per user
    pub code_history: BTreeMap<String, VecDeque<CodeRequest>>,
}

/// A learned fact; writes shallow-merge into `fields`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningRecord {
    pub fields: Map<String, Value>,
    pub updated_at: DateTime<Utc>,
}

/// A recorded code-generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRequest {
    pub language: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl MemoryDocument {
    /// Merge `fields` into the learning stored under `key`, creating it if absent.
    pub fn merge_learning(
        &mut self,
        key: &str,
        fields: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> &LearningRecord {
        let record = self
            .learnings
            .entry(key.to_string())
            .or_insert_with(|| LearningRecord {
                fields: Map::new(),
                updated_at: now,
            });
        for (k, v) in fields {
            record.fields.insert(k, v);
        }
        record.updated_at = now;
        record
    }

    /// Append a code request for `user_id`, keeping at most `cap` per user.
    ///
    /// Returns the number of evicted requests.
    pub fn push_code_request(&mut self, user_id: &str, request: CodeRequest, cap: usize) -> usize {
        let history = self.code_history.entry(user_id.to_string()).or_default();
        history.push_back(request);
        let evicted = history.len().saturating_sub(cap);
        history.drain(..evicted);
        evicted
    }

    /// Trim the conversation log and every code history to `cap`.
    ///
    /// Returns the total number of evicted items.
    pub fn enforce_caps(&mut self, cap: usize) -> usize {
        let mut evicted = self.conversations.enforce_cap(cap);
        for history in self.code_history.values_mut() {
            let excess = history.len().saturating_sub(cap);
            history.drain(..excess);
            evicted += excess;
        }
        evicted
    }

    pub fn code_request_count(&self) -> usize {
        self.code_history.values().map(VecDeque::len).sum()
    }
}

//! # Chat Memory
//!
//! Owns the in-memory document and its store, and exposes the operations
//! used by the request-handling layer. Every mutation persists the full
//! document once; a failed save is reported in the returned [`Persisted`]
//! value and never turns the operation into an error.

use super::context::ContextAssembler;
use super::conversation::ConversationEntry;
use super::document::{CodeRequest, LearningRecord, MemoryDocument};
use super::registry::{ProfilePatch, UserProfile};
use super::store::{DocumentStore, JsonFileStore};
use crate::config::MemoryConfig;
use crate::error::MemoryError;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Result of a mutation together with the outcome of persisting it
#[derive(Debug)]
pub struct Persisted<T> {
    pub value: T,
    pub persist_error: Option<MemoryError>,
}

impl<T> Persisted<T> {
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Outcome of [`ChatMemory::record_interaction`]: the updated profile
pub type RecordOutcome = Persisted<UserProfile>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    pub users: usize,
    pub conversations: usize,
    pub learnings: usize,
    pub code_requests: usize,
}

pub struct ChatMemory {
    doc: MemoryDocument,
    store: Arc<dyn DocumentStore>,
    config: MemoryConfig,
    assembler: ContextAssembler,
}

impl ChatMemory {
    /// Load the document from `store`.
    ///
    /// A document saved under a larger cap is trimmed to `config.max_conversations`
    /// and persisted once before use.
    pub async fn open(store: Arc<dyn DocumentStore>, config: MemoryConfig) -> Self {
        let mut doc = store.load().await;
        let evicted = doc.enforce_caps(config.max_conversations);

        tracing::info!(
            "Memory ready at {} ({} users, {} conversations)",
            store.location(),
            doc.users.len(),
            doc.conversations.len()
        );
        let assembler = ContextAssembler::new(config.context_window);
        let memory = Self {
            doc,
            store,
            config,
            assembler,
        };

        if evicted > 0 {
            tracing::info!(
                "Trimmed {} stored entries to cap {}",
                evicted,
                memory.config.max_conversations
            );
            memory.persist().await;
        }
        memory
    }

    /// Open against a JSON file at `config.data_path`.
    pub async fn open_file(config: MemoryConfig) -> Self {
        let store = Arc::new(JsonFileStore::new(config.data_path.clone()));
        Self::open(store, config).await
    }

    /// Persist the current document; used on shutdown.
    pub async fn flush(&self) -> Result<(), MemoryError> {
        self.store.save(&self.doc).await
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn document(&self) -> &MemoryDocument {
        &self.doc
    }

    pub fn profile(&self, user_id: &str) -> Option<&UserProfile> {
        self.doc.users.get(user_id)
    }

    /// Most recent exchanges for `user_id`, oldest first. Defaults to the context window.
    pub fn recent_for(&self, user_id: &str, limit: Option<usize>) -> Vec<ConversationEntry> {
        let limit = limit.unwrap_or(self.config.context_window);
        self.doc.conversations.recent_for(user_id, limit)
    }

    /// Rendered context for the completion provider; empty when there is no history.
    pub fn context_for(&self, user_id: &str) -> String {
        self.assembler.build_context(&self.doc.conversations, user_id)
    }

    /// Record one completed exchange.
    ///
    /// Creates or refreshes the profile, bumps its interaction count and
    /// appends to the conversation log, then persists once.
    pub async fn record_interaction(
        &mut self,
        user_id: &str,
        message: &str,
        response: &str,
    ) -> RecordOutcome {
        let now = Utc::now();

        let profile = self.doc.users.upsert(user_id, ProfilePatch::default(), now);
        profile.interaction_count += 1;
        let profile = profile.clone();

        self.doc.conversations.append(
            ConversationEntry::new(user_id, message, response, now),
            self.config.max_conversations,
        );

        Persisted {
            value: profile,
            persist_error: self.persist().await,
        }
    }

    /// Merge `patch` into the profile for `user_id`, creating it if needed.
    pub async fn update_profile(&mut self, user_id: &str, patch: ProfilePatch) -> RecordOutcome {
        let profile = self.doc.users.upsert(user_id, patch, Utc::now()).clone();
        Persisted {
            value: profile,
            persist_error: self.persist().await,
        }
    }

    /// Merge `fields` into the learning stored under `key`.
    pub async fn remember(
        &mut self,
        key: &str,
        fields: Map<String, Value>,
    ) -> Persisted<LearningRecord> {
        let record = self.doc.merge_learning(key, fields, Utc::now()).clone();
        Persisted {
            value: record,
            persist_error: self.persist().await,
        }
    }

    pub fn learning(&self, key: &str) -> Option<&LearningRecord> {
        self.doc.learnings.get(key)
    }

    /// Record a code-generation request, bounded per user by the conversation cap.
    pub async fn record_code_request(
        &mut self,
        user_id: &str,
        language: &str,
        description: &str,
    ) -> Persisted<CodeRequest> {
        let request = CodeRequest {
            language: language.to_string(),
            description: description.to_string(),
            timestamp: Utc::now(),
        };
        self.doc
            .push_code_request(user_id, request.clone(), self.config.max_conversations);
        Persisted {
            value: request,
            persist_error: self.persist().await,
        }
    }

    pub fn code_history(&self, user_id: &str) -> Vec<CodeRequest> {
        self.doc
            .code_history
            .get(user_id)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            users: self.doc.users.len(),
            conversations: self.doc.conversations.len(),
            learnings: self.doc.learnings.len(),
            code_requests: self.doc.code_request_count(),
        }
    }

    async fn persist(&self) -> Option<MemoryError> {
        match self.store.save(&self.doc).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("Memory save failed, keeping in-memory copy: {}", e);
                Some(e)
            }
        }
    }
}

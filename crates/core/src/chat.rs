//! # Chat Pipeline
//!
//! One request: validate, fetch context, ask the provider (falling back to
//! the rule table on any failure), record the exchange, reply.
//! A well-formed request always gets a textual response; provider and
//! persistence failures only show up in `diagnostic`.

use crate::config::ChatConfig;
use crate::error::{ProviderError, ValidationError};
use crate::memory::{ChatMemory, UserProfile};
use crate::provider::{CompletionProvider, RuleBasedResponder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
}

impl ChatRequest {
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            message: message.into(),
        }
    }
}

/// Where a reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// The configured completion provider
    Provider,
    /// The rule table, because no provider is configured
    Rules,
    /// The rule table, because the provider failed
    Fallback,
}

#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub response: String,
    pub source: ReplySource,
    pub profile: UserProfile,
    pub diagnostic: Option<String>,
}

pub struct ChatService {
    memory: Mutex<ChatMemory>,
    provider: Option<Arc<dyn CompletionProvider>>,
    fallback: RuleBasedResponder,
    config: ChatConfig,
}

impl ChatService {
    pub fn new(
        memory: ChatMemory,
        provider: Option<Arc<dyn CompletionProvider>>,
        config: ChatConfig,
    ) -> Self {
        match &provider {
            Some(p) => tracing::info!("Chat replies from provider {}", p.name()),
            None => tracing::info!("No completion provider configured, replying from rules"),
        }
        Self {
            memory: Mutex::new(memory),
            provider,
            fallback: RuleBasedResponder::new(),
            config,
        }
    }

    /// Shared memory; hold the lock only for short, non-network work.
    pub fn memory(&self) -> &Mutex<ChatMemory> {
        &self.memory
    }

    pub fn provider_name(&self) -> &str {
        self.provider
            .as_ref()
            .map(|p| p.name())
            .unwrap_or_else(|| self.fallback.name())
    }

    /// Trimmed user id, or the reason it is rejected.
    pub fn validate_user_id(&self, user_id: &str) -> Result<String, ValidationError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(ValidationError::MissingUserId);
        }
        if user_id.chars().count() > self.config.max_user_id_chars {
            return Err(ValidationError::UserIdTooLong {
                max: self.config.max_user_id_chars,
            });
        }
        Ok(user_id.to_string())
    }

    /// Trimmed `(user_id, message)` or the reason the request is rejected.
    pub fn validate(&self, request: &ChatRequest) -> Result<(String, String), ValidationError> {
        let user_id = self.validate_user_id(&request.user_id)?;
        let message = request.message.trim();

        if message.is_empty() {
            return Err(ValidationError::MissingMessage);
        }
        if message.chars().count() > self.config.max_message_chars {
            return Err(ValidationError::MessageTooLong {
                max: self.config.max_message_chars,
            });
        }
        Ok((user_id, message.to_string()))
    }

    pub async fn handle(&self, request: ChatRequest) -> Result<ChatOutcome, ValidationError> {
        let (user_id, message) = self.validate(&request)?;

        let context = self.memory.lock().await.context_for(&user_id);
        let (response, source, provider_error) = self.generate(&context, &message).await;

        let recorded = self
            .memory
            .lock()
            .await
            .record_interaction(&user_id, &message, &response)
            .await;

        let diagnostic = match (provider_error, recorded.persist_error) {
            (None, None) => None,
            (Some(p), None) => Some(p.to_string()),
            (None, Some(m)) => Some(m.to_string()),
            (Some(p), Some(m)) => Some(format!("{}; {}", p, m)),
        };

        Ok(ChatOutcome {
            response,
            source,
            profile: recorded.value,
            diagnostic,
        })
    }

    async fn generate(
        &self,
        context: &str,
        message: &str,
    ) -> (String, ReplySource, Option<ProviderError>) {
        let Some(provider) = &self.provider else {
            return (
                self.fallback.respond(context, message),
                ReplySource::Rules,
                None,
            );
        };

        let result = tokio::time::timeout(
            self.config.provider_timeout,
            provider.complete(context, message),
        )
        .await
        .unwrap_or_else(|_| Err(ProviderError::Timeout(self.config.provider_timeout)));

        match result {
            Ok(reply) => (reply, ReplySource::Provider, None),
            Err(e) => {
                tracing::warn!("Provider {} failed, using fallback: {}", provider.name(), e);
                (
                    self.fallback.respond(context, message),
                    ReplySource::Fallback,
                    Some(e),
                )
            }
        }
    }
}

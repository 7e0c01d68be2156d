//! Error types for the Aria core
//!
//! None of these are fatal to a chat request: persistence and provider errors
//! are recovered where they occur, validation errors are returned to the caller.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure while persisting the memory document
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Persistence error at {path:?}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl MemoryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}

/// Failure of the upstream completion provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("No completion provider configured")]
    NotConfigured,

    #[error("Authentication rejected by provider: {0}")]
    Auth(String),

    #[error("Rate limited by provider: {0}")]
    RateLimit(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider timed out after {0:?}")]
    Timeout(Duration),

    #[error("Provider error: {0}")]
    Upstream(String),
}

impl ProviderError {
    /// Classify an upstream error message into a provider error kind.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();

        if lower.contains("api key")
            || lower.contains("api_key")
            || lower.contains("401")
            || lower.contains("403")
            || lower.contains("unauthorized")
            || lower.contains("authentication")
        {
            Self::Auth(message)
        } else if lower.contains("429") || lower.contains("rate limit") || lower.contains("quota")
        {
            Self::RateLimit(message)
        } else if lower.contains("connect")
            || lower.contains("dns")
            || lower.contains("network")
            || lower.contains("timed out")
        {
            Self::Network(message)
        } else {
            Self::Upstream(message)
        }
    }
}

/// Rejected chat request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("userId is required")]
    MissingUserId,

    #[error("message is required")]
    MissingMessage,

    #[error("userId exceeds {max} characters")]
    UserIdTooLong { max: usize },

    #[error("message exceeds {max} characters")]
    MessageTooLong { max: usize },

    #[error("{0} is required")]
    MissingField(&'static str),
}

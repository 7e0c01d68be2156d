//! # Configuration
//!
//! Runtime settings for the memory layer and the chat pipeline.
//! Defaults can be overridden through `ARIA_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Default cap on the global conversation log
pub const DEFAULT_MAX_CONVERSATIONS: usize = 100;

/// Default number of past exchanges fed to the completion provider
pub const DEFAULT_CONTEXT_WINDOW: usize = 5;

/// Default provider timeout in seconds
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Get the runtime directory path (.aria)
pub fn get_runtime_path() -> PathBuf {
    if let Ok(path) = std::env::var("ARIA_RUNTIME_PATH") {
        return PathBuf::from(path);
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".aria")
}

/// Configuration for the memory service
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryConfig {
    /// Location of the persisted memory document
    pub data_path: PathBuf,
    /// Maximum number of entries kept in the conversation log
    pub max_conversations: usize,
    /// Number of recent exchanges included in a user's context
    pub context_window: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_path: get_runtime_path().join("memory.json"),
            max_conversations: DEFAULT_MAX_CONVERSATIONS,
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}

impl MemoryConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("ARIA_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }
        if let Some(max) = env_usize("ARIA_MAX_CONVERSATIONS") {
            config.max_conversations = max;
        }
        if let Some(window) = env_usize("ARIA_CONTEXT_WINDOW") {
            config.context_window = window;
        }
        config
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_max_conversations(mut self, max: usize) -> Self {
        self.max_conversations = max;
        self
    }

    pub fn with_context_window(mut self, window: usize) -> Self {
        self.context_window = window;
        self
    }
}

/// Configuration for the chat pipeline around the memory
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Upper bound on a single provider call
    pub provider_timeout: Duration,
    /// Longest accepted user id, in characters
    pub max_user_id_chars: usize,
    /// Longest accepted message, in characters
    pub max_message_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            max_user_id_chars: 128,
            max_message_chars: 4000,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(secs) = env_usize("ARIA_PROVIDER_TIMEOUT_SECS") {
            config.provider_timeout = Duration::from_secs(secs as u64);
        }
        config
    }
}

fn env_usize(key: &str) -> Option<usize> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            tracing::warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}

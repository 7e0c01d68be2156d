//! # Aria Core
//!
//! Conversational memory for the Aria chat service: durable user profiles,
//! a bounded conversation log, context assembly for the completion provider,
//! and the chat pipeline that ties them together.
//!
//! ## Architecture
//!
//! - `memory/` - Durable store, user registry, conversation log, context assembler, facade
//! - `provider/` - Completion providers (hosted LLM via radkit, rule-based fallback)
//! - `chat` - Request pipeline: validate, context, complete, record
//! - `models` - LLM provider configuration
//! - `config` - Memory and chat settings with environment overrides
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aria_core::chat::{ChatRequest, ChatService};
//! use aria_core::config::{ChatConfig, MemoryConfig};
//! use aria_core::memory::ChatMemory;
//!
//! let memory = ChatMemory::open_file(MemoryConfig::from_env()).await;
//! let service = ChatService::new(memory, None, ChatConfig::default());
//! let outcome = service.handle(ChatRequest::new("u1", "merhaba")).await?;
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod provider;

pub use chat::{ChatOutcome, ChatRequest, ChatService, ReplySource};
pub use error::{MemoryError, ProviderError, ValidationError};

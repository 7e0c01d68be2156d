//! # Memory Module
//!
//! Durable per-user state and bounded conversation history.
//!
//! ## Architecture
//!
//! ```text
//! UserRegistry (profiles) + ConversationLog (history) + extensions
//!                    ↓
//!             MemoryDocument ──→ ContextAssembler
//!                    ↓
//!               ChatMemory
//!                    ↓
//!     JsonFileStore (persistent) or InMemoryStore
//! ```

pub mod context;
pub mod conversation;
pub mod document;
pub mod facade;
pub mod registry;
pub mod store;

pub use context::ContextAssembler;
pub use conversation::{ConversationEntry, ConversationLog};
pub use document::{CodeRequest, LearningRecord, MemoryDocument};
pub use facade::{ChatMemory, MemoryStats, Persisted, RecordOutcome};
pub use registry::{ProfilePatch, UserProfile, UserRegistry};
pub use store::{DocumentStore, InMemoryStore, JsonFileStore};

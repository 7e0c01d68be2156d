//! # Context Assembler
//!
//! Renders a user's most recent exchanges into the text block handed to
//! the completion provider. An empty string means "no prior context".

use super::conversation::{ConversationEntry, ConversationLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextAssembler {
    window: usize,
}

impl ContextAssembler {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Context block for `user_id` built from the last `window` exchanges.
    pub fn build_context(&self, log: &ConversationLog, user_id: &str) -> String {
        render(&log.recent_for(user_id, self.window))
    }
}

/// Render exchanges oldest first, one two-line block each, separated by a blank line.
pub fn render(entries: &[ConversationEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("User: {}\nAssistant: {}", e.message, e.response))
        .collect::<Vec<_>>()
        .join("\n\n")
}

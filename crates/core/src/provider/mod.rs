//! # Completion Providers
//!
//! Anything that turns a rendered context plus a user message into reply text.
//!
//! - `LlmCompletionProvider` - hosted LLM through radkit provider clients
//! - `RuleBasedResponder` - hardcoded rule table, used without an API key and
//!   as the fallback whenever the LLM call fails

pub mod llm;
pub mod rules;

pub use llm::{ChatReply, LlmCompletionProvider};
pub use rules::RuleBasedResponder;

use crate::error::ProviderError;
use async_trait::async_trait;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short identifier used in logs and API responses
    fn name(&self) -> &str;

    /// Produce a reply to `message`. `context` may be empty.
    async fn complete(&self, context: &str, message: &str) -> Result<String, ProviderError>;
}

/// Prompt sent to the model: prior exchanges (if any) followed by the new message
pub fn build_prompt(context: &str, message: &str) -> String {
    if context.is_empty() {
        format!("User: {}", message)
    } else {
        format!("Previous conversation:\n{}\n\nUser: {}", context, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_context() {
        assert_eq!(build_prompt("", "merhaba"), "User: merhaba");
    }

    #[test]
    fn test_prompt_with_context() {
        let prompt = build_prompt("User: hi\nAssistant: hello", "how are you?");
        assert!(prompt.starts_with("Previous conversation:\nUser: hi"));
        assert!(prompt.ends_with("\n\nUser: how are you?"));
    }
}

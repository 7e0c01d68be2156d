//! # LLM Completion Provider
//!
//! Hosted model access through radkit's provider clients.

use super::{build_prompt, CompletionProvider};
use crate::error::ProviderError;
use crate::models::{LlmProvider, ModelConfig};
use async_trait::async_trait;
use radkit::agent::LlmFunction;
use radkit::macros::LLMOutput;
use radkit::models::providers::{
    AnthropicLlm, DeepSeekLlm, GeminiLlm, GrokLlm, OpenAILlm, OpenRouterLlm,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const SYSTEM_PROMPT: &str = include_str!("defaults/system.md");

/// Structured model output
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct ChatReply {
    /// The reply shown to the user
    pub reply: String,
}

/// Completion provider backed by a hosted LLM
pub struct LlmCompletionProvider {
    config: ModelConfig,
    name: String,
}

impl LlmCompletionProvider {
    pub fn new(config: ModelConfig) -> Self {
        let name = format!("{}:{}", config.provider.display_name(), config.model);
        Self { config, name }
    }

    /// Build from `ARIA_*` variables; `None` when no API key is configured.
    pub fn from_env() -> Option<Self> {
        ModelConfig::from_env().map(Self::new)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

/// One structured completion against the client selected by `config`.
async fn complete_with(config: &ModelConfig, prompt: String) -> anyhow::Result<ChatReply> {
    let reply = match config.provider {
        LlmProvider::Anthropic => {
            let llm = AnthropicLlm::from_env(&config.model)?;
            LlmFunction::<ChatReply>::new_with_system_instructions(llm, SYSTEM_PROMPT)
                .run(prompt)
                .await?
        }
        LlmProvider::OpenAI => {
            let mut llm = OpenAILlm::from_env(&config.model)?;
            if let Some(base_url) = &config.base_url {
                llm = llm.with_base_url(base_url);
            }
            LlmFunction::<ChatReply>::new_with_system_instructions(llm, SYSTEM_PROMPT)
                .run(prompt)
                .await?
        }
        LlmProvider::Gemini => {
            let llm = GeminiLlm::from_env(&config.model)?;
            LlmFunction::<ChatReply>::new_with_system_instructions(llm, SYSTEM_PROMPT)
                .run(prompt)
                .await?
        }
        LlmProvider::OpenRouter => {
            let llm = OpenRouterLlm::from_env(&config.model)?;
            LlmFunction::<ChatReply>::new_with_system_instructions(llm, SYSTEM_PROMPT)
                .run(prompt)
                .await?
        }
        LlmProvider::Grok => {
            let llm = GrokLlm::from_env(&config.model)?;
            LlmFunction::<ChatReply>::new_with_system_instructions(llm, SYSTEM_PROMPT)
                .run(prompt)
                .await?
        }
        LlmProvider::DeepSeek => {
            let llm = DeepSeekLlm::from_env(&config.model)?;
            LlmFunction::<ChatReply>::new_with_system_instructions(llm, SYSTEM_PROMPT)
                .run(prompt)
                .await?
        }
    };
    Ok(reply)
}

#[async_trait]
impl CompletionProvider for LlmCompletionProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, context: &str, message: &str) -> Result<String, ProviderError> {
        let output = complete_with(&self.config, build_prompt(context, message))
            .await
            .map_err(|e| ProviderError::classify(format!("{:#}", e)))?;

        let reply = output.reply.trim();
        if reply.is_empty() {
            return Err(ProviderError::Upstream("empty reply".to_string()));
        }
        Ok(reply.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name() {
        let provider =
            LlmCompletionProvider::new(ModelConfig::with_provider(LlmProvider::OpenAI, "gpt-4o"));
        assert_eq!(provider.name(), "OpenAI:gpt-4o");
        assert_eq!(provider.config().model, "gpt-4o");
    }
}

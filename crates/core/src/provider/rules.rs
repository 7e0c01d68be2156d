//! # Rule-Based Responder
//!
//! Ordered pattern table answering common messages without a model.
//! Matches Turkish and English phrasings; the first matching rule wins.

use super::CompletionProvider;
use crate::error::ProviderError;
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Greeting,
    Wellbeing,
    Identity,
    Thanks,
    Farewell,
    Help,
    Time,
}

const RULES: &[(Intent, &str)] = &[
    (Intent::Wellbeing, r"(?i)how are you|nasılsın|naber"),
    (Intent::Identity, r"(?i)who are you|your name|sen kimsin|adın ne"),
    (Intent::Thanks, r"(?i)\bthanks?\b|thank you|teşekkür|sağ ?ol"),
    (Intent::Farewell, r"(?i)\b(bye|goodbye|see you)\b|görüşürüz|hoşça ?kal"),
    (Intent::Help, r"(?i)\b(help|yardım)\b"),
    (Intent::Time, r"(?i)what time|saat kaç"),
    (
        Intent::Greeting,
        r"(?i)\b(merhaba|selam|hello|hi|hey|günaydın|good morning)\b",
    ),
];

const DEFAULT_REPLY: &str = "I'm answering without a language model right now, so my replies \
are limited. Ask me for help to see what I can do.";

const HELP_REPLY: &str = "I can chat, remember what we talked about recently, \
and answer simple questions. With an API key configured I can do a lot more.";

pub struct RuleBasedResponder {
    rules: Vec<(Intent, Regex)>,
}

impl Default for RuleBasedResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedResponder {
    pub fn new() -> Self {
        let rules = RULES
            .iter()
            .filter_map(|(intent, pattern)| match Regex::new(pattern) {
                Ok(regex) => Some((*intent, regex)),
                Err(e) => {
                    tracing::warn!("Skipping invalid rule {:?}: {}", intent, e);
                    None
                }
            })
            .collect();
        Self { rules }
    }

    /// Reply for `message`; `context` only changes the greeting.
    pub fn respond(&self, context: &str, message: &str) -> String {
        let intent = self
            .rules
            .iter()
            .find(|(_, regex)| regex.is_match(message))
            .map(|(intent, _)| *intent);

        match intent {
            Some(Intent::Greeting) if !context.is_empty() => {
                "Welcome back! What would you like to talk about?".to_string()
            }
            Some(Intent::Greeting) => "Hello! I'm Aria. How can I help you today?".to_string(),
            Some(Intent::Wellbeing) => {
                "I'm doing well, thanks for asking! How about you?".to_string()
            }
            Some(Intent::Identity) => {
                "I'm Aria, a chat assistant that remembers our recent conversation.".to_string()
            }
            Some(Intent::Thanks) => "You're welcome! Anything else?".to_string(),
            Some(Intent::Farewell) => "Goodbye! Talk to you soon.".to_string(),
            Some(Intent::Help) => HELP_REPLY.to_string(),
            Some(Intent::Time) => format!("It's {} UTC.", Utc::now().format("%H:%M")),
            None => DEFAULT_REPLY.to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for RuleBasedResponder {
    fn name(&self) -> &str {
        "rules"
    }

    async fn complete(&self, context: &str, message: &str) -> Result<String, ProviderError> {
        Ok(self.respond(context, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_compile() {
        assert_eq!(RuleBasedResponder::new().rules.len(), RULES.len());
    }

    #[test]
    fn test_greeting() {
        let responder = RuleBasedResponder::new();
        assert!(responder.respond("", "merhaba").starts_with("Hello!"));
        assert!(responder.respond("", "Hi there").starts_with("Hello!"));
        assert!(responder
            .respond("User: a\nAssistant: b", "selam")
            .starts_with("Welcome back"));
    }

    #[test]
    fn test_specific_intents_win_over_greeting() {
        let responder = RuleBasedResponder::new();
        assert!(responder.respond("", "hi, how are you?").starts_with("I'm doing well"));
        assert!(responder.respond("", "merhaba, teşekkürler").starts_with("You're welcome"));
    }

    #[test]
    fn test_time_and_default() {
        let responder = RuleBasedResponder::new();
        assert!(responder.respond("", "saat kaç?").ends_with("UTC."));
        assert_eq!(responder.respond("", "quantum chromodynamics"), DEFAULT_REPLY);
    }

    #[test]
    fn test_no_false_greeting_inside_words() {
        let responder = RuleBasedResponder::new();
        assert_eq!(responder.respond("", "this is a test"), DEFAULT_REPLY);
    }

    #[tokio::test]
    async fn test_complete_never_fails() {
        let responder = RuleBasedResponder::new();
        assert!(responder.complete("", "").await.is_ok());
        assert_eq!(responder.name(), "rules");
    }
}

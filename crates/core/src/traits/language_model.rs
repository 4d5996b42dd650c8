//! External model service traits
//!
//! The intake pipeline treats the chat model and the moderation classifier as
//! opaque collaborators. Implementations live in the llm crate; tests use the
//! scripted doubles from the same crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::LlmError;

/// Role of a message sent to the chat model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One message of chat history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }
}

/// Why the pipeline is calling the model.
///
/// Carried on every request for logging, metrics and test scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatPurpose {
    QuestionGeneration,
    Extraction,
    Disqualification,
    Priority,
    ClosingMessage,
}

impl ChatPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatPurpose::QuestionGeneration => "question_generation",
            ChatPurpose::Extraction => "extraction",
            ChatPurpose::Disqualification => "disqualification",
            ChatPurpose::Priority => "priority",
            ChatPurpose::ClosingMessage => "closing_message",
        }
    }
}

/// A single chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub purpose: ChatPurpose,
    /// System instruction, sent first
    pub system: String,
    /// Ordered history after the system instruction
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(purpose: ChatPurpose, system: impl Into<String>) -> Self {
        Self {
            purpose,
            system: system.into(),
            messages: Vec::new(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Chat completion service returning free text
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run one completion. A single attempt; callers decide the fallback.
    async fn chat(&self, request: ChatRequest) -> Result<String, LlmError>;

    /// Model identifier, for logs
    fn model_name(&self) -> &str;
}

/// Result of a moderation classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationResult {
    pub flagged: bool,
    /// Category name → flagged
    #[serde(default)]
    pub categories: BTreeMap<String, bool>,
}

impl ModerationResult {
    /// Names of categories marked as flagged, in name order
    pub fn flagged_categories(&self) -> Vec<String> {
        self.categories
            .iter()
            .filter(|(_, flagged)| **flagged)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Content moderation classifier
#[async_trait]
pub trait ModerationService: Send + Sync {
    async fn moderate(&self, input: &str) -> Result<ModerationResult, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ChatRequest::new(ChatPurpose::Extraction, "extract")
            .with_message(ChatMessage::user("hello"))
            .with_temperature(0.3)
            .with_max_tokens(200);

        assert_eq!(request.purpose, ChatPurpose::Extraction);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.max_tokens, 200);
        assert!((request.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_flagged_categories() {
        let mut categories = BTreeMap::new();
        categories.insert("violence".to_string(), true);
        categories.insert("harassment".to_string(), false);
        categories.insert("hate".to_string(), true);

        let result = ModerationResult {
            flagged: true,
            categories,
        };
        assert_eq!(result.flagged_categories(), vec!["hate", "violence"]);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&ChatRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}

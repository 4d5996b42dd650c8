//! Structured answer extraction
//!
//! Asks the model to boil a free-text answer down to one value. This step
//! cannot fail: any problem with the call or the reply yields the raw answer.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;

use intake_config::{prompts, CallBudget};
use intake_core::{ChatMessage, ChatPurpose, ChatRequest, LanguageModel, LlmError, QuestionId};
use intake_llm::{decode_json_object, ExtractionFailure};

use crate::outcome::{Notice, NoticeKind};

/// Why the raw answer was kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    Call(LlmError),
    Decode(ExtractionFailure),
}

/// Result of one extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedAnswer {
    /// Model returned a value
    Value(String),
    /// Model returned an explicit null
    Null,
    /// Raw answer kept
    Fallback { raw: String, reason: FallbackReason },
}

impl ExtractedAnswer {
    /// What goes into `ResponseRecord::extracted_value`
    pub fn stored_value(&self) -> Option<String> {
        match self {
            ExtractedAnswer::Value(v) => Some(v.clone()),
            ExtractedAnswer::Null => None,
            ExtractedAnswer::Fallback { raw, .. } => Some(raw.clone()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ExtractedAnswer::Fallback { .. })
    }
}

#[derive(Debug, Deserialize)]
struct ExtractionReply {
    #[serde(deserialize_with = "value_as_text")]
    extracted_value: Option<String>,
}

/// Strings pass through; numbers, booleans and nested JSON become their text
fn value_as_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Decode a model reply; `Err` carries the typed failure
pub fn parse_extraction(reply: &str) -> Result<Option<String>, ExtractionFailure> {
    decode_json_object::<ExtractionReply>(reply).map(|r| r.extracted_value)
}

pub struct StructuredExtractor {
    model: Arc<dyn LanguageModel>,
    budget: CallBudget,
}

impl StructuredExtractor {
    pub fn new(model: Arc<dyn LanguageModel>, budget: CallBudget) -> Self {
        Self { model, budget }
    }

    pub async fn extract(
        &self,
        answer: &str,
        question_id: &QuestionId,
    ) -> (ExtractedAnswer, Option<Notice>) {
        let request = ChatRequest::new(ChatPurpose::Extraction, prompts::EXTRACTION_SYSTEM)
            .with_message(ChatMessage::user(prompts::extraction_prompt(
                answer,
                question_id.as_str(),
            )))
            .with_temperature(self.budget.temperature)
            .with_max_tokens(self.budget.max_tokens);

        let reply = match self.model.chat(request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(question_id = %question_id, error = %e, "extraction call failed");
                let notice = Notice::new(NoticeKind::Extraction, format!("Error extracting answer: {e}"));
                return (
                    ExtractedAnswer::Fallback {
                        raw: answer.to_string(),
                        reason: FallbackReason::Call(e),
                    },
                    Some(notice),
                );
            }
        };

        match parse_extraction(&reply) {
            Ok(Some(value)) => (ExtractedAnswer::Value(value), None),
            Ok(None) => (ExtractedAnswer::Null, None),
            Err(failure) => {
                tracing::debug!(question_id = %question_id, %failure, "keeping raw answer");
                (
                    ExtractedAnswer::Fallback {
                        raw: answer.to_string(),
                        reason: FallbackReason::Decode(failure),
                    },
                    None,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_llm::MockLanguageModel;

    fn budget() -> CallBudget {
        CallBudget::new(0.3, 200)
    }

    #[test]
    fn test_parse_coerces_scalars() {
        assert_eq!(parse_extraction(r#"{"extracted_value": "Jane Doe"}"#), Ok(Some("Jane Doe".to_string())));
        assert_eq!(parse_extraction(r#"{"extracted_value": 42}"#), Ok(Some("42".to_string())));
        assert_eq!(parse_extraction(r#"{"extracted_value": true}"#), Ok(Some("true".to_string())));
        assert_eq!(parse_extraction(r#"{"extracted_value": null}"#), Ok(None));
    }

    #[test]
    fn test_parse_missing_field_is_schema_mismatch() {
        assert!(matches!(
            parse_extraction(r#"{"value": "x"}"#),
            Err(ExtractionFailure::SchemaMismatch(_))
        ));
    }

    #[tokio::test]
    async fn test_no_braces_returns_raw_answer() {
        let model = MockLanguageModel::new().reply(ChatPurpose::Extraction, "I can't do that.");
        let extractor = StructuredExtractor::new(Arc::new(model), budget());

        let id = QuestionId::from_question("When did it happen?");
        let (answer, notice) = extractor.extract("  last Tuesday, around 5pm ", &id).await;

        assert_eq!(answer.stored_value().as_deref(), Some("  last Tuesday, around 5pm "));
        assert!(matches!(
            answer,
            ExtractedAnswer::Fallback {
                reason: FallbackReason::Decode(ExtractionFailure::NoJsonObject),
                ..
            }
        ));
        assert!(notice.is_none());
    }

    #[tokio::test]
    async fn test_fenced_reply_is_decoded() {
        let model = MockLanguageModel::new().reply(
            ChatPurpose::Extraction,
            "```json\n{\"extracted_value\": \"03/14/2026\"}\n```",
        );
        let extractor = StructuredExtractor::new(Arc::new(model), budget());
        let id = QuestionId::from_question("When?");
        let (answer, _) = extractor.extract("March 14th", &id).await;
        assert_eq!(answer, ExtractedAnswer::Value("03/14/2026".into()));
    }

    #[tokio::test]
    async fn test_call_failure_falls_back_with_notice() {
        let model = MockLanguageModel::new()
            .fail(ChatPurpose::Extraction, LlmError::RateLimited("429".into()));
        let extractor = StructuredExtractor::new(Arc::new(model), budget());
        let id = QuestionId::from_question("When?");
        let (answer, notice) = extractor.extract("yesterday", &id).await;

        assert_eq!(answer.stored_value().as_deref(), Some("yesterday"));
        assert!(answer.is_fallback());
        assert_eq!(notice.unwrap().kind, NoticeKind::Extraction);
    }

    #[tokio::test]
    async fn test_request_budget() {
        let model = Arc::new(MockLanguageModel::new().reply(ChatPurpose::Extraction, "{}"));
        let extractor = StructuredExtractor::new(model.clone(), budget());
        let id = QuestionId::from_question("When?");
        extractor.extract("today", &id).await;

        let calls = model.calls_for(ChatPurpose::Extraction);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].max_tokens, 200);
        assert!(calls[0].messages[0].content.contains(id.as_str()));
    }
}

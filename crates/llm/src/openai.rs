//! OpenAI-compatible HTTP client
//!
//! Implements both [`LanguageModel`] (`/chat/completions`) and
//! [`ModerationService`] (`/moderations`) against any endpoint speaking the
//! OpenAI wire format. One attempt per call, bounded by the configured
//! request timeout.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use intake_config::LlmConfig;
use intake_core::{
    ChatRequest, LanguageModel, LlmError, ModerationResult, ModerationService,
};

/// Chat + moderation client
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    moderation_model: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("moderation_model", &self.moderation_model)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Build a client from settings. Fails without an API key.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                LlmError::Configuration(
                    "no API key: set llm.api_key, INTAKE_LLM__API_KEY or OPENAI_API_KEY".into(),
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| LlmError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            moderation_model: config.moderation_model.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, LlmError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LlmError::from_status(status.as_u16(), error_message(&body)));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn chat(&self, request: ChatRequest) -> Result<String, LlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_request(&self.model, &request);

        let result: Result<ChatCompletionResponse, LlmError> =
            self.post("chat/completions", &body).await;

        match result {
            Ok(parsed) => {
                tracing::debug!(
                    purpose = request.purpose.as_str(),
                    model = %self.model,
                    latency_ms = started.elapsed().as_millis() as u64,
                    "chat completion finished"
                );
                parsed.into_text()
            }
            Err(e) => {
                tracing::warn!(
                    purpose = request.purpose.as_str(),
                    model = %self.model,
                    error = %e,
                    "chat completion failed"
                );
                Err(e)
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ModerationService for OpenAiClient {
    async fn moderate(&self, input: &str) -> Result<ModerationResult, LlmError> {
        let body = ModerationRequest {
            model: &self.moderation_model,
            input,
        };
        let parsed: ModerationResponse = self.post("moderations", &body).await?;
        parsed.into_result()
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_request(model: &'a str, request: &'a ChatRequest) -> Self {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: &request.system,
        });
        messages.extend(request.messages.iter().map(|m| WireMessage {
            role: m.role.as_str(),
            content: &m.content,
        }));

        Self {
            model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl ChatCompletionResponse {
    fn into_text(self) -> Result<String, LlmError> {
        let message = self
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| LlmError::InvalidResponse("response has no choices".into()))?;

        match (message.content, message.refusal) {
            (Some(content), _) => Ok(content),
            (None, Some(refusal)) => Ok(refusal),
            (None, None) => Err(LlmError::InvalidResponse("choice has no content".into())),
        }
    }
}

#[derive(Debug, Serialize)]
struct ModerationRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ModerationResponse {
    #[serde(default)]
    results: Vec<ModerationEntry>,
}

#[derive(Debug, Deserialize)]
struct ModerationEntry {
    flagged: bool,
    #[serde(default)]
    categories: BTreeMap<String, Option<bool>>,
}

impl ModerationResponse {
    fn into_result(self) -> Result<ModerationResult, LlmError> {
        let entry = self
            .results
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("moderation returned no results".into()))?;

        Ok(ModerationResult {
            flagged: entry.flagged,
            categories: entry
                .categories
                .into_iter()
                .map(|(name, flagged)| (name, flagged.unwrap_or(false)))
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pull `error.message` out of an OpenAI error body, else return it as-is
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::{ChatMessage, ChatPurpose, ChatRole};

    #[test]
    fn test_missing_key_is_configuration_error() {
        let config = LlmConfig::default();
        let err = OpenAiClient::from_config(&config).unwrap_err();
        assert!(matches!(err, LlmError::Configuration(_)));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = LlmConfig {
            api_key: Some("sk-test".into()),
            base_url: "http://localhost:9999/v1/".into(),
            ..LlmConfig::default()
        };
        let client = OpenAiClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint("moderations"), "http://localhost:9999/v1/moderations");
        assert_eq!(client.model_name(), "gpt-4.1-mini");
    }

    #[test]
    fn test_request_puts_system_first() {
        let request = ChatRequest::new(ChatPurpose::QuestionGeneration, "be brief")
            .with_message(ChatMessage::new(ChatRole::Assistant, "What is your name?"))
            .with_message(ChatMessage::user("Jane"));
        let body = ChatCompletionRequest::from_request("gpt-4.1-mini", &request);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be brief");
        assert_eq!(json["messages"][1]["role"], "assistant");
        assert_eq!(json["messages"][2]["content"], "Jane");
        assert_eq!(json["max_tokens"], 1000);
    }

    #[test]
    fn test_chat_response_text() {
        let json = r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "When did it happen?"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.into_text().unwrap(), "When did it happen?");
    }

    #[test]
    fn test_chat_response_without_choices() {
        let parsed: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(parsed.into_text(), Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_moderation_response() {
        let json = r#"{
            "id": "modr-1",
            "results": [{
                "flagged": true,
                "categories": {"violence": true, "harassment": false, "illicit": null}
            }]
        }"#;
        let parsed: ModerationResponse = serde_json::from_str(json).unwrap();
        let result = parsed.into_result().unwrap();
        assert!(result.flagged);
        assert_eq!(result.flagged_categories(), vec!["violence"]);
        assert_eq!(result.categories.get("illicit"), Some(&false));
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Incorrect API key provided");
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
    }
}

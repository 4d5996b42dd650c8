//! Scripted test doubles
//!
//! [`MockLanguageModel`] answers from per-purpose reply queues and records
//! every request it sees. [`MockModeration`] returns a fixed result or a
//! fixed error. Both are used by the agent and server test suites.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, VecDeque};

use intake_core::{
    ChatPurpose, ChatRequest, LanguageModel, LlmError, ModerationResult, ModerationService,
};

type Reply = Result<String, LlmError>;

#[derive(Default)]
struct Script {
    queued: HashMap<ChatPurpose, VecDeque<Reply>>,
    fallback: HashMap<ChatPurpose, Reply>,
    calls: Vec<ChatRequest>,
}

/// Chat model that replies from a script.
///
/// Queued replies for a purpose are consumed first; once exhausted the
/// purpose's fallback is returned on every call. A purpose with neither
/// yields `LlmError::Network`.
#[derive(Default)]
pub struct MockLanguageModel {
    script: Mutex<Script>,
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one reply for `purpose`
    pub fn reply(self, purpose: ChatPurpose, text: impl Into<String>) -> Self {
        self.push(purpose, Ok(text.into()));
        self
    }

    /// Queue one failure for `purpose`
    pub fn fail(self, purpose: ChatPurpose, error: LlmError) -> Self {
        self.push(purpose, Err(error));
        self
    }

    /// Reply with `text` whenever the queue for `purpose` is empty
    pub fn always(self, purpose: ChatPurpose, text: impl Into<String>) -> Self {
        self.script.lock().fallback.insert(purpose, Ok(text.into()));
        self
    }

    /// Fail with `error` whenever the queue for `purpose` is empty
    pub fn always_fail(self, purpose: ChatPurpose, error: LlmError) -> Self {
        self.script.lock().fallback.insert(purpose, Err(error));
        self
    }

    pub fn push(&self, purpose: ChatPurpose, reply: Reply) {
        self.script
            .lock()
            .queued
            .entry(purpose)
            .or_default()
            .push_back(reply);
    }

    /// Every request received so far, in order
    pub fn calls(&self) -> Vec<ChatRequest> {
        self.script.lock().calls.clone()
    }

    pub fn calls_for(&self, purpose: ChatPurpose) -> Vec<ChatRequest> {
        self.script
            .lock()
            .calls
            .iter()
            .filter(|r| r.purpose == purpose)
            .cloned()
            .collect()
    }

    pub fn call_count(&self, purpose: ChatPurpose) -> usize {
        self.script
            .lock()
            .calls
            .iter()
            .filter(|r| r.purpose == purpose)
            .count()
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn chat(&self, request: ChatRequest) -> Result<String, LlmError> {
        let mut script = self.script.lock();
        let purpose = request.purpose;
        script.calls.push(request);

        if let Some(reply) = script.queued.get_mut(&purpose).and_then(VecDeque::pop_front) {
            return reply;
        }
        script.fallback.get(&purpose).cloned().unwrap_or_else(|| {
            Err(LlmError::Network(format!(
                "no scripted reply for {}",
                purpose.as_str()
            )))
        })
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

/// Moderation classifier with a fixed answer
pub struct MockModeration {
    outcome: Result<ModerationResult, LlmError>,
    calls: Mutex<Vec<String>>,
}

impl MockModeration {
    /// Flags nothing
    pub fn clean() -> Self {
        Self::with_outcome(Ok(ModerationResult::default()))
    }

    /// Flags every input under `categories`
    pub fn flagging(categories: &[&str]) -> Self {
        let categories: BTreeMap<String, bool> =
            categories.iter().map(|c| (c.to_string(), true)).collect();
        Self::with_outcome(Ok(ModerationResult {
            flagged: true,
            categories,
        }))
    }

    /// Fails every call
    pub fn failing(error: LlmError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<ModerationResult, LlmError>) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn inputs(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ModerationService for MockModeration {
    async fn moderate(&self, input: &str) -> Result<ModerationResult, LlmError> {
        self.calls.lock().push(input.to_string());
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queue_then_fallback() {
        let model = MockLanguageModel::new()
            .reply(ChatPurpose::QuestionGeneration, "first")
            .always(ChatPurpose::QuestionGeneration, "again");

        let request = || ChatRequest::new(ChatPurpose::QuestionGeneration, "sys");
        assert_eq!(model.chat(request()).await.unwrap(), "first");
        assert_eq!(model.chat(request()).await.unwrap(), "again");
        assert_eq!(model.chat(request()).await.unwrap(), "again");
        assert_eq!(model.call_count(ChatPurpose::QuestionGeneration), 3);
    }

    #[tokio::test]
    async fn test_unscripted_purpose_fails() {
        let model = MockLanguageModel::new();
        let result = model
            .chat(ChatRequest::new(ChatPurpose::Priority, "sys"))
            .await;
        assert!(matches!(result, Err(LlmError::Network(_))));
        assert_eq!(model.calls_for(ChatPurpose::Priority).len(), 1);
    }

    #[tokio::test]
    async fn test_moderation_outcomes() {
        let flagging = MockModeration::flagging(&["violence"]);
        let result = flagging.moderate("text").await.unwrap();
        assert!(result.flagged);
        assert_eq!(result.flagged_categories(), vec!["violence"]);
        assert_eq!(flagging.inputs(), vec!["text"]);

        let failing = MockModeration::failing(LlmError::RateLimited("slow down".into()));
        assert!(failing.moderate("text").await.is_err());

        assert!(!MockModeration::clean().moderate("text").await.unwrap().flagged);
    }
}

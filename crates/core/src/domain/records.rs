//! Intake answers keyed by question fingerprint

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Length of a question fingerprint in hex characters
pub const QUESTION_ID_LEN: usize = 8;

/// Short fingerprint of a question's text.
///
/// Identical text always yields the same id, so re-asking a question replaces
/// its earlier answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn from_question(question: &str) -> Self {
        let digest = Sha256::digest(question.as_bytes());
        let hex: String = digest
            .iter()
            .take(QUESTION_ID_LEN / 2)
            .map(|byte| format!("{:02x}", byte))
            .collect();
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One answered question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub question: String,
    /// What the user typed
    pub answer: String,
    /// Normalized value, `None` when the model explicitly returned null
    pub extracted_value: Option<String>,
}

/// All answers of a session
pub type Responses = BTreeMap<QuestionId, ResponseRecord>;

/// Pretty JSON of the responses, as embedded in model prompts
pub fn responses_json(responses: &Responses) -> String {
    serde_json::to_string_pretty(responses).unwrap_or_else(|_| "{}".to_string())
}

//! Intake session record
//!
//! One `IntakeSession` per visitor. Fields are private so the record can
//! only change in the ways the intake flow allows: the transcript and the
//! answer map only grow, the contact flag only goes from false to true, and
//! the stage moves only along [`Stage::can_transition_to`]. [`clear`] is the
//! single reset path and keeps the session id.
//!
//! [`clear`]: IntakeSession::clear

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use intake_core::{Message, PriorityScore, QuestionId, ResponseRecord, Responses, Role, Stage, Verdict};

use crate::error::{AgentError, Result};

/// Which signal ended the session as disqualified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisqualificationSource {
    /// The five-rule screening verdict
    Screening,
    /// Priority tier came back `UNLIKELY`
    LowPriority,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntakeSession {
    id: String,
    stage: Stage,
    responses: Responses,
    transcript: Vec<Message>,
    contact_info_collected: bool,
    disqualified: bool,
    disqualification_reason: Option<Verdict>,
    disqualification_source: Option<DisqualificationSource>,
    case_priority: Option<PriorityScore>,
    input_sequence: u64,
    closing_message: Option<String>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl Default for IntakeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeSession {
    /// Fresh session on the welcome stage with a random id
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            stage: Stage::Welcome,
            responses: Responses::new(),
            transcript: Vec::new(),
            contact_info_collected: false,
            disqualified: false,
            disqualification_reason: None,
            disqualification_source: None,
            case_priority: None,
            input_sequence: 0,
            closing_message: None,
            created_at: now,
            last_activity: now,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    pub fn response_count(&self) -> usize {
        self.responses.len()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Transcript without internal system notes
    pub fn visible_transcript(&self) -> impl Iterator<Item = &Message> {
        self.transcript.iter().filter(|m| m.is_visible())
    }

    /// Most recent assistant message, i.e. the question being answered
    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.transcript.iter().rev().find(|m| m.role == Role::Assistant)
    }

    pub fn contact_info_collected(&self) -> bool {
        self.contact_info_collected
    }

    pub fn is_disqualified(&self) -> bool {
        self.disqualified
    }

    pub fn disqualification_reason(&self) -> Option<&Verdict> {
        self.disqualification_reason.as_ref()
    }

    pub fn disqualification_source(&self) -> Option<DisqualificationSource> {
        self.disqualification_source
    }

    pub fn case_priority(&self) -> Option<&PriorityScore> {
        self.case_priority.as_ref()
    }

    /// Count of stored answers over the session; the UI keys its input box on it
    pub fn input_sequence(&self) -> u64 {
        self.input_sequence
    }

    pub fn closing_message(&self) -> Option<&str> {
        self.closing_message.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Whether the session has been untouched for longer than `idle`
    pub fn is_idle(&self, now: DateTime<Utc>, idle: chrono::Duration) -> bool {
        now - self.last_activity > idle
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    pub fn transition_to(&mut self, next: Stage) -> Result<()> {
        if !self.stage.can_transition_to(next) {
            return Err(AgentError::InvalidTransition {
                from: self.stage,
                to: next,
            });
        }
        tracing::debug!(session_id = %self.id, from = %self.stage, to = %next, "stage transition");
        self.stage = next;
        Ok(())
    }

    pub fn push_message(&mut self, role: Role, content: impl Into<String>) {
        self.transcript.push(Message::now(role, content));
    }

    /// Store an answer under the question's fingerprint.
    ///
    /// Asking the identical question again replaces the earlier answer.
    pub fn record_response(
        &mut self,
        question: &str,
        answer: &str,
        extracted_value: Option<String>,
    ) -> QuestionId {
        let id = QuestionId::from_question(question);
        self.responses.insert(
            id.clone(),
            ResponseRecord {
                question: question.to_string(),
                answer: answer.to_string(),
                extracted_value,
            },
        );
        self.input_sequence += 1;
        id
    }

    pub fn mark_contact_collected(&mut self) {
        self.contact_info_collected = true;
    }

    /// Store a verdict. A disqualifying verdict also sets the flag and its source.
    pub fn record_verdict(&mut self, verdict: Verdict, source: DisqualificationSource) {
        if verdict.disqualified {
            self.disqualified = true;
            self.disqualification_source = Some(source);
        }
        self.disqualification_reason = Some(verdict);
    }

    pub fn set_case_priority(&mut self, score: PriorityScore) {
        self.case_priority = Some(score);
    }

    pub fn set_closing_message(&mut self, message: impl Into<String>) {
        self.closing_message = Some(message.into());
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Reset everything except the id; the session returns to the welcome stage
    pub fn clear(&mut self) {
        let id = std::mem::take(&mut self.id);
        *self = Self::with_id(id);
    }
}

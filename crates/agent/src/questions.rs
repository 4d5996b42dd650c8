//! Next-question selection
//!
//! Contact details and the incident narrative are asked from the script;
//! everything after that comes from the model.

use serde::Serialize;
use std::sync::Arc;

use intake_config::constants::thresholds;
use intake_config::{prompts, CallBudget, DateContext, IntakeScript};
use intake_core::{
    responses_json, ChatPurpose, ChatRequest, LanguageModel, Responses,
};

use crate::outcome::{Notice, NoticeKind};
use crate::session::IntakeSession;

/// Which contact details have a plausible stored answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContactStatus {
    pub name: bool,
    pub phone: bool,
    pub email: bool,
}

impl ContactStatus {
    /// Scan stored answers by question wording
    pub fn from_responses(responses: &Responses) -> Self {
        let mut status = Self::default();
        for record in responses.values() {
            let question = record.question.to_lowercase();
            let answer = record.answer.as_str();

            if question.contains("name") && answer.chars().count() > thresholds::MIN_NAME_CHARS {
                status.name = true;
            }
            if question.contains("phone") && answer.chars().count() > thresholds::MIN_PHONE_CHARS {
                status.phone = true;
            }
            if question.contains("email") && answer.contains('@') {
                status.email = true;
            }
        }
        status
    }

    pub fn is_complete(&self) -> bool {
        self.name && self.phone && self.email
    }
}

pub struct QuestionGenerator {
    model: Arc<dyn LanguageModel>,
    budget: CallBudget,
    script: IntakeScript,
    specialties: Vec<String>,
}

impl QuestionGenerator {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        budget: CallBudget,
        script: IntakeScript,
        specialties: Vec<String>,
    ) -> Self {
        Self {
            model,
            budget,
            script,
            specialties,
        }
    }

    /// The fixed question due next, if the session is still on the script.
    ///
    /// Once contact details are marked collected the ladder is never re-entered.
    pub fn scripted_question(&self, session: &IntakeSession) -> Option<&str> {
        let responses = session.responses();
        let status = if session.contact_info_collected() {
            ContactStatus {
                name: true,
                phone: true,
                email: true,
            }
        } else {
            ContactStatus::from_responses(responses)
        };
        if !status.name {
            Some(self.script.name_question.as_str())
        } else if !status.phone {
            Some(self.script.phone_question.as_str())
        } else if !status.email {
            Some(self.script.email_question.as_str())
        } else if responses.len() == thresholds::CONTACT_FIELD_COUNT {
            Some(self.script.incident_question.as_str())
        } else {
            None
        }
    }

    pub async fn next_question(
        &self,
        session: &IntakeSession,
        date: &DateContext,
    ) -> (String, Option<Notice>) {
        if let Some(question) = self.scripted_question(session) {
            return (question.to_string(), None);
        }

        let history = session.visible_transcript().map(|m| m.to_chat()).collect();
        let request = ChatRequest::new(
            ChatPurpose::QuestionGeneration,
            prompts::question_prompt(date, &self.specialties, &responses_json(session.responses())),
        )
        .with_messages(history)
        .with_temperature(self.budget.temperature)
        .with_max_tokens(self.budget.max_tokens);

        match self.model.chat(request).await {
            Ok(question) => (question.trim().to_string(), None),
            Err(e) => {
                tracing::warn!(session_id = %session.id(), error = %e, "question generation failed");
                (
                    self.script.question_fallback.clone(),
                    Some(Notice::new(
                        NoticeKind::Question,
                        format!("Error generating question: {e}"),
                    )),
                )
            }
        }
    }
}

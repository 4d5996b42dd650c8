//! Closing messages for the results stage
//!
//! A declined case gets an empathetic explanation with next steps; a
//! qualified case gets a summary with the staff response window. Neither
//! mentions scores or compensation.

use std::sync::Arc;

use intake_config::{prompts, CallBudget, DateContext, IntakeScript};
use intake_core::{ChatPurpose, ChatRequest, LanguageModel, PriorityScore, Verdict};

use crate::outcome::{Notice, NoticeKind};
use crate::session::IntakeSession;

pub struct ClosingWriter {
    model: Arc<dyn LanguageModel>,
    budget: CallBudget,
    script: IntakeScript,
}

impl ClosingWriter {
    pub fn new(model: Arc<dyn LanguageModel>, budget: CallBudget, script: IntakeScript) -> Self {
        Self {
            model,
            budget,
            script,
        }
    }

    pub async fn disqualification_message(
        &self,
        session: &IntakeSession,
        verdict: &Verdict,
        date: &DateContext,
    ) -> (String, Option<Notice>) {
        let system = prompts::disqualification_message_prompt(
            date,
            verdict.disqualifier_type.as_str(),
            &verdict.reason,
        );
        self.write(session, system, || self.script.disqualified_fallback.clone())
            .await
    }

    pub async fn qualification_summary(
        &self,
        session: &IntakeSession,
        priority: &PriorityScore,
        date: &DateContext,
    ) -> (String, Option<Notice>) {
        let window = priority.priority_level.response_window();
        let system = prompts::qualification_summary_prompt(date, window, &priority.suggested_action);
        self.write(session, system, || self.script.qualified_fallback_for(window))
            .await
    }

    async fn write(
        &self,
        session: &IntakeSession,
        system: String,
        fallback: impl FnOnce() -> String,
    ) -> (String, Option<Notice>) {
        let history = session.visible_transcript().map(|m| m.to_chat()).collect();
        let request = ChatRequest::new(ChatPurpose::ClosingMessage, system)
            .with_messages(history)
            .with_temperature(self.budget.temperature)
            .with_max_tokens(self.budget.max_tokens);

        match self.model.chat(request).await {
            Ok(text) if !text.trim().is_empty() => (text.trim().to_string(), None),
            Ok(_) => {
                tracing::warn!(session_id = %session.id(), "closing message was empty");
                (
                    fallback(),
                    Some(Notice::new(NoticeKind::Closing, "Closing message was empty")),
                )
            }
            Err(e) => {
                tracing::warn!(session_id = %session.id(), error = %e, "closing message failed");
                (
                    fallback(),
                    Some(Notice::new(
                        NoticeKind::Closing,
                        format!("Error generating closing message: {e}"),
                    )),
                )
            }
        }
    }
}

//! Case priority assessment
//!
//! Scores injury, liability, damages and documentation, matches the case
//! against the firm's practice areas and assigns a tier. An `UNLIKELY` tier
//! is acted on by the controller, not here.

use std::sync::Arc;

use intake_config::{prompts, CallBudget, DateContext};
use intake_core::{
    responses_json, ChatPurpose, ChatRequest, LanguageModel, PriorityScore, Responses,
};
use intake_llm::decode_json_object;

use crate::outcome::{Notice, NoticeKind};
use crate::policy;

pub struct PriorityAssessor {
    model: Arc<dyn LanguageModel>,
    budget: CallBudget,
    specialties: Vec<String>,
}

impl PriorityAssessor {
    pub fn new(model: Arc<dyn LanguageModel>, budget: CallBudget, specialties: Vec<String>) -> Self {
        Self {
            model,
            budget,
            specialties,
        }
    }

    pub async fn assess(
        &self,
        responses: &Responses,
        date: &DateContext,
    ) -> (PriorityScore, Option<Notice>) {
        let request = ChatRequest::new(
            ChatPurpose::Priority,
            prompts::priority_prompt(date, &self.specialties, &responses_json(responses)),
        )
        .with_temperature(self.budget.temperature)
        .with_max_tokens(self.budget.max_tokens);

        let reply = match self.model.chat(request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "priority assessment call failed");
                return (
                    policy::priority_unavailable(),
                    Some(Notice::new(
                        NoticeKind::Priority,
                        format!("Error assessing case priority: {e}"),
                    )),
                );
            }
        };

        match decode_json_object::<PriorityScore>(&reply) {
            Ok(score) => {
                tracing::info!(
                    priority = %score.priority_level,
                    total_score = score.total_score,
                    case_type = %score.case_type,
                    "priority assessment finished"
                );
                (score, None)
            }
            Err(failure) => {
                tracing::warn!(%failure, "priority reply could not be decoded");
                (
                    policy::priority_unavailable(),
                    Some(Notice::new(
                        NoticeKind::Priority,
                        format!("Error parsing priority response: {failure}"),
                    )),
                )
            }
        }
    }
}

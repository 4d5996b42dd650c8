//! Disqualification screening
//!
//! Five rules, judged by the model: workers' comp, existing representation,
//! statute of limitations (relative to today), jurisdiction, and no liable
//! party or negligible damages.

use std::sync::Arc;

use intake_config::{prompts, CallBudget, DateContext};
use intake_core::{responses_json, ChatPurpose, ChatRequest, LanguageModel, Responses, Verdict};
use intake_llm::decode_json_object;

use crate::outcome::{Notice, NoticeKind};
use crate::policy;

pub struct DisqualificationEvaluator {
    model: Arc<dyn LanguageModel>,
    budget: CallBudget,
}

impl DisqualificationEvaluator {
    pub fn new(model: Arc<dyn LanguageModel>, budget: CallBudget) -> Self {
        Self { model, budget }
    }

    pub async fn evaluate(
        &self,
        responses: &Responses,
        date: &DateContext,
    ) -> (Verdict, Option<Notice>) {
        let request = ChatRequest::new(
            ChatPurpose::Disqualification,
            prompts::disqualification_prompt(date, &responses_json(responses)),
        )
        .with_temperature(self.budget.temperature)
        .with_max_tokens(self.budget.max_tokens);

        let reply = match self.model.chat(request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "disqualification screening call failed");
                return (
                    policy::screening_call_failed(),
                    Some(Notice::new(
                        NoticeKind::Disqualification,
                        format!("Error checking disqualification: {e}"),
                    )),
                );
            }
        };

        match decode_json_object::<Verdict>(&reply) {
            Ok(verdict) => {
                tracing::info!(
                    disqualified = verdict.disqualified,
                    disqualifier_type = verdict.disqualifier_type.as_str(),
                    responses = responses.len(),
                    "disqualification screening finished"
                );
                (verdict, None)
            }
            Err(failure) => {
                tracing::warn!(%failure, "disqualification reply could not be decoded");
                (
                    policy::screening_unparseable(),
                    Some(Notice::new(
                        NoticeKind::Disqualification,
                        format!("Error parsing disqualification response: {failure}"),
                    )),
                )
            }
        }
    }
}

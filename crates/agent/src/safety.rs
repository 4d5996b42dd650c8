//! Content safety filter
//!
//! Runs before anything else touches a submission. Known prompt-injection
//! phrases are matched locally and win outright; everything else goes to the
//! moderation classifier. A moderation outage fails open.

use std::sync::Arc;

use intake_config::SafetyConfig;
use intake_core::{ModerationService, SafetyCheck};

use crate::outcome::{Notice, NoticeKind};
use crate::policy;

/// Category reported for injection phrase matches
pub const PROMPT_INJECTION: &str = "prompt_injection";

pub struct ContentSafetyFilter {
    moderation: Arc<dyn ModerationService>,
    /// Lowercased
    phrases: Vec<String>,
}

impl ContentSafetyFilter {
    pub fn new(moderation: Arc<dyn ModerationService>, config: &SafetyConfig) -> Self {
        Self {
            moderation,
            phrases: config
                .injection_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Case-insensitive substring match against the injection list
    pub fn matches_injection(&self, input: &str) -> bool {
        let lowered = input.to_lowercase();
        self.phrases.iter().any(|p| lowered.contains(p.as_str()))
    }

    pub async fn check(&self, input: &str) -> (SafetyCheck, Option<Notice>) {
        if self.matches_injection(input) {
            tracing::info!("input matched a prompt-injection phrase");
            return (SafetyCheck::flagged(vec![PROMPT_INJECTION.to_string()]), None);
        }

        match self.moderation.moderate(input).await {
            Ok(result) if result.flagged => {
                let categories = result.flagged_categories();
                tracing::info!(categories = ?categories, "input flagged by moderation");
                (SafetyCheck::flagged(categories), None)
            }
            Ok(_) => (SafetyCheck::safe(), None),
            Err(e) => {
                tracing::warn!(error = %e, "moderation unavailable, treating input as safe");
                (
                    policy::moderation_unavailable(),
                    Some(Notice::new(
                        NoticeKind::Moderation,
                        format!("Error in content moderation: {e}"),
                    )),
                )
            }
        }
    }
}

/// System transcript note for a rejected input
pub fn rejection_note(categories: &[String]) -> String {
    format!(
        "Input was flagged for safety concerns: [{}]",
        categories.join(", ")
    )
}

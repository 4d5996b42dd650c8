//! Information sufficiency
//!
//! Decides when enough has been gathered to stop asking questions and score
//! the case. The controller only sees [`SufficiencyStrategy`]; the keyword
//! policy below is the default implementation.

use serde::Serialize;

use intake_config::SufficiencyConfig;

use crate::session::IntakeSession;

/// Result of one sufficiency check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SufficiencyReport {
    pub contact_info_collected: bool,
    pub responses: usize,
    /// Topic categories found in the transcript. Empty when an earlier gate failed.
    pub matched_categories: Vec<String>,
    pub ready: bool,
}

impl SufficiencyReport {
    pub fn is_sufficient(&self) -> bool {
        self.ready
    }
}

/// Pluggable "do we know enough" policy
pub trait SufficiencyStrategy: Send + Sync {
    fn assess(&self, session: &IntakeSession) -> SufficiencyReport;
}

/// Keyword coverage over the whole transcript.
///
/// Gates, in order: contact details collected, enough stored answers, then
/// at least `min_categories` topic groups with a term present in the
/// case-folded transcript.
pub struct KeywordSufficiency {
    config: SufficiencyConfig,
}

impl KeywordSufficiency {
    pub fn new(mut config: SufficiencyConfig) -> Self {
        for category in &mut config.categories {
            for term in &mut category.terms {
                *term = term.to_lowercase();
            }
        }
        Self { config }
    }

    /// Names of categories with at least one term in `text` (already case-folded)
    pub fn matched_categories(&self, text: &str) -> Vec<String> {
        self.config
            .categories
            .iter()
            .filter(|c| c.terms.iter().any(|t| text.contains(t.as_str())))
            .map(|c| c.name.clone())
            .collect()
    }
}

impl Default for KeywordSufficiency {
    fn default() -> Self {
        Self::new(SufficiencyConfig::default())
    }
}

impl SufficiencyStrategy for KeywordSufficiency {
    fn assess(&self, session: &IntakeSession) -> SufficiencyReport {
        let mut report = SufficiencyReport {
            contact_info_collected: session.contact_info_collected(),
            responses: session.response_count(),
            matched_categories: Vec::new(),
            ready: false,
        };

        if !report.contact_info_collected || report.responses < self.config.min_responses {
            return report;
        }

        let blob = session
            .transcript()
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        report.matched_categories = self.matched_categories(&blob);
        report.ready = report.matched_categories.len() >= self.config.min_categories;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::Role;

    fn session_with(responses: usize, contact: bool, text: &str) -> IntakeSession {
        let mut session = IntakeSession::with_id("s");
        for i in 0..responses {
            session.record_response(&format!("Question {i}"), "answer", None);
        }
        if contact {
            session.mark_contact_collected();
        }
        session.push_message(Role::User, text);
        session
    }

    #[test]
    fn test_matched_categories_case_folded() {
        let policy = KeywordSufficiency::default();
        let matched = policy.matched_categories("the accident left me in pain");
        assert_eq!(matched, vec!["incident", "injury"]);
    }

    #[test]
    fn test_contact_gate_skips_keyword_scan() {
        let policy = KeywordSufficiency::default();
        let session = session_with(20, false, "accident when pain doctor fault witness");
        let report = policy.assess(&session);
        assert!(!report.is_sufficient());
        assert!(report.matched_categories.is_empty());
    }

    #[test]
    fn test_nine_answers_not_ready_despite_full_coverage() {
        let policy = KeywordSufficiency::default();
        let text = "accident last month, broken arm, saw a doctor, driver at fault, one witness";
        let report = policy.assess(&session_with(9, true, text));
        assert!(!report.is_sufficient());
        assert!(report.matched_categories.is_empty());

        let report = policy.assess(&session_with(10, true, text));
        assert_eq!(report.matched_categories.len(), 6);
        assert!(report.is_sufficient());
    }

    #[test]
    fn test_exactly_min_categories_is_ready() {
        let policy = KeywordSufficiency::default();
        let session = session_with(10, true, "The ACCIDENT was last month; my back pain needed a Doctor.");
        let report = policy.assess(&session);
        assert_eq!(report.matched_categories, vec!["incident", "timeline", "injury", "medical"]);
        assert!(report.is_sufficient());
    }

    #[test]
    fn test_three_categories_not_ready() {
        let policy = KeywordSufficiency::default();
        let session = session_with(12, true, "accident, pain, doctor");
        assert!(!policy.assess(&session).is_sufficient());
    }
}

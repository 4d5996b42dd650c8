//! Named fail-open defaults
//!
//! Each component degrades to one of these values when its external call
//! fails or its reply cannot be decoded. The session always continues.

use intake_core::{DisqualifierType, PriorityScore, SafetyCheck, Verdict};

/// Reason stored when the screening call itself fails
pub const SCREENING_ERROR_REASON: &str = "Error in assessment";

/// Reason stored when the screening reply cannot be decoded
pub const SCREENING_UNPARSEABLE_REASON: &str = "Unable to assess";

/// Reason stored when the priority tier is `UNLIKELY`
pub const LOW_PRIORITY_REASON: &str =
    "Case appears to have insufficient severity/liability/documentation.";

/// Moderation unavailable: treat input as safe
pub fn moderation_unavailable() -> SafetyCheck {
    SafetyCheck::safe()
}

pub fn screening_call_failed() -> Verdict {
    Verdict::cleared(SCREENING_ERROR_REASON)
}

pub fn screening_unparseable() -> Verdict {
    Verdict::cleared(SCREENING_UNPARSEABLE_REASON)
}

/// `{UNKNOWN, 0}`
pub fn priority_unavailable() -> PriorityScore {
    PriorityScore::unknown()
}

/// Implicit disqualification for an `UNLIKELY` priority tier
pub fn low_priority_verdict() -> Verdict {
    Verdict::disqualify(DisqualifierType::MinimalCase, LOW_PRIORITY_REASON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::PriorityLevel;

    #[test]
    fn test_defaults_never_disqualify() {
        assert!(moderation_unavailable().safe);
        assert!(!screening_call_failed().disqualified);
        assert!(!screening_unparseable().disqualified);
        assert_eq!(screening_call_failed().disqualifier_type, DisqualifierType::None);
    }

    #[test]
    fn test_priority_default() {
        let score = priority_unavailable();
        assert_eq!(score.priority_level, PriorityLevel::Unknown);
        assert_eq!(score.total_score, 0);
    }

    #[test]
    fn test_low_priority_verdict() {
        let verdict = low_priority_verdict();
        assert!(verdict.disqualified);
        assert_eq!(verdict.disqualifier_type, DisqualifierType::MinimalCase);
        assert_eq!(verdict.reason, LOW_PRIORITY_REASON);
    }
}

//! Centralized constants for the intake agent
//!
//! Single source of truth for thresholds and defaults. Anything an operator
//! may want to tune is also exposed through [`crate::Settings`]; these values
//! are the defaults those settings start from.

/// Pipeline thresholds
pub mod thresholds {
    /// Stored answers required before the sufficiency check can pass
    pub const MIN_RESPONSES_FOR_ASSESSMENT: usize = 10;

    /// Topic categories (out of six) the transcript must touch
    pub const MIN_TOPIC_CATEGORIES: usize = 4;

    /// Stored answers at which disqualification screening starts
    pub const DISQUALIFICATION_CHECK_AFTER: usize = 8;

    /// Name, phone, email
    pub const CONTACT_FIELD_COUNT: usize = 3;

    /// A name answer must be longer than this
    pub const MIN_NAME_CHARS: usize = 2;

    /// A phone answer must be longer than this
    pub const MIN_PHONE_CHARS: usize = 9;
}

/// Model defaults
pub mod models {
    pub const DEFAULT_CHAT_MODEL: &str = "gpt-4.1-mini";

    pub const DEFAULT_MODERATION_MODEL: &str = "omni-moderation-latest";
}

/// Per-call sampling budgets
pub mod budgets {
    pub const QUESTION_TEMPERATURE: f32 = 0.7;
    pub const QUESTION_MAX_TOKENS: u32 = 1000;

    pub const EXTRACTION_TEMPERATURE: f32 = 0.3;
    pub const EXTRACTION_MAX_TOKENS: u32 = 200;

    pub const DISQUALIFICATION_TEMPERATURE: f32 = 0.3;
    pub const DISQUALIFICATION_MAX_TOKENS: u32 = 500;

    pub const PRIORITY_TEMPERATURE: f32 = 0.3;
    pub const PRIORITY_MAX_TOKENS: u32 = 800;

    pub const CLOSING_TEMPERATURE: f32 = 0.7;
    pub const CLOSING_MAX_TOKENS: u32 = 1000;
}

/// Service endpoints
pub mod endpoints {
    /// OpenAI API base (chat completions and moderations live under it)
    pub const OPENAI_DEFAULT: &str = "https://api.openai.com/v1";

    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8080;
}

/// Timeouts and lifetimes
pub mod timeouts {
    /// LLM request timeout (ms)
    pub const LLM_REQUEST_MS: u64 = 60_000;

    /// Sessions idle longer than this are dropped (seconds)
    pub const SESSION_IDLE_SECS: u64 = 3_600;

    /// How often the registry is swept (seconds)
    pub const SESSION_SWEEP_SECS: u64 = 60;
}

/// Environment
pub mod env {
    /// Prefix for settings overrides, e.g. `INTAKE_LLM__MODEL`
    pub const PREFIX: &str = "INTAKE";

    /// Path of an optional YAML settings file
    pub const CONFIG_PATH: &str = "INTAKE_CONFIG";

    /// API key fallback when `llm.api_key` is unset
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screening_starts_before_assessment() {
        assert!(thresholds::DISQUALIFICATION_CHECK_AFTER < thresholds::MIN_RESPONSES_FOR_ASSESSMENT);
    }

    #[test]
    fn test_contact_fields_fit_before_screening() {
        assert!(thresholds::CONTACT_FIELD_COUNT < thresholds::DISQUALIFICATION_CHECK_AFTER);
    }

    #[test]
    fn test_scoring_calls_are_cooler_than_conversation() {
        assert!(budgets::PRIORITY_TEMPERATURE < budgets::QUESTION_TEMPERATURE);
        assert!(budgets::EXTRACTION_TEMPERATURE < budgets::QUESTION_TEMPERATURE);
    }
}

//! Intake script configuration
//!
//! Fixed wording the pipeline uses verbatim (opening questions, fallbacks),
//! the prompt-injection phrase list, the sufficiency topic keyword groups,
//! and the firm's practice areas. All of it can be overridden from the
//! settings file; the defaults reproduce the firm's standard script.

use serde::{Deserialize, Serialize};

use crate::constants::thresholds;

/// Verbatim texts used by the intake flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeScript {
    /// First assistant line when intake starts
    pub welcome: String,
    pub name_question: String,
    pub phone_question: String,
    pub email_question: String,
    /// Open narrative asked right after contact details
    pub incident_question: String,
    /// Shown when an input is rejected by the safety screen
    pub safety_rejection: String,
    /// Asked when the model fails to produce a question
    pub question_fallback: String,
    /// Closing text when a disqualification message cannot be generated
    pub disqualified_fallback: String,
    /// Closing text when a summary cannot be generated; `{window}` is replaced
    pub qualified_fallback: String,
    /// Welcome page disclaimer, one bullet per entry
    pub disclaimer: Vec<String>,
}

impl Default for IntakeScript {
    fn default() -> Self {
        Self {
            welcome: "Hi there! I'm here to help evaluate your potential personal injury case. \
                      I'll start with a few contact details."
                .to_string(),
            name_question: "What is your full name?".to_string(),
            phone_question: "What is the best phone number to reach you at?".to_string(),
            email_question: "What is your email address?".to_string(),
            incident_question: "Please describe what happened in the incident. Include any details \
                                about when and where it occurred, how it happened, and any injuries \
                                you experienced."
                .to_string(),
            safety_rejection: "We apologize, but your message contains content that our system \
                               cannot process. Please rephrase your message without any \
                               inappropriate content or attempts to override the system."
                .to_string(),
            question_fallback: "I'm sorry, I encountered an error processing your request."
                .to_string(),
            disqualified_fallback: "Thank you for reaching out to us. Based on the information \
                                    provided, we may not be able to assist with your case. Please \
                                    call our office during business hours if you have questions."
                .to_string(),
            qualified_fallback: "Thank you for providing your information. A member of our legal \
                                 staff will review your information and contact you {window}. You \
                                 will receive a secure link to upload relevant documents and a copy \
                                 of our agreement."
                .to_string(),
            disclaimer: vec![
                "You consent to the use of artificial intelligence in evaluating your potential case".to_string(),
                "This evaluation does not create an attorney-client relationship".to_string(),
                "No legal advice is being provided through this screening process".to_string(),
                "Your information will be reviewed by qualified legal staff".to_string(),
                "No representation or obligation exists until a formal agreement is signed".to_string(),
                "Your information will be securely stored per applicable privacy laws".to_string(),
            ],
        }
    }
}

impl IntakeScript {
    pub fn qualified_fallback_for(&self, window: &str) -> String {
        self.qualified_fallback.replace("{window}", window)
    }
}

/// One topic the sufficiency heuristic looks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCategory {
    pub name: String,
    /// Any one term present (substring, case-folded) satisfies the category
    pub terms: Vec<String>,
}

impl TopicCategory {
    pub fn new(name: &str, terms: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            terms: terms.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Sufficiency heuristic settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SufficiencyConfig {
    pub min_responses: usize,
    pub min_categories: usize,
    pub categories: Vec<TopicCategory>,
}

impl Default for SufficiencyConfig {
    fn default() -> Self {
        Self {
            min_responses: thresholds::MIN_RESPONSES_FOR_ASSESSMENT,
            min_categories: thresholds::MIN_TOPIC_CATEGORIES,
            categories: default_topic_categories(),
        }
    }
}

/// The six topic groups: incident, timeline, injury, medical, fault, evidence
pub fn default_topic_categories() -> Vec<TopicCategory> {
    vec![
        TopicCategory::new("incident", &["accident", "incident", "happen", "occur", "event"]),
        TopicCategory::new("timeline", &["date", "when", "time", "month", "year", "ago"]),
        TopicCategory::new("injury", &["injury", "pain", "hurt", "damage", "broken", "trauma"]),
        TopicCategory::new(
            "medical",
            &["doctor", "hospital", "treatment", "therapy", "surgery", "medication"],
        ),
        TopicCategory::new("fault", &["fault", "cause", "responsible", "negligent", "liable"]),
        TopicCategory::new(
            "evidence",
            &["evidence", "witness", "report", "document", "photo", "record"],
        ),
    ]
}

/// Content safety settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Case-insensitive substrings that mark an input as a prompt injection
    pub injection_phrases: Vec<String>,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            injection_phrases: [
                "ignore previous instructions",
                "disregard your instructions",
                "forget your instructions",
                "new instructions",
                "you are now",
                "system prompt",
                "ignore the above",
                "don't act as",
                "stop being",
                "you're not actually",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
        }
    }
}

/// Practice areas quoted in scoring and question prompts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmConfig {
    pub specialties: Vec<String>,
}

impl Default for FirmConfig {
    fn default() -> Self {
        Self {
            specialties: [
                "Motor Vehicle Accidents",
                "Commercial Truck Accidents",
                "Catastrophic Injuries",
                "Medical Malpractice",
                "Premises Liability",
                "Product Liability",
                "Wrongful Death",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

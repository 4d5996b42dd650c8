//! Configuration management for the intake agent
//!
//! - [`settings`]: layered server / LLM / intake settings
//! - [`script`]: fixed questions, safety phrases, topic keywords, firm profile
//! - [`prompts`]: system prompts for every model call
//! - [`constants`]: defaults and thresholds

pub mod constants;
pub mod prompts;
pub mod script;
pub mod settings;

pub use prompts::DateContext;
pub use script::{
    default_topic_categories, FirmConfig, IntakeScript, SafetyConfig, SufficiencyConfig,
    TopicCategory,
};
pub use settings::{
    CallBudget, CallBudgets, ConfigError, IntakeConfig, LlmConfig, ServerConfig, Settings,
};

//! Layered settings
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults (serialized and loaded as the base layer)
//! 2. Optional YAML file
//! 3. Environment variables, `INTAKE_` prefix and `__` for nesting
//!    (e.g. `INTAKE_LLM__MODEL=gpt-4.1`, `INTAKE_SERVER__PORT=9000`)
//!
//! `llm.api_key` falls back to `OPENAI_API_KEY` when unset.

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{budgets, endpoints, env, models, thresholds, timeouts};
use crate::script::{FirmConfig, IntakeScript, SafetyConfig, SufficiencyConfig};

/// Errors while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to serialize default settings: {0}")]
    Defaults(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Root settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub intake: IntakeConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Token required for the internal case-data view. Unset disables the view.
    pub staff_token: Option<String>,
    pub session_idle_secs: u64,
    pub session_sweep_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: endpoints::DEFAULT_HOST.to_string(),
            port: endpoints::DEFAULT_PORT,
            log_json: false,
            staff_token: None,
            session_idle_secs: timeouts::SESSION_IDLE_SECS,
            session_sweep_secs: timeouts::SESSION_SWEEP_SECS,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Sampling budget for one kind of call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallBudget {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CallBudget {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// Budgets per pipeline call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallBudgets {
    pub question: CallBudget,
    pub extraction: CallBudget,
    pub disqualification: CallBudget,
    pub priority: CallBudget,
    pub closing: CallBudget,
}

impl Default for CallBudgets {
    fn default() -> Self {
        Self {
            question: CallBudget::new(budgets::QUESTION_TEMPERATURE, budgets::QUESTION_MAX_TOKENS),
            extraction: CallBudget::new(
                budgets::EXTRACTION_TEMPERATURE,
                budgets::EXTRACTION_MAX_TOKENS,
            ),
            disqualification: CallBudget::new(
                budgets::DISQUALIFICATION_TEMPERATURE,
                budgets::DISQUALIFICATION_MAX_TOKENS,
            ),
            priority: CallBudget::new(budgets::PRIORITY_TEMPERATURE, budgets::PRIORITY_MAX_TOKENS),
            closing: CallBudget::new(budgets::CLOSING_TEMPERATURE, budgets::CLOSING_MAX_TOKENS),
        }
    }
}

/// LLM provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API base
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub moderation_model: String,
    pub request_timeout_ms: u64,
    pub budgets: CallBudgets,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: endpoints::OPENAI_DEFAULT.to_string(),
            api_key: None,
            model: models::DEFAULT_CHAT_MODEL.to_string(),
            moderation_model: models::DEFAULT_MODERATION_MODEL.to_string(),
            request_timeout_ms: timeouts::LLM_REQUEST_MS,
            budgets: CallBudgets::default(),
        }
    }
}

/// Intake pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Stored answers at which disqualification screening starts
    pub disqualification_threshold: usize,
    pub sufficiency: SufficiencyConfig,
    pub safety: SafetyConfig,
    pub firm: FirmConfig,
    pub script: IntakeScript,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            disqualification_threshold: thresholds::DISQUALIFICATION_CHECK_AFTER,
            sufficiency: SufficiencyConfig::default(),
            safety: SafetyConfig::default(),
            firm: FirmConfig::default(),
            script: IntakeScript::default(),
        }
    }
}

impl Settings {
    /// Load defaults, then `path` (if any), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = serde_json::to_string(&Settings::default())?;
        let mut builder =
            Config::builder().add_source(File::from_str(&defaults, FileFormat::Json));

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml));
        }

        builder = builder.add_source(
            Environment::with_prefix(env::PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut settings: Settings = builder.build()?.try_deserialize()?;

        if settings.llm.api_key.as_deref().map_or(true, str::is_empty) {
            settings.llm.api_key = std::env::var(env::OPENAI_API_KEY)
                .ok()
                .filter(|k| !k.is_empty());
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Load using the path in `INTAKE_CONFIG`, if set
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(env::CONFIG_PATH).ok().map(PathBuf::from);
        Self::load(path.as_deref())
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sufficiency = &self.intake.sufficiency;

        if sufficiency.categories.is_empty() {
            return Err(ConfigError::Invalid(
                "intake.sufficiency.categories must not be empty".into(),
            ));
        }
        if let Some(empty) = sufficiency.categories.iter().find(|c| c.terms.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "topic category '{}' has no terms",
                empty.name
            )));
        }
        if sufficiency.min_categories == 0 || sufficiency.min_categories > sufficiency.categories.len() {
            return Err(ConfigError::Invalid(format!(
                "intake.sufficiency.min_categories must be between 1 and {}",
                sufficiency.categories.len()
            )));
        }
        if sufficiency.min_responses == 0 {
            return Err(ConfigError::Invalid(
                "intake.sufficiency.min_responses must be positive".into(),
            ));
        }
        if self.intake.disqualification_threshold == 0 {
            return Err(ConfigError::Invalid(
                "intake.disqualification_threshold must be positive".into(),
            ));
        }
        if self.llm.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("llm.request_timeout_ms must be positive".into()));
        }

        let script = &self.intake.script;
        for (field, text, needle) in [
            ("name_question", &script.name_question, "name"),
            ("phone_question", &script.phone_question, "phone"),
            ("email_question", &script.email_question, "email"),
        ] {
            if !text.to_lowercase().contains(needle) {
                return Err(ConfigError::Invalid(format!(
                    "intake.script.{field} must mention '{needle}' so answers can be recognised"
                )));
            }
        }

        Ok(())
    }
}

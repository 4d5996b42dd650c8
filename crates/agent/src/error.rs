//! Agent errors
//!
//! Only state errors surface here. Model and moderation failures are absorbed
//! by each component's fail-open policy and reported as notices instead.

use intake_core::Stage;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("cannot {action} while the session is in the {stage} stage")]
    InvalidStage { action: &'static str, stage: Stage },

    #[error("stage transition {from} -> {to} is not allowed")]
    InvalidTransition { from: Stage, to: Stage },
}

pub type Result<T> = std::result::Result<T, AgentError>;

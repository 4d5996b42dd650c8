//! Core traits and types for the intake agent
//!
//! - [`domain`]: stage, transcript, answers, verdicts and priority scores
//! - [`traits`]: the chat model and moderation service seams
//! - [`error`]: failures of those external services

pub mod domain;
pub mod error;
pub mod traits;

pub use domain::*;
pub use error::LlmError;
pub use traits::*;

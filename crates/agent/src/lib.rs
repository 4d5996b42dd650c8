//! Intake conversation pipeline
//!
//! Components, leaves first:
//! - [`safety`]: injection phrases and moderation screen
//! - [`extractor`]: normalize one answer into one value
//! - [`sufficiency`]: "enough information" strategy
//! - [`disqualification`] / [`priority`]: model-judged screening and scoring
//! - [`questions`]: scripted ladder, then model-generated questions
//! - [`closing`]: results-stage messages
//! - [`controller`]: stage machine and per-turn pipeline
//!
//! [`session`] holds the per-visitor record and [`view`] projects it for
//! display. Every external failure degrades to a default from [`policy`].

pub mod closing;
pub mod controller;
pub mod disqualification;
pub mod error;
pub mod extractor;
pub mod outcome;
pub mod policy;
pub mod priority;
pub mod questions;
pub mod safety;
pub mod session;
pub mod sufficiency;
pub mod view;

pub use controller::IntakeController;
pub use error::AgentError;
pub use extractor::{ExtractedAnswer, FallbackReason, StructuredExtractor};
pub use outcome::{Disposition, Notice, NoticeKind, TurnOutcome};
pub use questions::{ContactStatus, QuestionGenerator};
pub use safety::{ContentSafetyFilter, PROMPT_INJECTION};
pub use session::{DisqualificationSource, IntakeSession};
pub use sufficiency::{KeywordSufficiency, SufficiencyReport, SufficiencyStrategy};
pub use view::{internal_view, render, InternalCaseData, Page, SessionView};

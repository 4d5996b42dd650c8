//! Turn results and operator notices

use serde::{Deserialize, Serialize};

/// Which pipeline step degraded to its default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Moderation,
    Extraction,
    Disqualification,
    Priority,
    Question,
    Closing,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Moderation => "moderation",
            NoticeKind::Extraction => "extraction",
            NoticeKind::Disqualification => "disqualification",
            NoticeKind::Priority => "priority",
            NoticeKind::Question => "question",
            NoticeKind::Closing => "closing",
        }
    }
}

/// A failure that was absorbed by a fail-open default.
///
/// Shown to the operator as an error banner; the session carries on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// What a submission did to the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Disposition {
    /// Answer stored, next question asked
    Continued,
    /// Input failed the safety screen; nothing stored
    Rejected {
        categories: Vec<String>,
        message: String,
    },
    /// Session moved to the results stage
    Concluded { disqualified: bool },
    /// Blank input
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub disposition: Disposition,
    #[serde(default)]
    pub notices: Vec<Notice>,
}

impl TurnOutcome {
    pub fn ignored() -> Self {
        Self {
            disposition: Disposition::Ignored,
            notices: Vec::new(),
        }
    }

    pub fn is_concluded(&self) -> bool {
        matches!(self.disposition, Disposition::Concluded { .. })
    }
}

//! Read-only projections of a session
//!
//! [`render`] builds what the visitor sees; [`internal_view`] builds the
//! staff dump. Both borrow the session immutably.

use serde::Serialize;

use intake_config::IntakeScript;
use intake_core::{Message, PriorityScore, Responses, Stage, Verdict};

use crate::session::{DisqualificationSource, IntakeSession};

/// Stage-specific page content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    Welcome {
        disclaimer: Vec<String>,
    },
    Intake {
        /// Question currently awaiting an answer
        current_question: Option<String>,
    },
    Results {
        disqualified: bool,
        message: Option<String>,
    },
}

/// What the visitor sees
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub stage: Stage,
    pub transcript: Vec<Message>,
    pub input_sequence: u64,
    pub contact_info_collected: bool,
    #[serde(flatten)]
    pub page: Page,
}

pub fn render(session: &IntakeSession, script: &IntakeScript) -> SessionView {
    let page = match session.stage() {
        Stage::Welcome => Page::Welcome {
            disclaimer: script.disclaimer.clone(),
        },
        Stage::Intake => Page::Intake {
            current_question: session.last_assistant_message().map(|m| m.content.clone()),
        },
        Stage::Results => Page::Results {
            disqualified: session.is_disqualified(),
            message: session.closing_message().map(str::to_string),
        },
    };

    SessionView {
        session_id: session.id().to_string(),
        stage: session.stage(),
        transcript: session.visible_transcript().cloned().collect(),
        input_sequence: session.input_sequence(),
        contact_info_collected: session.contact_info_collected(),
        page,
    }
}

/// Staff-only case data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InternalCaseData {
    pub session_id: String,
    pub stage: Stage,
    pub responses: Responses,
    pub case_priority: Option<PriorityScore>,
    pub disqualified: bool,
    pub disqualification_reason: Option<Verdict>,
    pub disqualification_source: Option<DisqualificationSource>,
}

pub fn internal_view(session: &IntakeSession) -> InternalCaseData {
    InternalCaseData {
        session_id: session.id().to_string(),
        stage: session.stage(),
        responses: session.responses().clone(),
        case_priority: session.case_priority().cloned(),
        disqualified: session.is_disqualified(),
        disqualification_reason: session.disqualification_reason().cloned(),
        disqualification_source: session.disqualification_source(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::Role;

    #[test]
    fn test_welcome_page_has_disclaimer() {
        let session = IntakeSession::with_id("s");
        let view = render(&session, &IntakeScript::default());
        assert_eq!(view.stage, Stage::Welcome);
        match view.page {
            Page::Welcome { disclaimer } => assert_eq!(disclaimer.len(), 6),
            other => panic!("unexpected page {other:?}"),
        }
    }

    #[test]
    fn test_system_notes_hidden() {
        let mut session = IntakeSession::with_id("s");
        session.transition_to(Stage::Intake).unwrap();
        session.push_message(Role::Assistant, "What is your full name?");
        session.push_message(Role::System, "Input was flagged for safety concerns: [prompt_injection]");

        let view = render(&session, &IntakeScript::default());
        assert_eq!(view.transcript.len(), 1);
        assert_eq!(
            view.page,
            Page::Intake {
                current_question: Some("What is your full name?".into())
            }
        );
    }

    #[test]
    fn test_view_json_shape() {
        let session = IntakeSession::with_id("s");
        let json = serde_json::to_value(render(&session, &IntakeScript::default())).unwrap();
        assert_eq!(json["stage"], "welcome");
        assert_eq!(json["page"], "welcome");
        assert_eq!(json["session_id"], "s");
        assert!(json["disclaimer"].is_array());
    }

    #[test]
    fn test_internal_view_copies_case_data() {
        let mut session = IntakeSession::with_id("s");
        session.record_response("What is your full name?", "Jane Doe", Some("Jane Doe".into()));
        let data = internal_view(&session);
        assert_eq!(data.responses.len(), 1);
        assert!(data.case_priority.is_none());
        assert!(!data.disqualified);
    }
}

//! Conversation primitives: stage, transcript messages

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::traits::{ChatMessage, ChatRole};

/// Page the session is on.
///
/// ```text
/// Welcome ──start──▶ Intake ──(disqualified | sufficient)──▶ Results
///    ▲                 │ ▲ └─submit─┘                          │
///    └──────exit───────┘ └────────────restart──────────────────┤
///    └────────────────────────────exit─────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Welcome,
    Intake,
    Results,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Welcome => "welcome",
            Stage::Intake => "intake",
            Stage::Results => "results",
        }
    }

    /// Whether `self → next` is one of the allowed transitions
    pub fn can_transition_to(&self, next: Stage) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Stages reachable from this one
    pub fn allowed_transitions(&self) -> &'static [Stage] {
        match self {
            Stage::Welcome => &[Stage::Intake],
            Stage::Intake => &[Stage::Intake, Stage::Results, Stage::Welcome],
            Stage::Results => &[Stage::Intake, Stage::Welcome],
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Internal notes (safety rejections); never shown to the user
    System,
}

impl From<Role> for ChatRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => ChatRole::User,
            Role::Assistant => ChatRole::Assistant,
            Role::System => ChatRole::System,
        }
    }
}

/// One transcript entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Local wall-clock time, e.g. "03:41 PM"
    pub timestamp: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Message stamped with the current local time
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        Self::new(role, content, current_timestamp())
    }

    pub fn is_visible(&self) -> bool {
        self.role != Role::System
    }

    pub fn to_chat(&self) -> ChatMessage {
        ChatMessage::new(self.role.into(), self.content.clone())
    }
}

/// Transcript timestamp format ("%I:%M %p")
pub fn current_timestamp() -> String {
    Local::now().format("%I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_transitions() {
        assert!(Stage::Welcome.can_transition_to(Stage::Intake));
        assert!(Stage::Intake.can_transition_to(Stage::Intake));
        assert!(Stage::Intake.can_transition_to(Stage::Results));
        assert!(Stage::Results.can_transition_to(Stage::Intake));
        assert!(Stage::Results.can_transition_to(Stage::Welcome));

        assert!(!Stage::Welcome.can_transition_to(Stage::Results));
        assert!(!Stage::Welcome.can_transition_to(Stage::Welcome));
        assert!(!Stage::Results.can_transition_to(Stage::Results));
    }

    #[test]
    fn test_timestamp_format() {
        let ts = current_timestamp();
        // "hh:mm AM" / "hh:mm PM"
        assert_eq!(ts.len(), 8);
        assert!(ts.ends_with("AM") || ts.ends_with("PM"));
    }

    #[test]
    fn test_system_messages_hidden() {
        assert!(!Message::now(Role::System, "flagged").is_visible());
        assert!(Message::now(Role::User, "hi").is_visible());
    }
}

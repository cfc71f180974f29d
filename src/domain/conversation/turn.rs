//! Conversation turns.

use serde::{Deserialize, Serialize};

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One message in the coach conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    role: TurnRole,
    text: String,
}

impl ConversationTurn {
    /// Creates a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    /// Creates an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_role() {
        assert_eq!(ConversationTurn::user("hi").role(), TurnRole::User);
        assert_eq!(ConversationTurn::assistant("yo").role(), TurnRole::Assistant);
        assert_eq!(ConversationTurn::assistant("yo").text(), "yo");
    }

    #[test]
    fn turn_serializes_with_lowercase_role() {
        let json = serde_json::to_string(&ConversationTurn::user("Squat form?")).unwrap();
        assert_eq!(json, r#"{"role":"user","text":"Squat form?"}"#);
    }
}

//! Message: one turn of a session's conversation log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a session's log. Immutable once appended.
///
/// User messages never carry `reasoning`; assistant messages may.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            reasoning: None,
        }
    }

    pub fn assistant(content: impl Into<String>, reasoning: Option<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            reasoning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_never_carries_reasoning() {
        let m = Message::user("hi");
        assert_eq!(m.role, Role::User);
        assert!(m.reasoning.is_none());
    }

    #[test]
    fn assistant_message_may_carry_reasoning() {
        let m = Message::assistant("hello back", Some("because...".into()));
        assert_eq!(m.role, Role::Assistant);
        assert_eq!(m.reasoning.as_deref(), Some("because..."));
    }
}

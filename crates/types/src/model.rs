// crates/types/src/model.rs
//! Normalized shapes produced by the parse/extract pipeline and consumed by
//! the storage writer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source label recorded when a record carries none.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Message role in a conversation. Only these two roles enter the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Map a wire role string to an eligible role, or `None` for everything
    /// else (system, tool, and future roles are excluded from the stream).
    pub fn from_wire(role: &str) -> Option<Self> {
        match role {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One normalized conversational turn, ready for insertion.
///
/// `(instance, session_id, message_id)` is the idempotency key; the
/// instance and session are supplied by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub message_id: String,
    pub parent_id: Option<String>,
    pub role: Role,
    pub content: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

/// Session metadata taken from the `session` header record of a delta.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionMeta {
    pub started_at: Option<DateTime<Utc>>,
    pub model: Option<String>,
    pub source: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_from_wire_accepts_only_conversational_roles() {
        assert_eq!(Role::from_wire("user"), Some(Role::User));
        assert_eq!(Role::from_wire("assistant"), Some(Role::Assistant));
        assert_eq!(Role::from_wire("system"), None);
        assert_eq!(Role::from_wire("tool"), None);
        assert_eq!(Role::from_wire("Assistant"), None);
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::User, Role::Assistant] {
            assert_eq!(Role::from_wire(role.as_str()), Some(role));
        }
    }
}

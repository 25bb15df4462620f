//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! the live integration test catches drift between the two crates. Field
//! names follow the server's camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned todo identifier.
pub type TodoId = i64;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
}

/// Request payload for renaming a todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameTodo {
    pub title: String,
}

/// The `{success, message, data}` wrapper every API response shares.
///
/// `data` is optional because failed envelopes usually carry `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Envelope for responses whose payload the client ignores (delete, probe).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// What to do with an envelope that decodes but reports `success: false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvelopePolicy {
    /// Ignore it: no state change and no banner, only a log line. Non-2xx
    /// responses still fail, whatever their body says.
    #[default]
    Lenient,
    /// Treat it like any other failure of the operation.
    Strict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_uses_camel_case_timestamps() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":7,"title":"Walk dog","completed":false,
                "createdAt":"2024-01-02T03:04:05Z","updatedAt":"2024-01-02T03:04:06Z"}"#,
        )
        .unwrap();
        assert_eq!(todo.id, 7);
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["createdAt"], "2024-01-02T03:04:05Z");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn envelope_message_is_optional() {
        let env: Envelope<Vec<Todo>> = serde_json::from_str(r#"{"success":true,"data":[]}"#).unwrap();
        assert!(env.success);
        assert!(env.message.is_empty());
        assert_eq!(env.data, Some(Vec::new()));
    }

    #[test]
    fn envelope_tolerates_null_data() {
        let env: Envelope<Todo> = serde_json::from_str(r#"{"success":false,"message":"nope","data":null}"#).unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
    }

    #[test]
    fn ack_ignores_payload() {
        let ack: Ack = serde_json::from_str(r#"{"success":true,"message":"gone","data":{"id":1}}"#).unwrap();
        assert!(ack.success);
        assert_eq!(ack.message, "gone");
    }

    #[test]
    fn policy_defaults_to_lenient() {
        assert_eq!(EnvelopePolicy::default(), EnvelopePolicy::Lenient);
    }
}

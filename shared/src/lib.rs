use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned task identifier, treated as opaque text by the client.
///
/// Backends disagree on the wire shape: the PostgREST variant hands out
/// serial integers, the hosted variant opaque strings. Deserialization
/// accepts both; serialization always writes a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Serial(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(id) => TaskId(id),
            Raw::Serial(n) => TaskId(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub is_completed: bool,
    /// Set by the backend; carried verbatim, never computed client-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Task {
    pub fn new(id: TaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_completed: false,
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub name: String,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompletionRequest {
    pub is_completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_uses_camel_case_on_the_wire() {
        let task = Task {
            id: TaskId::new("t1"),
            name: "Buy milk".to_string(),
            is_completed: true,
            created_at: Some("2024-05-01T09:30:00Z".to_string()),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "t1",
                "name": "Buy milk",
                "isCompleted": true,
                "createdAt": "2024-05-01T09:30:00Z",
            })
        );
    }

    #[test]
    fn task_id_accepts_string_or_integer() {
        let text: Task =
            serde_json::from_str(r#"{"id":"abc","name":"a","isCompleted":false}"#).unwrap();
        assert_eq!(text.id, TaskId::new("abc"));

        let serial: Task =
            serde_json::from_str(r#"{"id":42,"name":"a","isCompleted":false}"#).unwrap();
        assert_eq!(serial.id, TaskId::new("42"));
    }

    #[test]
    fn created_at_is_optional_and_omitted_when_absent() {
        let task: Task =
            serde_json::from_str(r#"{"id":"t1","name":"a","isCompleted":false}"#).unwrap();
        assert_eq!(task.created_at, None);

        let json = serde_json::to_string(&task).unwrap();
        assert!(!json.contains("createdAt"));
    }
}

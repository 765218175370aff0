use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use super::FieldError;

/// To-do document as stored and as sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "completedAt")]
    pub completed_at: Option<i64>,
    #[serde(rename = "_creator")]
    pub creator: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub text: String,
    pub creator: Uuid,
}

impl NewTodo {
    /// Picks `text` from a create body. Every other field is ignored.
    pub fn pick(body: &Value, creator: Uuid) -> Result<Self, FieldError> {
        let text = match body.get("text") {
            Some(value) => text_field(value)?,
            None => return Err(FieldError::new("text", "Path `text` is required")),
        };
        Ok(Self { text, creator })
    }
}

/// The `$set` applied by an update. `text` is left alone when `None`;
/// `completed` and `completed_at` are always written.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoChanges {
    pub text: Option<String>,
    pub completed: bool,
    pub completed_at: Option<i64>,
}

impl TodoChanges {
    pub fn complete(now_ms: i64) -> Self {
        Self {
            text: None,
            completed: true,
            completed_at: Some(now_ms),
        }
    }
}

/// Whitelisted fields of a PATCH body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<Value>,
}

impl TodoPatch {
    pub fn pick(body: &Value) -> Result<Self, FieldError> {
        let text = match body.get("text") {
            Some(value) => Some(text_field(value)?),
            None => None,
        };
        Ok(Self {
            text,
            completed: body.get("completed").cloned(),
        })
    }

    /// Only the JSON boolean `true` completes the item; anything else,
    /// including an omitted flag, resets it.
    pub fn into_changes(self, now_ms: i64) -> TodoChanges {
        let completed = matches!(self.completed, Some(Value::Bool(true)));
        TodoChanges {
            text: self.text,
            completed,
            completed_at: completed.then_some(now_ms),
        }
    }
}

fn text_field(value: &Value) -> Result<String, FieldError> {
    let text = value
        .as_str()
        .ok_or_else(|| FieldError::new("text", "Cast to string failed"))?
        .trim();
    if text.is_empty() {
        return Err(FieldError::new("text", "Path `text` is shorter than the minimum allowed length (1)"));
    }
    Ok(text.to_string())
}

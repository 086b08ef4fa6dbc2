use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A single todo item, persisted under its own `key`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Epoch milliseconds at creation; doubles as the store key.
    pub key: u64,
    pub message: String,
    #[serde(default)]
    pub done: bool,
}

/// Request body for insert and update. The key never comes from the body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoInput {
    pub message: String,
    #[serde(default)]
    pub done: bool,
}

impl Todo {
    pub fn new(key: u64, input: TodoInput) -> Self {
        Self { key, message: input.message, done: input.done }
    }
}

/// Milliseconds since the Unix epoch, clamped to zero for clocks set before 1970.
pub fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn done_defaults_to_false_when_absent() {
        let input: TodoInput = serde_json::from_str(r#"{"message":"hello"}"#).unwrap();
        assert_eq!(input, TodoInput { message: "hello".into(), done: false });
    }

    #[test]
    fn key_in_body_is_ignored() {
        let input: TodoInput = serde_json::from_str(r#"{"key":1,"message":"m","done":true}"#).unwrap();
        let todo = Todo::new(42, input);
        assert_eq!(todo, Todo { key: 42, message: "m".into(), done: true });
    }

    #[test]
    fn serialized_shape_has_key_message_done() {
        let todo = Todo { key: 7, message: "x".into(), done: false };
        let v = serde_json::to_value(&todo).unwrap();
        assert_eq!(v, serde_json::json!({"key": 7, "message": "x", "done": false}));
    }

    #[test]
    fn now_millis_is_after_2020() {
        assert!(now_millis() > 1_577_836_800_000);
    }
}

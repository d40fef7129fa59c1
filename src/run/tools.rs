//! Tool call tracking for a single run
//!
//! ToolCallState records one tool invocation as the service reports it:
//! started with arguments, then completed with a result or an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status of a tool call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ToolCallStatus {
    /// Tool is currently running
    #[default]
    Running,
    /// Tool completed successfully
    Completed,
    /// Tool execution failed
    Failed,
}

/// State of a single tool call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallState {
    /// Id assigned by the service (falls back to the tool name)
    pub tool_call_id: String,
    /// Name of the tool being executed
    pub tool_name: String,
    /// Status of the tool call
    pub status: ToolCallStatus,
    /// Arguments provided to the tool
    pub args: Option<Value>,
    /// Output from the tool (populated on completion)
    pub result: Option<String>,
    /// Error message if the tool failed
    pub error: Option<String>,
}

impl ToolCallState {
    /// Create a new running tool call
    pub fn new(tool_call_id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            status: ToolCallStatus::Running,
            args: None,
            result: None,
            error: None,
        }
    }

    /// Read a tool object as sent inside `tool` or `tools`.
    ///
    /// Returns `None` when the object has neither an id nor a name.
    pub fn from_value(value: &Value) -> Option<Self> {
        let name = value
            .get("tool_name")
            .or_else(|| value.get("name"))
            .and_then(Value::as_str);
        let id = value
            .get("tool_call_id")
            .or_else(|| value.get("id"))
            .and_then(Value::as_str);

        let (id, name) = match (id, name) {
            (Some(id), Some(name)) => (id, name),
            (Some(id), None) => (id, "tool"),
            (None, Some(name)) => (name, name),
            (None, None) => return None,
        };

        let mut state = Self::new(id, name);
        state.args = value
            .get("tool_args")
            .or_else(|| value.get("arguments"))
            .filter(|v| !v.is_null())
            .cloned();
        state.result = value
            .get("result")
            .or_else(|| value.get("content"))
            .and_then(value_to_text);

        let failed = value
            .get("tool_call_error")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if failed {
            state.error = Some(state.result.clone().unwrap_or_else(|| "tool call failed".to_string()));
        }
        Some(state)
    }

    /// Mark as completed with output
    pub fn complete(&mut self, result: Option<String>) {
        self.status = ToolCallStatus::Completed;
        if result.is_some() {
            self.result = result;
        }
    }

    /// Mark as failed with error
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = ToolCallStatus::Failed;
        self.error = Some(error.into());
    }

    /// Check if still in progress
    pub fn is_in_progress(&self) -> bool {
        self.status == ToolCallStatus::Running
    }

    /// Short label for status lines
    pub fn display_text(&self) -> String {
        match self.status {
            ToolCallStatus::Running => format!("{}...", self.tool_name),
            ToolCallStatus::Completed => format!("{} done", self.tool_name),
            ToolCallStatus::Failed => format!(
                "{} failed: {}",
                self.tool_name,
                self.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

/// Tool results arrive as strings or as arbitrary JSON.
fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full() {
        let state = ToolCallState::from_value(&json!({
            "tool_call_id": "call_1",
            "tool_name": "duckduckgo_search",
            "tool_args": {"query": "rust"},
            "result": "3 hits"
        }))
        .unwrap();

        assert_eq!(state.tool_call_id, "call_1");
        assert_eq!(state.tool_name, "duckduckgo_search");
        assert_eq!(state.args, Some(json!({"query": "rust"})));
        assert_eq!(state.result.as_deref(), Some("3 hits"));
        assert!(state.error.is_none());
        assert!(state.is_in_progress());
    }

    #[test]
    fn test_from_value_legacy_content_field() {
        let state = ToolCallState::from_value(&json!({
            "tool_call_id": "call_2",
            "tool_name": "calc",
            "content": {"value": 4}
        }))
        .unwrap();
        assert_eq!(state.result.as_deref(), Some(r#"{"value":4}"#));
    }

    #[test]
    fn test_from_value_name_only_uses_name_as_id() {
        let state = ToolCallState::from_value(&json!({"tool_name": "clock"})).unwrap();
        assert_eq!(state.tool_call_id, "clock");
    }

    #[test]
    fn test_from_value_without_identity() {
        assert!(ToolCallState::from_value(&json!({"tool_args": {}})).is_none());
    }

    #[test]
    fn test_from_value_error_flag() {
        let state = ToolCallState::from_value(&json!({
            "tool_call_id": "c",
            "tool_name": "fetch",
            "result": "timeout",
            "tool_call_error": true
        }))
        .unwrap();
        assert_eq!(state.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_complete_and_fail() {
        let mut state = ToolCallState::new("c", "search");
        state.complete(Some("ok".to_string()));
        assert_eq!(state.status, ToolCallStatus::Completed);
        assert_eq!(state.display_text(), "search done");

        let mut state = ToolCallState::new("c", "search");
        state.fail("boom");
        assert_eq!(state.status, ToolCallStatus::Failed);
        assert_eq!(state.display_text(), "search failed: boom");
    }

    #[test]
    fn test_complete_without_result_keeps_previous() {
        let mut state = ToolCallState::new("c", "search");
        state.result = Some("partial".to_string());
        state.complete(None);
        assert_eq!(state.result.as_deref(), Some("partial"));
    }
}

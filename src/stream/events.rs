//! Stream event types and definitions
//!
//! Contains the StreamEvent record produced for every complete JSON object
//! in an agent-run stream, the known event vocabulary, and the diagnostics
//! the parser reports alongside events.

use serde::Serialize;
use serde_json::{Map, Value};

/// Known event kinds emitted by the agent service.
///
/// The vocabulary is open: anything not listed here is preserved as
/// [`EventKind::Other`] so newer services keep working with older clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Run accepted and started
    RunStarted,
    /// Partial response content (a token or a few tokens)
    RunResponseContent,
    /// Run finished successfully
    RunCompleted,
    /// Run failed on the service side
    RunError,
    /// Run cancelled before completion
    RunCancelled,
    /// A tool call began
    ToolCallStarted,
    /// A tool call finished (successfully or not)
    ToolCallCompleted,
    /// Reasoning phase began
    ReasoningStarted,
    /// One reasoning step
    ReasoningStep,
    /// Reasoning phase finished
    ReasoningCompleted,
    /// Agent is updating its memory
    UpdatingMemory,
    /// Anything else, passed through verbatim
    Other(String),
}

impl EventKind {
    /// Map a raw discriminator onto a known kind.
    pub fn from_name(name: &str) -> Self {
        match name {
            "RunStarted" => EventKind::RunStarted,
            // Older services emit `RunResponse`, newer ones `RunContent`
            "RunResponseContent" | "RunResponse" | "RunContent" => EventKind::RunResponseContent,
            "RunCompleted" => EventKind::RunCompleted,
            "RunError" => EventKind::RunError,
            "RunCancelled" => EventKind::RunCancelled,
            "ToolCallStarted" => EventKind::ToolCallStarted,
            "ToolCallCompleted" => EventKind::ToolCallCompleted,
            "ReasoningStarted" => EventKind::ReasoningStarted,
            "ReasoningStep" => EventKind::ReasoningStep,
            "ReasoningCompleted" => EventKind::ReasoningCompleted,
            "UpdatingMemory" => EventKind::UpdatingMemory,
            other => EventKind::Other(other.to_string()),
        }
    }

    /// Canonical discriminator for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::RunStarted => "RunStarted",
            EventKind::RunResponseContent => "RunResponseContent",
            EventKind::RunCompleted => "RunCompleted",
            EventKind::RunError => "RunError",
            EventKind::RunCancelled => "RunCancelled",
            EventKind::ToolCallStarted => "ToolCallStarted",
            EventKind::ToolCallCompleted => "ToolCallCompleted",
            EventKind::ReasoningStarted => "ReasoningStarted",
            EventKind::ReasoningStep => "ReasoningStep",
            EventKind::ReasoningCompleted => "ReasoningCompleted",
            EventKind::UpdatingMemory => "UpdatingMemory",
            EventKind::Other(name) => name,
        }
    }

    /// Whether this kind ends the run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EventKind::RunCompleted | EventKind::RunError | EventKind::RunCancelled
        )
    }
}

/// One parsed event from an agent-run stream.
///
/// `event` and `content` are lifted out of the JSON object because every
/// consumer needs them; everything else stays in `fields` untouched.
/// A `content` value that is not a string (a structured reasoning step, for
/// example) is left in `fields` under the `"content"` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamEvent {
    /// Discriminator, passed through verbatim
    pub event: String,
    /// Text payload, when the object carried a string `content`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Remaining fields as received
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl StreamEvent {
    /// Create an event with no payload.
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            content: None,
            fields: Map::new(),
        }
    }

    /// Set the text payload.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Add an extra field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Build an event from a decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, ParseErrorKind> {
        let Value::Object(mut fields) = value else {
            return Err(ParseErrorKind::NotAnObject);
        };

        let event = match fields.remove("event") {
            Some(Value::String(event)) => event,
            Some(other) => {
                // Put it back so the caller still sees what arrived
                fields.insert("event".to_string(), other);
                return Err(ParseErrorKind::MissingEvent);
            }
            None => return Err(ParseErrorKind::MissingEvent),
        };

        let content = match fields.remove("content") {
            Some(Value::String(text)) => Some(text),
            Some(Value::Null) | None => None,
            Some(structured) => {
                fields.insert("content".to_string(), structured);
                None
            }
        };

        Ok(Self {
            event,
            content,
            fields,
        })
    }

    /// Typed view of the discriminator.
    pub fn kind(&self) -> EventKind {
        EventKind::from_name(&self.event)
    }

    /// Look up an extra field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up an extra field that holds a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Run id, when present.
    pub fn run_id(&self) -> Option<&str> {
        self.str_field("run_id")
    }

    /// Session id, when present.
    pub fn session_id(&self) -> Option<&str> {
        self.str_field("session_id")
    }
}

/// Why a bounded span did not become an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The span is not valid JSON
    InvalidJson(String),
    /// Valid JSON, but not an object
    NotAnObject,
    /// Object without a string `event` discriminator
    MissingEvent,
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorKind::InvalidJson(msg) => write!(f, "invalid JSON: {}", msg),
            ParseErrorKind::NotAnObject => write!(f, "not a JSON object"),
            ParseErrorKind::MissingEvent => write!(f, "missing string \"event\" field"),
        }
    }
}

/// A structurally balanced span that could not be turned into an event.
///
/// Covers both JSON syntax failures and well-formed JSON that is not an
/// event: a non-object value, or an object without a string `event`
/// field. Reported in place of the event; parsing continues after the span.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed stream span ({kind}): {}", preview(.span))]
pub struct ParseError {
    /// What went wrong
    pub kind: ParseErrorKind,
    /// Raw text of the span, braces included
    pub span: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: impl Into<String>) -> Self {
        Self {
            kind,
            span: span.into(),
        }
    }
}

/// One result of `feed`: an event, or the diagnostic for a malformed span.
pub type StreamItem = Result<StreamEvent, ParseError>;

/// How a stream ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishStatus {
    /// Nothing but whitespace was left over
    Clean,
    /// The stream stopped in the middle of an object
    Truncated {
        /// Unparsed text left in the buffer
        leftover: String,
    },
}

impl FinishStatus {
    pub fn is_clean(&self) -> bool {
        matches!(self, FinishStatus::Clean)
    }
}

/// Shorten long spans for log lines and error messages.
pub(crate) fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 120;
    if text.chars().count() <= MAX_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_kind_round_trip_known_names() {
        for name in [
            "RunStarted",
            "RunResponseContent",
            "RunCompleted",
            "RunError",
            "RunCancelled",
            "ToolCallStarted",
            "ToolCallCompleted",
            "ReasoningStarted",
            "ReasoningStep",
            "ReasoningCompleted",
            "UpdatingMemory",
        ] {
            let kind = EventKind::from_name(name);
            assert!(!matches!(kind, EventKind::Other(_)), "{} should be known", name);
            assert_eq!(kind.as_str(), name);
        }
    }

    #[test]
    fn test_event_kind_aliases() {
        assert_eq!(EventKind::from_name("RunResponse"), EventKind::RunResponseContent);
        assert_eq!(EventKind::from_name("RunContent"), EventKind::RunResponseContent);
    }

    #[test]
    fn test_event_kind_unknown_preserved() {
        let kind = EventKind::from_name("TeamRunStarted");
        assert_eq!(kind, EventKind::Other("TeamRunStarted".to_string()));
        assert_eq!(kind.as_str(), "TeamRunStarted");
        assert!(!kind.is_terminal());
    }

    #[test]
    fn test_terminal_kinds() {
        assert!(EventKind::RunCompleted.is_terminal());
        assert!(EventKind::RunError.is_terminal());
        assert!(EventKind::RunCancelled.is_terminal());
        assert!(!EventKind::RunResponseContent.is_terminal());
    }

    #[test]
    fn test_from_value_lifts_event_and_content() {
        let event = StreamEvent::from_value(json!({
            "event": "RunResponseContent",
            "content": "Hel",
            "run_id": "run-1"
        }))
        .unwrap();

        assert_eq!(event.event, "RunResponseContent");
        assert_eq!(event.content.as_deref(), Some("Hel"));
        assert_eq!(event.run_id(), Some("run-1"));
        assert!(event.field("event").is_none());
        assert!(event.field("content").is_none());
    }

    #[test]
    fn test_from_value_keeps_structured_content_in_fields() {
        let event = StreamEvent::from_value(json!({
            "event": "ReasoningStep",
            "content": {"title": "Plan", "confidence": 0.8}
        }))
        .unwrap();

        assert!(event.content.is_none());
        assert_eq!(event.field("content").unwrap()["title"], "Plan");
    }

    #[test]
    fn test_from_value_null_content() {
        let event = StreamEvent::from_value(json!({"event": "RunStarted", "content": null})).unwrap();
        assert!(event.content.is_none());
        assert!(event.fields.is_empty());
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert_eq!(
            StreamEvent::from_value(json!([1, 2])),
            Err(ParseErrorKind::NotAnObject)
        );
    }

    #[test]
    fn test_from_value_rejects_missing_event() {
        assert_eq!(
            StreamEvent::from_value(json!({"content": "x"})),
            Err(ParseErrorKind::MissingEvent)
        );
        assert_eq!(
            StreamEvent::from_value(json!({"event": 3})),
            Err(ParseErrorKind::MissingEvent)
        );
    }

    #[test]
    fn test_serialize_flattens_fields() {
        let event = StreamEvent::new("ToolCallStarted")
            .with_field("tool", json!({"tool_name": "search"}));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value, json!({"event": "ToolCallStarted", "tool": {"tool_name": "search"}}));
    }

    #[test]
    fn test_parse_error_display_truncates_span() {
        let long = format!("{{{}}}", "x".repeat(500));
        let err = ParseError::new(ParseErrorKind::NotAnObject, long);
        let text = err.to_string();
        assert!(text.starts_with("malformed stream span (not a JSON object): {"));
        assert!(text.ends_with("..."));
        assert!(text.len() < 200);
    }

    #[test]
    fn test_finish_status_is_clean() {
        assert!(FinishStatus::Clean.is_clean());
        assert!(!FinishStatus::Truncated {
            leftover: "{".to_string()
        }
        .is_clean());
    }
}

//! Request and response types for the agent service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One run request: a user message sent to an agent.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub agent_id: String,
    pub message: String,
    /// Continue this session; the service starts a new one when absent
    pub session_id: Option<String>,
    /// Overrides the configured user id
    pub user_id: Option<String>,
}

impl RunRequest {
    pub fn new(agent_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            message: message.into(),
            session_id: None,
            user_id: None,
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Pin the run to a fresh client-generated session id.
    pub fn with_new_session(mut self) -> Self {
        self.session_id = Some(Uuid::new_v4().to_string());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Encode as an `application/x-www-form-urlencoded` body.
    pub fn form_body(&self, default_user_id: Option<&str>) -> String {
        let mut pairs = vec![
            ("message", self.message.as_str()),
            ("stream", "true"),
        ];
        if let Some(session_id) = self.session_id.as_deref() {
            pairs.push(("session_id", session_id));
        }
        if let Some(user_id) = self.user_id.as_deref().or(default_user_id) {
            pairs.push(("user_id", user_id));
        }

        pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A past session as listed by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSummary {
    pub session_id: String,
    #[serde(default, alias = "title")]
    pub session_name: Option<String>,
    /// Unix seconds on the wire
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SessionSummary {
    /// Name to show in listings.
    pub fn display_name(&self) -> &str {
        self.session_name.as_deref().unwrap_or(&self.session_id)
    }
}

/// A memory the agent keeps about a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryEntry {
    #[serde(default)]
    pub memory_id: Option<String>,
    pub memory: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

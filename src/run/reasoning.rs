//! Reasoning steps shown in the reasoning panel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step of the agent's reasoning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReasoningStep {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub next_action: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl ReasoningStep {
    /// Step carrying only free-form reasoning text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            reasoning: Some(text.into()),
            ..Self::default()
        }
    }

    /// Read a step object; unknown keys are ignored.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::from_text(text.clone())),
            Value::Object(_) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }

    /// Read an array of steps, skipping entries that do not fit.
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        value
            .as_array()
            .map(|steps| steps.iter().filter_map(Self::from_value).collect())
            .unwrap_or_default()
    }

    /// Whether two steps describe the same thing.
    pub(crate) fn same_step(&self, other: &Self) -> bool {
        match (&self.title, &other.title) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

//! Run state reducer
//!
//! RunState is the consumer side of the stream parser: it folds events into
//! what a chat view shows for one agent run (the assistant message text,
//! tool-call indicators, the reasoning panel, and the final status).

mod reasoning;
mod tools;

pub use reasoning::ReasoningStep;
pub use tools::{ToolCallState, ToolCallStatus};

use serde_json::Value;
use tracing::debug;

use crate::stream::{EventKind, FinishStatus, ParseError, StreamEvent, StreamItem};

/// Notice appended when the stream stopped mid-object.
pub const INCOMPLETE_NOTICE: &str = "The response was interrupted and may be incomplete.";

/// Lifecycle status of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunStatus {
    /// No events yet
    #[default]
    Pending,
    /// Run started, events flowing
    Running,
    /// Run finished successfully
    Completed,
    /// Service reported an error
    Failed { message: String },
    /// Run was cancelled
    Cancelled,
}

impl RunStatus {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Failed { .. } | RunStatus::Cancelled
        )
    }
}

/// Everything a chat view needs about one run.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub run_id: Option<String>,
    pub session_id: Option<String>,
    pub agent_id: Option<String>,
    /// Assistant message text so far
    pub content: String,
    /// Tool calls in the order they started
    pub tool_calls: Vec<ToolCallState>,
    /// Reasoning steps in arrival order
    pub reasoning_steps: Vec<ReasoningStep>,
    /// Reasoning panel is open (between ReasoningStarted and ReasoningCompleted)
    pub reasoning_active: bool,
    pub status: RunStatus,
    /// Inline notices for the user (malformed data, interrupted stream)
    pub notices: Vec<String>,
    /// The stream ended inside an object
    pub incomplete: bool,
    /// Content deltas seen so far
    deltas: usize,
    /// Events applied so far
    events_applied: usize,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events applied.
    pub fn events_applied(&self) -> usize {
        self.events_applied
    }

    /// Apply either an event or a parse diagnostic.
    pub fn apply_item(&mut self, item: &StreamItem) {
        match item {
            Ok(event) => self.apply(event),
            Err(err) => self.apply_parse_error(err),
        }
    }

    /// Fold one event into the state.
    pub fn apply(&mut self, event: &StreamEvent) {
        self.events_applied += 1;
        self.capture_ids(event);

        match event.kind() {
            EventKind::RunStarted => {
                self.status = RunStatus::Running;
            }
            EventKind::RunResponseContent => {
                self.mark_running();
                if let Some(delta) = &event.content {
                    self.content.push_str(delta);
                    self.deltas += 1;
                }
                self.merge_extra_reasoning(event);
            }
            EventKind::RunCompleted => {
                // Completion carries the full text; only use it if no deltas came
                if self.deltas == 0 {
                    if let Some(full) = &event.content {
                        self.content = full.clone();
                    }
                }
                self.merge_extra_reasoning(event);
                self.reasoning_active = false;
                self.status = RunStatus::Completed;
            }
            EventKind::RunError => {
                let message = event
                    .content
                    .clone()
                    .or_else(|| event.str_field("error").map(str::to_string))
                    .unwrap_or_else(|| "The agent run failed.".to_string());
                self.status = RunStatus::Failed { message };
            }
            EventKind::RunCancelled => {
                self.status = RunStatus::Cancelled;
            }
            EventKind::ToolCallStarted => {
                self.mark_running();
                for tool in tools_in(event) {
                    self.upsert_tool(tool, false);
                }
            }
            EventKind::ToolCallCompleted => {
                for tool in tools_in(event) {
                    self.upsert_tool(tool, true);
                }
            }
            EventKind::ReasoningStarted => {
                self.mark_running();
                self.reasoning_active = true;
            }
            EventKind::ReasoningStep => {
                self.reasoning_active = true;
                let step = event
                    .field("content")
                    .or_else(|| event.field("reasoning_step"))
                    .and_then(ReasoningStep::from_value)
                    .or_else(|| event.content.as_deref().map(ReasoningStep::from_text));
                if let Some(step) = step {
                    self.push_step(step);
                }
            }
            EventKind::ReasoningCompleted => {
                if let Some(steps) = event.field("content") {
                    for step in ReasoningStep::list_from_value(steps) {
                        self.push_step(step);
                    }
                }
                self.merge_extra_reasoning(event);
                self.reasoning_active = false;
            }
            EventKind::UpdatingMemory => {}
            EventKind::Other(name) => {
                debug!(event = %name, "ignoring unhandled event kind");
            }
        }
    }

    /// Record a malformed span as an inline notice.
    pub fn apply_parse_error(&mut self, err: &ParseError) {
        self.notices
            .push(format!("Skipped an unreadable part of the response ({}).", err.kind));
    }

    /// Record how the stream ended.
    pub fn apply_finish(&mut self, status: &FinishStatus) {
        if let FinishStatus::Truncated { .. } = status {
            self.mark_incomplete();
        }
    }

    /// Flag the response as interrupted, keeping what was received.
    pub fn mark_incomplete(&mut self) {
        if !self.incomplete {
            self.incomplete = true;
            self.notices.push(INCOMPLETE_NOTICE.to_string());
        }
    }

    /// Tool calls not yet completed.
    pub fn active_tools(&self) -> impl Iterator<Item = &ToolCallState> {
        self.tool_calls.iter().filter(|t| t.is_in_progress())
    }

    /// Look up a tool call by id.
    pub fn tool(&self, tool_call_id: &str) -> Option<&ToolCallState> {
        self.tool_calls.iter().find(|t| t.tool_call_id == tool_call_id)
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    fn mark_running(&mut self) {
        if self.status == RunStatus::Pending {
            self.status = RunStatus::Running;
        }
    }

    fn capture_ids(&mut self, event: &StreamEvent) {
        if self.run_id.is_none() {
            self.run_id = event.run_id().map(str::to_string);
        }
        if self.session_id.is_none() {
            self.session_id = event.session_id().map(str::to_string);
        }
        if self.agent_id.is_none() {
            self.agent_id = event.str_field("agent_id").map(str::to_string);
        }
    }

    fn upsert_tool(&mut self, incoming: ToolCallState, completed: bool) {
        let index = match self
            .tool_calls
            .iter()
            .position(|t| t.tool_call_id == incoming.tool_call_id)
        {
            Some(index) => index,
            None => {
                self.tool_calls.push(incoming.clone());
                self.tool_calls.len() - 1
            }
        };

        let slot = &mut self.tool_calls[index];
        if slot.args.is_none() {
            slot.args = incoming.args.clone();
        }

        if completed {
            match incoming.error {
                Some(error) => slot.fail(error),
                None => slot.complete(incoming.result),
            }
        }
    }

    fn push_step(&mut self, step: ReasoningStep) {
        match self.reasoning_steps.iter_mut().find(|s| s.same_step(&step)) {
            Some(existing) => *existing = step,
            None => self.reasoning_steps.push(step),
        }
    }

    fn merge_extra_reasoning(&mut self, event: &StreamEvent) {
        let steps = event
            .field("extra_data")
            .and_then(|extra| extra.get("reasoning_steps"))
            .map(ReasoningStep::list_from_value)
            .unwrap_or_default();
        for step in steps {
            self.push_step(step);
        }
    }
}

/// Tool objects carried by a tool event, as `tool` or `tools`.
fn tools_in(event: &StreamEvent) -> Vec<ToolCallState> {
    let mut out = Vec::new();
    if let Some(tool) = event.field("tool") {
        out.extend(ToolCallState::from_value(tool));
    }
    if let Some(Value::Array(tools)) = event.field("tools") {
        out.extend(tools.iter().filter_map(ToolCallState::from_value));
    }
    out
}

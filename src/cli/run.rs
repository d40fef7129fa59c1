//! `crafty run`: send one message and print the answer as it streams.

use futures::StreamExt;
use std::io::Write;
use tracing::info;

use crate::client::{AgentRunClient, RunRequest};
use crate::error::CraftyResult;
use crate::run::RunState;

/// Stream a run to `out`, returning the final state.
///
/// Message text is written as it arrives. Tool activity goes to the log.
/// Notices (skipped spans, an interrupted stream) follow the message.
pub async fn run_agent<W: Write>(
    client: &AgentRunClient,
    request: &RunRequest,
    out: &mut W,
) -> CraftyResult<RunState> {
    let mut stream = client.stream_run(request).await?;
    let mut state = RunState::new();
    let mut printed = 0;
    let mut tools_seen = 0;

    while let Some(item) = stream.next().await {
        item?.apply_to(&mut state);

        // Text only grows; completion fills it in only when nothing was printed
        if let Some(fresh) = state.content.get(printed..) {
            if !fresh.is_empty() {
                out.write_all(fresh.as_bytes())?;
                out.flush()?;
                printed = state.content.len();
            }
        }

        for tool in &state.tool_calls[tools_seen..] {
            info!(tool = %tool.tool_name, id = %tool.tool_call_id, "tool call started");
        }
        tools_seen = state.tool_calls.len();
    }

    if printed > 0 {
        writeln!(out)?;
    }
    for notice in &state.notices {
        writeln!(out, "[{}]", notice)?;
    }
    Ok(state)
}

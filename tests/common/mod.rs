//! Common test utilities for integration tests.
//!
//! Fixtures are recorded-style run bodies; helpers feed them to a parser
//! under different chunkings and collect what comes out.

#![allow(dead_code, unused_imports)]

pub mod mocks;

pub use mocks::*;

use crafty::stream::{FinishStatus, StreamEvent, StreamEventParser, StreamItem};

/// A complete run: start, reasoning, a tool call, streamed text, completion.
pub const FULL_RUN: &str = concat!(
    r#"{"event":"RunStarted","run_id":"run-1","session_id":"sess-1","agent_id":"web-agent","created_at":1700000000}"#,
    "\n",
    r#"{"event":"ReasoningStarted","run_id":"run-1"}"#,
    r#"{"event":"ReasoningStep","content":{"title":"Plan","action":"Search the web","confidence":0.8}}"#,
    r#"{"event":"ReasoningCompleted"}"#,
    "\n",
    r#"{"event":"ToolCallStarted","tool":{"tool_call_id":"call-1","tool_name":"duckduckgo_search","tool_args":{"query":"rust {json} \"streams\""}}}"#,
    r#"{"event":"ToolCallCompleted","tool":{"tool_call_id":"call-1","tool_name":"duckduckgo_search","result":"3 results"}}"#,
    "\n",
    r#"{"event":"RunResponseContent","content":"Rust "}"#,
    r#"{"event":"RunResponseContent","content":"streams {are} \"fun\" … ünïcödé 🦀"}"#,
    "\n",
    r#"{"event":"RunCompleted","content":"Rust streams {are} \"fun\" … ünïcödé 🦀"}"#,
);

/// Number of events in [`FULL_RUN`].
pub const FULL_RUN_EVENTS: usize = 9;

/// Feed `chunks` in order, then finish.
pub fn parse_chunks<'a, I>(chunks: I) -> (Vec<StreamItem>, FinishStatus)
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut parser = StreamEventParser::new();
    parser.start();
    let mut items = Vec::new();
    for chunk in chunks {
        items.extend(parser.feed_bytes(chunk));
    }
    let finish = parser.finish();
    (items, finish)
}

/// Feed `input` split at the given byte offsets (sorted, deduplicated).
pub fn parse_split_at(input: &[u8], cuts: &[usize]) -> (Vec<StreamItem>, FinishStatus) {
    let mut bounds = Vec::with_capacity(cuts.len() + 2);
    bounds.push(0);
    bounds.extend(cuts.iter().copied().filter(|c| *c > 0 && *c < input.len()));
    bounds.push(input.len());
    bounds.sort_unstable();
    bounds.dedup();

    parse_chunks(bounds.windows(2).map(|w| &input[w[0]..w[1]]))
}

/// Unwrap every item, failing the test on any parse error.
pub fn expect_events(items: Vec<StreamItem>) -> Vec<StreamEvent> {
    items
        .into_iter()
        .map(|item| item.unwrap_or_else(|err| panic!("unexpected parse error: {}", err)))
        .collect()
}

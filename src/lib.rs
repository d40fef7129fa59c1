//! Crafty - incremental parsing of agent-run event streams
//!
//! An agent service answers a run with a chunked body of back-to-back JSON
//! objects. [`stream::StreamEventParser`] turns arbitrary chunks of that body
//! into events, [`run::RunState`] folds events into what a chat view shows,
//! and [`client::AgentRunClient`] drives both over HTTP.

pub mod adapters;
pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod run;
pub mod stream;
pub mod traits;

pub use client::{AgentRunClient, RunRequest, RunStreamItem};
pub use config::ClientConfig;
pub use error::{CraftyError, CraftyResult};
pub use run::RunState;
pub use stream::{FinishStatus, ParseError, StreamEvent, StreamEventParser, StreamItem};

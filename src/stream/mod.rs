//! Agent-run event stream parser
//!
//! The agent service answers a run request with a chunked body made of
//! back-to-back (or whitespace separated) JSON objects, one per event, with
//! no SSE `data:` framing and no length prefixes. Chunk boundaries fall
//! anywhere, including inside string literals and multi-byte characters.
//!
//! # Module structure
//! - `events` - Event types (StreamEvent, EventKind, ParseError, FinishStatus)
//! - `scanner` - Top-level `{ ... }` span detection with string/escape tracking
//! - `decoder` - UTF-8 decoding across byte chunk boundaries
//! - `parser` - StreamEventParser tying the pieces together

mod decoder;
mod events;
mod parser;
mod scanner;

pub use decoder::Utf8ChunkDecoder;
pub use events::{EventKind, FinishStatus, ParseError, ParseErrorKind, StreamEvent, StreamItem};
pub use parser::{parse_span, StreamEventParser};

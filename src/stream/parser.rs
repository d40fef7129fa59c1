//! Incremental JSON event stream parsing
//!
//! Contains the stateful StreamEventParser that accumulates chunk text and
//! emits one item per complete top-level JSON object.

use tracing::{debug, warn};

use super::decoder::Utf8ChunkDecoder;
use super::events::{
    preview, FinishStatus, ParseError, ParseErrorKind, StreamEvent, StreamItem,
};
use super::scanner::{Scan, SpanScanner};

/// Parse one balanced span into an event or a diagnostic.
pub fn parse_span(span: &str) -> StreamItem {
    let value: serde_json::Value = serde_json::from_str(span)
        .map_err(|e| ParseError::new(ParseErrorKind::InvalidJson(e.to_string()), span))?;
    StreamEvent::from_value(value).map_err(|kind| ParseError::new(kind, span))
}

/// Stateful parser for a chunked stream of back-to-back JSON objects.
///
/// One parser serves one stream. Feed chunks in arrival order; each call
/// returns the items completed by that chunk. Objects split across chunks
/// are held until they close.
#[derive(Debug, Default)]
pub struct StreamEventParser {
    /// Text not yet turned into events
    buffer: String,
    /// Boundary detection state, carried across feeds
    scanner: SpanScanner,
    /// Byte chunk decoder for `feed_bytes`
    decoder: Utf8ChunkDecoder,
    /// Events emitted since `start`
    events_emitted: usize,
    /// Malformed spans reported since `start`
    errors_emitted: usize,
}

impl StreamEventParser {
    /// Create a parser ready for a new stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new parsing session, discarding any buffered text.
    pub fn start(&mut self) {
        self.buffer.clear();
        self.scanner.reset();
        self.decoder.reset();
        self.events_emitted = 0;
        self.errors_emitted = 0;
    }

    /// Feed one decoded chunk.
    ///
    /// Returns one item per complete object found, in stream order. Never
    /// fails as a whole: malformed spans come back as `Err` items.
    pub fn feed(&mut self, chunk: &str) -> Vec<StreamItem> {
        if chunk.is_empty() {
            return Vec::new();
        }
        self.buffer.push_str(chunk);
        self.drain_complete()
    }

    /// Feed one raw byte chunk, decoding UTF-8 across chunk boundaries.
    pub fn feed_bytes(&mut self, chunk: &[u8]) -> Vec<StreamItem> {
        let text = self.decoder.decode(chunk);
        self.feed(&text)
    }

    /// Signal end of stream.
    ///
    /// A non-whitespace remainder (an unclosed object or trailing stray
    /// text) is logged and returned as [`FinishStatus::Truncated`], never
    /// parsed. The buffer is discarded either way.
    pub fn finish(&mut self) -> FinishStatus {
        let tail = self.decoder.finish();
        self.buffer.push_str(&tail);

        let leftover = self.buffer.trim().to_string();
        self.buffer.clear();
        self.scanner.reset();

        if leftover.is_empty() {
            debug!(
                events = self.events_emitted,
                errors = self.errors_emitted,
                "stream finished cleanly"
            );
            FinishStatus::Clean
        } else {
            warn!(
                leftover = %preview(&leftover),
                bytes = leftover.len(),
                "stream ended with unparsed text"
            );
            FinishStatus::Truncated { leftover }
        }
    }

    /// Bytes currently buffered: the pending partial object, or text after
    /// the last complete object.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// The buffered, not yet parsed text.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Events emitted since the last `start`.
    pub fn events_emitted(&self) -> usize {
        self.events_emitted
    }

    /// Malformed spans reported since the last `start`.
    pub fn errors_emitted(&self) -> usize {
        self.errors_emitted
    }

    /// Pull every complete span off the front of the buffer.
    fn drain_complete(&mut self) -> Vec<StreamItem> {
        let mut items = Vec::new();
        // End of the last span extracted by this call
        let mut span_end = 0;

        let consumed = loop {
            match self.scanner.next_span(&self.buffer) {
                Scan::Complete(range) => {
                    span_end = range.end;
                    let item = parse_span(&self.buffer[range]);
                    match &item {
                        Ok(event) => {
                            self.events_emitted += 1;
                            debug!(event = %event.event, "stream event");
                        }
                        Err(err) => {
                            self.errors_emitted += 1;
                            warn!(error = %err.kind, span = %preview(&err.span), "skipping malformed span");
                        }
                    }
                    items.push(item);
                }
                // Keep the open object, drop everything before it
                Scan::Pending => break self.scanner.pending_start().unwrap_or(0),
                // No `{` left: keep the trailing text for `finish` to judge.
                // The cursor already sits at the buffer end.
                Scan::Exhausted => break span_end,
            }
        };

        if consumed > 0 {
            self.buffer.drain(..consumed);
            self.scanner.rebase(consumed);
        }

        items
    }
}

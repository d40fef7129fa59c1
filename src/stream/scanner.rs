//! Top-level JSON object boundary detection.
//!
//! The scanner walks a text buffer looking for balanced `{ ... }` spans.
//! Its state survives between calls, so an object that arrives in pieces is
//! scanned once, not once per chunk.
//!
//! Scanning works on bytes. The four bytes that matter (`{`, `}`, `"`, `\`)
//! are ASCII, and UTF-8 continuation bytes never collide with ASCII, so a
//! byte walk is exact for any valid UTF-8 text.

use std::ops::Range;

/// Outcome of one scan step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scan {
    /// A complete top-level span (byte range into the buffer)
    Complete(Range<usize>),
    /// An object has started but not closed; more input is needed
    Pending,
    /// No `{` left in the buffer
    Exhausted,
}

/// Incremental brace/string state machine.
#[derive(Debug, Default, Clone)]
pub(crate) struct SpanScanner {
    /// Next byte to examine
    cursor: usize,
    /// Start of the object being scanned, if any
    start: Option<usize>,
    /// Brace depth, counted outside string literals only
    depth: usize,
    /// Inside a string literal
    in_string: bool,
    /// Previous byte was a backslash inside a string
    escaped: bool,
}

impl SpanScanner {
    /// Start offset of an object that has begun but not closed.
    pub fn pending_start(&self) -> Option<usize> {
        self.start
    }

    /// Find the next complete span at or after the cursor.
    pub fn next_span(&mut self, buffer: &str) -> Scan {
        let bytes = buffer.as_bytes();

        if self.start.is_none() {
            let from = self.cursor.min(bytes.len());
            match bytes[from..].iter().position(|&b| b == b'{') {
                Some(offset) => {
                    self.start = Some(from + offset);
                    self.cursor = from + offset;
                    self.depth = 0;
                    self.in_string = false;
                    self.escaped = false;
                }
                None => {
                    self.cursor = bytes.len();
                    return Scan::Exhausted;
                }
            }
        }

        while self.cursor < bytes.len() {
            let byte = bytes[self.cursor];
            self.cursor += 1;

            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if byte == b'\\' {
                    self.escaped = true;
                } else if byte == b'"' {
                    self.in_string = false;
                }
                continue;
            }

            match byte {
                b'"' => self.in_string = true,
                b'{' => self.depth += 1,
                b'}' => {
                    // depth >= 1 here: the span starts with `{`
                    self.depth -= 1;
                    if self.depth == 0 {
                        if let Some(start) = self.start.take() {
                            return Scan::Complete(start..self.cursor);
                        }
                    }
                }
                _ => {}
            }
        }

        Scan::Pending
    }

    /// Shift offsets after `consumed` bytes were drained from the buffer front.
    pub fn rebase(&mut self, consumed: usize) {
        self.cursor = self.cursor.saturating_sub(consumed);
        if let Some(start) = self.start.as_mut() {
            *start = start.saturating_sub(consumed);
        }
    }

    /// Forget all state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

//! `crafty replay`: parse a captured run body offline.
//!
//! Useful for checking how a recorded stream parses under different chunk
//! boundaries without talking to the service.

use std::io::{Read, Write};
use std::path::Path;

use crate::error::{CraftyResult, ErrorContext, ResultExt};
use crate::run::RunState;
use crate::stream::{FinishStatus, ParseError, StreamEvent, StreamEventParser};

/// What a replay found.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub events: Vec<StreamEvent>,
    pub malformed: Vec<ParseError>,
    pub finish: FinishStatus,
    /// The run as a chat view would show it
    pub state: RunState,
    /// Number of feeds the input was split into
    pub chunks: usize,
}

/// Parse `data` fed in `chunk_size`-byte pieces (one piece if `None`).
pub fn replay_bytes(data: &[u8], chunk_size: Option<usize>) -> ReplayReport {
    let mut parser = StreamEventParser::new();
    parser.start();

    let mut state = RunState::new();
    let mut events = Vec::new();
    let mut malformed = Vec::new();

    let size = chunk_size.unwrap_or(data.len()).max(1);
    let mut chunks = 0;
    for chunk in data.chunks(size) {
        chunks += 1;
        for item in parser.feed_bytes(chunk) {
            state.apply_item(&item);
            match item {
                Ok(event) => events.push(event),
                Err(err) => malformed.push(err),
            }
        }
    }

    let finish = parser.finish();
    state.apply_finish(&finish);

    ReplayReport {
        events,
        malformed,
        finish,
        state,
        chunks,
    }
}

/// Replay a file, or stdin when `path` is `-`.
pub fn replay_path(path: &Path, chunk_size: Option<usize>) -> CraftyResult<ReplayReport> {
    let data = if path == Path::new("-") {
        let mut data = Vec::new();
        std::io::stdin()
            .read_to_end(&mut data)
            .with_context(|| ErrorContext::new("read stdin"))?;
        data
    } else {
        std::fs::read(path)
            .with_context(|| ErrorContext::new(format!("read {}", path.display())))?
    };
    Ok(replay_bytes(&data, chunk_size))
}

/// Print one JSON line per event, then a summary.
pub fn write_report<W: Write>(report: &ReplayReport, out: &mut W) -> CraftyResult<()> {
    for event in &report.events {
        serde_json::to_writer(&mut *out, event)?;
        writeln!(out)?;
    }
    for err in &report.malformed {
        writeln!(out, "# {}", err)?;
    }

    let ending = match &report.finish {
        FinishStatus::Clean => "clean".to_string(),
        FinishStatus::Truncated { leftover } => {
            format!("truncated, {} bytes unparsed", leftover.len())
        }
    };
    writeln!(
        out,
        "# {} events, {} malformed, {} chunks, {}",
        report.events.len(),
        report.malformed.len(),
        report.chunks,
        ending
    )?;
    if !report.state.content.is_empty() {
        writeln!(out, "# message: {}", report.state.content)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = concat!(
        r#"{"event":"RunStarted","run_id":"r1"}"#,
        "\n",
        r#"{"event":"RunResponseContent","content":"Hi "}"#,
        r#"{"event":"RunResponseContent","content":"there"}"#,
        "\n",
        r#"{"event":"RunCompleted"}"#,
    );

    #[test]
    fn test_replay_same_result_for_every_chunk_size() {
        let whole = replay_bytes(BODY.as_bytes(), None);
        assert_eq!(whole.chunks, 1);
        assert_eq!(whole.events.len(), 4);
        assert_eq!(whole.state.content, "Hi there");

        for size in [1, 2, 3, 7, 64] {
            let report = replay_bytes(BODY.as_bytes(), Some(size));
            assert_eq!(report.events, whole.events, "chunk size {size}");
            assert!(report.finish.is_clean());
        }
    }

    #[test]
    fn test_replay_empty_input() {
        let report = replay_bytes(b"", Some(4));
        assert!(report.events.is_empty());
        assert_eq!(report.chunks, 0);
        assert_eq!(report.finish, FinishStatus::Clean);
    }

    #[test]
    fn test_write_report_truncated() {
        let report = replay_bytes(br#"{"event":"RunStarted"}{bad}{"event":"Run"#, Some(5));
        let mut out = Vec::new();
        write_report(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], r#"{"event":"RunStarted"}"#);
        assert!(lines[1].starts_with("# malformed stream span"));
        assert!(lines[2].starts_with("# 1 events, 1 malformed,"));
        assert!(lines[2].ends_with("truncated, 13 bytes unparsed"));
        assert!(report.state.incomplete);
    }
}

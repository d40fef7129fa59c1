//! CLI for crafty.
//!
//! - `replay` parses a captured run body offline
//! - `run` sends one message to an agent and streams the reply
//!
//! ```ignore
//! let command = parse_args(std::env::args())?;
//! run_cli_command(command)?;
//! ```

pub mod args;
pub mod replay;
pub mod run;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand};
pub use replay::{replay_bytes, replay_path, write_report, ReplayReport};
pub use run::run_agent;
pub use version::{version_line, VERSION};

use color_eyre::{Report, Result, Section};
use std::io::Write;
use tracing::error;

use crate::client::{AgentRunClient, RunRequest};
use crate::config::ClientConfig;
use crate::error::{CraftyError, CraftyResult, ErrorContext, ResultExt, StreamError};
use crate::run::RunStatus;

/// Usage text for `crafty help`.
pub const USAGE: &str = "\
Usage:
  crafty replay <file|-> [--chunk-size N]   Parse a captured run body
  crafty run <agent_id> <message> [--session ID] [--user ID]
                                            Stream a reply from an agent
  crafty --version                          Print the version
  crafty help                               Show this message

Environment:
  CRAFTY_API_URL, CRAFTY_API_KEY, CRAFTY_USER_ID,
  CRAFTY_CONNECT_TIMEOUT_SECS, CRAFTY_CACHE_TTL_SECS, RUST_LOG";

/// Execute a parsed command, writing results to stdout.
///
/// Failures come back as a report headed by the error's user message,
/// with its code and a recovery suggestion attached as sections.
pub fn run_cli_command(command: CliCommand) -> Result<()> {
    execute(command).map_err(error_report)
}

fn execute(command: CliCommand) -> CraftyResult<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        CliCommand::Version => {
            writeln!(out, "{}", version_line())?;
            Ok(())
        }
        CliCommand::Help => {
            writeln!(out, "{}", USAGE)?;
            Ok(())
        }
        CliCommand::Replay { path, chunk_size } => {
            let report = replay_path(&path, chunk_size)?;
            write_report(&report, &mut out)?;
            Ok(())
        }
        CliCommand::Run {
            agent_id,
            message,
            session_id,
            user_id,
        } => {
            let config = ClientConfig::from_env()?;
            let client = AgentRunClient::new(config)?;

            let mut request = RunRequest::new(agent_id, message);
            if let Some(session_id) = session_id {
                request = request.with_session_id(session_id);
            }
            if let Some(user_id) = user_id {
                request = request.with_user_id(user_id);
            }

            let runtime = tokio::runtime::Runtime::new()
                .with_context(|| ErrorContext::new("start runtime"))?;
            let state = runtime.block_on(run_agent(&client, &request, &mut out))?;
            check_run_status(&state.status, &request)
        }
    }
}

/// A run the service reported as failed is an error for the CLI.
fn check_run_status(status: &RunStatus, request: &RunRequest) -> CraftyResult<()> {
    match status {
        RunStatus::Failed { message } => {
            let mut context = ErrorContext::new("run").with_agent_id(request.agent_id.as_str());
            if let Some(session_id) = &request.session_id {
                context = context.with_session_id(session_id.as_str());
            }
            Err(CraftyError::from(StreamError::Backend {
                message: message.clone(),
            })
            .with_context(context))
        }
        _ => Ok(()),
    }
}

/// Turn a crate error into the report `main` prints.
pub fn error_report(err: CraftyError) -> Report {
    let category = err.category();
    let retryable = err.is_retryable();
    error!(
        code = err.error_code(),
        category = %category,
        retryable,
        error = %err,
        "command failed"
    );

    let message = err.user_message();
    let code = format!("error code: {}", err.error_code());
    let suggestion = if retryable {
        format!("{}. The failure looks transient, so retrying may help", err.recovery_hint())
    } else {
        err.recovery_hint().to_string()
    };

    Report::new(err)
        .wrap_err(message)
        .note(code)
        .suggestion(suggestion)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::NetworkError;

    #[test]
    fn test_failed_run_is_backend_error() {
        let request = RunRequest::new("web-agent", "hi").with_session_id("s1");
        let status = RunStatus::Failed {
            message: "model overloaded".to_string(),
        };

        let err = check_run_status(&status, &request).unwrap_err();
        assert!(matches!(
            err.inner(),
            CraftyError::Stream(StreamError::Backend { message }) if message == "model overloaded"
        ));
        let context = err.context().unwrap();
        assert_eq!(context.operation, "run");
        assert_eq!(context.agent_id.as_deref(), Some("web-agent"));
        assert_eq!(context.session_id.as_deref(), Some("s1"));
        assert_eq!(err.error_code(), "E_STREAM_BACKEND");
    }

    #[test]
    fn test_finished_runs_are_ok() {
        let request = RunRequest::new("web-agent", "hi");
        for status in [RunStatus::Completed, RunStatus::Cancelled, RunStatus::Running] {
            assert!(check_run_status(&status, &request).is_ok());
        }
    }

    #[test]
    fn test_error_report_leads_with_user_message() {
        let err: CraftyError = NetworkError::from_status(503, "upstream down").into();
        let expected = err.user_message();

        let report = error_report(err);
        assert_eq!(report.to_string(), expected);
        assert!(matches!(
            report.downcast_ref::<CraftyError>(),
            Some(CraftyError::Network(NetworkError::HttpStatus { status: 503, .. }))
        ));
    }

    #[test]
    fn test_usage_lists_commands() {
        for command in ["replay", "run", "--version", "help"] {
            assert!(USAGE.contains(command));
        }
    }
}

//! Command-line argument parsing for the crafty CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Parse a captured stream body from a file
    Replay {
        path: PathBuf,
        /// Feed the file in chunks of this many bytes (whole file if unset)
        chunk_size: Option<usize>,
    },
    /// Send a message to an agent and stream the answer
    Run {
        agent_id: String,
        message: String,
        session_id: Option<String>,
        user_id: Option<String>,
    },
}

/// Reasons the command line could not be understood.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArgsError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("option {0} needs a value")]
    MissingValue(String),
    #[error("invalid chunk size '{0}': expected a positive integer")]
    InvalidChunkSize(String),
    #[error("unexpected argument '{0}'")]
    Unexpected(String),
}

/// Parse command-line arguments (program name first).
///
/// ```
/// use crafty::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["crafty".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut args = args.skip(1);

    let Some(command) = args.next() else {
        return Ok(CliCommand::Help);
    };

    match command.as_str() {
        "--version" | "-V" | "version" => Ok(CliCommand::Version),
        "--help" | "-h" | "help" => Ok(CliCommand::Help),
        "replay" => parse_replay(args),
        "run" => parse_run(args),
        other => Err(ArgsError::UnknownCommand(other.to_string())),
    }
}

fn parse_replay<I>(mut args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut path = None;
    let mut chunk_size = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--chunk-size" | "-c" => {
                let value = args.next().ok_or(ArgsError::MissingValue(arg.clone()))?;
                chunk_size = Some(parse_chunk_size(&value)?);
            }
            flag if flag.starts_with('-') && flag != "-" => {
                return Err(ArgsError::UnknownOption(flag.to_string()));
            }
            _ if path.is_none() => path = Some(PathBuf::from(arg)),
            _ => return Err(ArgsError::Unexpected(arg)),
        }
    }

    Ok(CliCommand::Replay {
        path: path.ok_or(ArgsError::Missing("<file>"))?,
        chunk_size,
    })
}

fn parse_run<I>(mut args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut positional = Vec::new();
    let mut session_id = None;
    let mut user_id = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--session" | "-s" => {
                session_id = Some(args.next().ok_or(ArgsError::MissingValue(arg.clone()))?);
            }
            "--user" | "-u" => {
                user_id = Some(args.next().ok_or(ArgsError::MissingValue(arg.clone()))?);
            }
            flag if flag.starts_with("--") => {
                return Err(ArgsError::UnknownOption(flag.to_string()));
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let agent_id = positional.next().ok_or(ArgsError::Missing("<agent_id>"))?;
    let message = positional.next().ok_or(ArgsError::Missing("<message>"))?;
    if let Some(extra) = positional.next() {
        return Err(ArgsError::Unexpected(extra));
    }

    Ok(CliCommand::Run {
        agent_id,
        message,
        session_id,
        user_id,
    })
}

fn parse_chunk_size(value: &str) -> Result<usize, ArgsError> {
    value
        .parse::<usize>()
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| ArgsError::InvalidChunkSize(value.to_string()))
}

//! Error types for the drivelink CLI

use std::path::PathBuf;

use drivelink_engine::SessionError;
use drivelink_output::OutputError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Cannot open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input line {line} is not a control sample: {source}")]
    Sample {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid command frame: {0}")]
    Frame(#[source] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Could not connect {driver} output: {reason}")]
    ConnectFailed { driver: String, reason: String },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl CliError {
    /// Process exit code for scripting.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Io { .. } | CliError::Session(SessionError::Io { .. }) => 3,
            CliError::Sample { .. }
            | CliError::Frame(_)
            | CliError::Validation(_)
            | CliError::Session(_) => 4,
            CliError::ConnectFailed { .. } | CliError::Output(_) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn unreadable_session_file_exits_as_io() {
        let err = CliError::from(SessionError::Io {
            path: PathBuf::from("session.json"),
            source: std::io::Error::from(ErrorKind::NotFound),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn exit_codes_by_error_class() -> Result<(), Box<dyn std::error::Error>> {
        let parse = match serde_json::from_str::<serde_json::Value>("{") {
            Err(source) => source,
            Ok(_) => return Err("expected a parse error".into()),
        };
        let session = CliError::from(SessionError::Parse {
            path: PathBuf::from("session.json"),
            source: parse,
        });
        assert_eq!(session.exit_code(), 4);
        assert_eq!(CliError::Validation("bad dt".to_string()).exit_code(), 4);

        let connect = CliError::ConnectFailed {
            driver: "udp".to_string(),
            reason: "unreachable".to_string(),
        };
        assert_eq!(connect.exit_code(), 5);
        assert_eq!(CliError::from(OutputError::NotConnected).exit_code(), 5);
        Ok(())
    }
}

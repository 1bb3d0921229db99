//! Output driver errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad failure class, stable across transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Required setting absent or malformed.
    ConfigMissing,
    /// Could not reach or open the transport, or it is not open.
    ConnectionFailed,
    /// The configured time bound ran out.
    Timeout,
    /// The transport accepted the call but delivery failed.
    TransportError,
    /// The frame could not be encoded.
    EncodingError,
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Unknown output driver: {0} (expected serial, http, udp or debug)")]
    UnknownDriver(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Receiver rejected frame with HTTP status {status}")]
    Rejected { status: u16 },

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Invalid wire frame: expected {expected} bytes, got {actual}")]
    InvalidFrame { expected: usize, actual: usize },
}

impl OutputError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            OutputError::ConfigMissing(_)
            | OutputError::ConfigInvalid(_)
            | OutputError::UnknownDriver(_) => ErrorCategory::ConfigMissing,
            OutputError::ConnectionFailed(_) | OutputError::NotConnected => {
                ErrorCategory::ConnectionFailed
            }
            OutputError::Timeout(_) => ErrorCategory::Timeout,
            OutputError::Transport(_) | OutputError::Rejected { .. } => {
                ErrorCategory::TransportError
            }
            OutputError::Encoding(_) | OutputError::InvalidFrame { .. } => {
                ErrorCategory::EncodingError
            }
        }
    }
}

impl From<std::io::Error> for OutputError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                OutputError::Timeout(err.to_string())
            }
            _ => OutputError::Transport(err.to_string()),
        }
    }
}

impl From<serialport::Error> for OutputError {
    fn from(err: serialport::Error) -> Self {
        match err.kind() {
            serialport::ErrorKind::InvalidInput => OutputError::ConfigInvalid(err.to_string()),
            _ => OutputError::ConnectionFailed(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for OutputError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OutputError::Timeout(err.to_string())
        } else if err.is_connect() {
            OutputError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            OutputError::ConfigInvalid(err.to_string())
        } else {
            OutputError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            OutputError::ConfigMissing("port").category(),
            ErrorCategory::ConfigMissing
        );
        assert_eq!(
            OutputError::NotConnected.category(),
            ErrorCategory::ConnectionFailed
        );
        assert_eq!(
            OutputError::Rejected { status: 500 }.category(),
            ErrorCategory::TransportError
        );
        assert_eq!(
            OutputError::InvalidFrame {
                expected: 5,
                actual: 4
            }
            .category(),
            ErrorCategory::EncodingError
        );
    }

    #[test]
    fn test_io_timeout_maps_to_timeout() {
        let err = OutputError::from(std::io::Error::new(std::io::ErrorKind::TimedOut, "slow"));
        assert!(matches!(err, OutputError::Timeout(_)));
        assert_eq!(err.category(), ErrorCategory::Timeout);
    }

    #[test]
    fn test_io_other_maps_to_transport() {
        let err = OutputError::from(std::io::Error::other("boom"));
        assert!(matches!(err, OutputError::Transport(_)));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            OutputError::ConfigMissing("port").to_string(),
            "Missing configuration: port"
        );
        assert_eq!(
            OutputError::Rejected { status: 503 }.to_string(),
            "Receiver rejected frame with HTTP status 503"
        );
    }
}

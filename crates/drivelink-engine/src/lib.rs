//! DriveLink drive loop
//!
//! A [`DriveSession`] owns one driving mode and one output dispatcher and runs
//! the per-tick pipeline: control sample in, mode step with the measured
//! elapsed time, frame out to the connected driver.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

mod config;
mod session;

pub use config::SessionConfig;
pub use session::{DriveSession, SessionStats, TickReport};

use std::path::PathBuf;

use drivelink_modes::ModeError;
use drivelink_output::OutputError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Mode(#[from] ModeError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type SessionResult<T> = Result<T, SessionError>;

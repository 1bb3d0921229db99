//! Session configuration file
//!
//! ```json
//! {
//!   "mode": "carsim",
//!   "output": { "driver_type": "udp", "host": "192.168.4.1" },
//!   "carsim": { "inertia": 0.9 }
//! }
//! ```

use std::path::Path;

use drivelink_modes::{CarSimConfig, ModeKind};
use drivelink_output::DriverConfig;
use serde::{Deserialize, Serialize};

use crate::{SessionError, SessionResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: ModeKind,
    pub output: DriverConfig,
    pub carsim: CarSimConfig,
}

impl SessionConfig {
    /// Read and validate a session file.
    ///
    /// # Errors
    ///
    /// I/O and JSON failures carry the path; physics parameters out of range
    /// are reported as [`SessionError::Mode`].
    pub fn load(path: &Path) -> SessionResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SessionConfig =
            serde_json::from_str(&text).map_err(|source| SessionError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.carsim.validate()?;
        Ok(config)
    }

    /// Write as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> SessionResult<()> {
        let text = serde_json::to_string_pretty(self).map_err(|source| SessionError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, text).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

//! Output layer for DriveLink
//!
//! Delivers command frames to the vehicle over one of four transports:
//!
//! | Driver   | Wire format                          |
//! |----------|--------------------------------------|
//! | `serial` | one JSON object per line             |
//! | `http`   | JSON body, `POST {endpoint}`         |
//! | `udp`    | 5-byte little-endian [`UdpCommand`]  |
//! | `debug`  | none, the frame is kept in memory    |
//!
//! All driver calls are blocking and run on the caller's thread. Failures are
//! reported as `false` plus a message in [`DriverStatus::error`]; nothing
//! panics or returns an error across the driver boundary.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod drivers;
pub mod error;
pub mod status;

pub use codec::{UDP_FRAME_LEN, UdpCommand};
pub use config::{DebugConfig, DriverConfig, DriverKind, HttpConfig, SerialConfig, UdpConfig};
pub use dispatcher::{DriverInfo, OutputDispatcher, available_drivers};
pub use drivers::{DebugDriver, Driver, HttpDriver, OutputDriver, SerialDriver, UdpDriver};
pub use error::{ErrorCategory, OutputError};
pub use status::{DriverStatus, StatusDetails};

pub type OutputResult<T> = Result<T, OutputError>;

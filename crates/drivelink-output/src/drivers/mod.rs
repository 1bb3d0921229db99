//! Output drivers
//!
//! Every transport implements [`OutputDriver`]. The boolean methods are the
//! boundary contract: they never panic and never return an error value, the
//! failure is kept in [`DriverStatus::error`] and in
//! [`OutputDriver::last_error`] instead.

mod debug;
mod http;
mod serial;
mod udp;

pub use debug::DebugDriver;
pub use http::{HEALTH_PATH, HttpDriver};
pub use serial::{PortOpener, SerialDriver, SerialSink};
pub use udp::UdpDriver;

use drivelink_types::CommandFrame;
use tracing::warn;

use crate::config::{DriverConfig, DriverKind};
use crate::error::OutputError;
use crate::status::DriverStatus;

/// Synchronous output transport.
pub trait OutputDriver {
    fn kind(&self) -> DriverKind;

    /// Open the transport. Returns `true` once ready to send.
    fn connect(&mut self) -> bool;

    /// Release the transport. Safe to call when already disconnected.
    fn disconnect(&mut self) -> bool;

    /// Deliver one frame. A failure leaves the driver disconnected.
    fn send(&mut self, frame: &CommandFrame) -> bool;

    fn is_connected(&self) -> bool;

    fn status(&self) -> DriverStatus;

    fn last_error(&self) -> Option<&OutputError>;
}

/// Turn an internal result into the boolean contract, recording the error.
pub(crate) fn settle(
    kind: DriverKind,
    op: &'static str,
    result: Result<(), OutputError>,
    slot: &mut Option<OutputError>,
) -> bool {
    match result {
        Ok(()) => {
            *slot = None;
            true
        }
        Err(error) => {
            warn!(
                driver = kind.as_str(),
                op,
                category = ?error.category(),
                error = %error,
                "Output driver operation failed"
            );
            *slot = Some(error);
            false
        }
    }
}

/// The active transport.
pub enum Driver {
    Serial(SerialDriver),
    Http(HttpDriver),
    Udp(UdpDriver),
    Debug(DebugDriver),
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("kind", &self.kind())
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Driver {
    /// Build an unconnected driver. Nothing touches the network here.
    pub fn from_config(config: DriverConfig) -> Self {
        match config {
            DriverConfig::Serial(c) => Driver::Serial(SerialDriver::new(c)),
            DriverConfig::Http(c) => Driver::Http(HttpDriver::new(c)),
            DriverConfig::Udp(c) => Driver::Udp(UdpDriver::new(c)),
            DriverConfig::Debug(_) => Driver::Debug(DebugDriver::new()),
        }
    }

    /// The in-memory sink, when that is the active driver.
    pub fn as_debug(&self) -> Option<&DebugDriver> {
        match self {
            Driver::Debug(driver) => Some(driver),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn OutputDriver {
        match self {
            Driver::Serial(d) => d,
            Driver::Http(d) => d,
            Driver::Udp(d) => d,
            Driver::Debug(d) => d,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn OutputDriver {
        match self {
            Driver::Serial(d) => d,
            Driver::Http(d) => d,
            Driver::Udp(d) => d,
            Driver::Debug(d) => d,
        }
    }
}

impl OutputDriver for Driver {
    fn kind(&self) -> DriverKind {
        self.inner().kind()
    }

    fn connect(&mut self) -> bool {
        self.inner_mut().connect()
    }

    fn disconnect(&mut self) -> bool {
        self.inner_mut().disconnect()
    }

    fn send(&mut self, frame: &CommandFrame) -> bool {
        self.inner_mut().send(frame)
    }

    fn is_connected(&self) -> bool {
        self.inner().is_connected()
    }

    fn status(&self) -> DriverStatus {
        self.inner().status()
    }

    fn last_error(&self) -> Option<&OutputError> {
        self.inner().last_error()
    }
}

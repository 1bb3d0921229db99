//! Routes command frames to the one active driver

use drivelink_types::CommandFrame;
use tracing::{info, warn};

use crate::config::{DriverConfig, DriverKind};
use crate::drivers::{Driver, OutputDriver};
use crate::error::OutputError;
use crate::status::DriverStatus;

/// Name and description of a selectable transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverInfo {
    pub kind: DriverKind,
    pub description: &'static str,
}

/// Every transport that can be selected.
pub fn available_drivers() -> Vec<DriverInfo> {
    DriverKind::ALL
        .into_iter()
        .map(|kind| DriverInfo {
            kind,
            description: kind.description(),
        })
        .collect()
}

/// Owns the active output driver.
///
/// The dispatcher never retries or buffers: `send` returns exactly what the
/// driver returned. Switching drivers does not connect the new one.
#[derive(Debug)]
pub struct OutputDispatcher {
    driver: Driver,
    last_switch_error: Option<String>,
}

impl Default for OutputDispatcher {
    fn default() -> Self {
        Self::new(DriverConfig::default())
    }
}

impl OutputDispatcher {
    pub fn new(config: DriverConfig) -> Self {
        Self::with_driver(Driver::from_config(config))
    }

    /// Wrap an already built driver, e.g. a serial driver with a custom opener.
    pub fn with_driver(driver: Driver) -> Self {
        Self {
            driver,
            last_switch_error: None,
        }
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn kind(&self) -> DriverKind {
        self.driver.kind()
    }

    /// Replace the active driver, disconnecting the old one first.
    ///
    /// A failed disconnect is logged and kept in
    /// [`last_switch_error`](Self::last_switch_error); the switch still happens.
    pub fn switch_driver(&mut self, config: DriverConfig) {
        self.last_switch_error = None;
        if self.driver.is_connected() && !self.driver.disconnect() {
            let message = self
                .driver
                .last_error()
                .map_or_else(|| "disconnect failed".to_string(), ToString::to_string);
            warn!(
                driver = self.driver.kind().as_str(),
                error = %message,
                "Previous output driver did not disconnect cleanly"
            );
            self.last_switch_error = Some(message);
        }

        let from = self.driver.kind();
        self.driver = Driver::from_config(config);
        info!(from = from.as_str(), to = self.driver.kind().as_str(), "Output driver switched");
    }

    /// Switch by transport keyword with optional untagged settings.
    ///
    /// # Errors
    ///
    /// [`OutputError::UnknownDriver`] for an unrecognized keyword and
    /// [`OutputError::ConfigInvalid`] for malformed settings. In both cases the
    /// current driver is left untouched.
    pub fn switch_driver_by_name(
        &mut self,
        name: &str,
        settings: Option<serde_json::Value>,
    ) -> Result<(), OutputError> {
        let kind: DriverKind = name.parse()?;
        let config = DriverConfig::from_value(kind, settings)?;
        self.switch_driver(config);
        Ok(())
    }

    pub fn last_switch_error(&self) -> Option<&str> {
        self.last_switch_error.as_deref()
    }

    pub fn connect(&mut self) -> bool {
        self.driver.connect()
    }

    pub fn disconnect(&mut self) -> bool {
        self.driver.disconnect()
    }

    pub fn send(&mut self, frame: &CommandFrame) -> bool {
        self.driver.send(frame)
    }

    pub fn is_connected(&self) -> bool {
        self.driver.is_connected()
    }

    pub fn status(&self) -> DriverStatus {
        self.driver.status()
    }
}

use drivelink_types::CommandFrame;
use tracing::{debug, info};

use super::{OutputDriver, settle};
use crate::config::DriverKind;
use crate::error::OutputError;
use crate::status::{DriverStatus, StatusDetails};

/// In-memory sink for bench testing and dashboards.
#[derive(Debug, Default)]
pub struct DebugDriver {
    connected: bool,
    last_frame: Option<CommandFrame>,
    frames_received: u64,
    error: Option<OutputError>,
}

impl DebugDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&CommandFrame> {
        self.last_frame.as_ref()
    }

    /// Total frames accepted since construction.
    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }

    fn try_send(&mut self, frame: &CommandFrame) -> Result<(), OutputError> {
        if !self.connected {
            return Err(OutputError::NotConnected);
        }
        self.frames_received += 1;
        debug!(frame = self.frames_received, channels = frame.len(), "Debug frame");
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}

impl OutputDriver for DebugDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Debug
    }

    fn connect(&mut self) -> bool {
        self.connected = true;
        self.last_frame = None;
        self.error = None;
        info!("Debug output ready");
        true
    }

    fn disconnect(&mut self) -> bool {
        self.connected = false;
        true
    }

    fn send(&mut self, frame: &CommandFrame) -> bool {
        let result = self.try_send(frame);
        settle(DriverKind::Debug, "send", result, &mut self.error)
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn status(&self) -> DriverStatus {
        DriverStatus {
            driver: DriverKind::Debug,
            connected: self.connected,
            error: self.error.as_ref().map(ToString::to_string),
            details: StatusDetails::Debug {
                frames_received: self.frames_received,
                last_frame: self
                    .last_frame
                    .as_ref()
                    .and_then(|f| serde_json::to_value(f).ok()),
            },
        }
    }

    fn last_error(&self) -> Option<&OutputError> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivelink_types::channels;

    #[test]
    fn test_send_requires_connect() {
        let mut driver = DebugDriver::new();
        assert!(!driver.send(&CommandFrame::new()));
        assert!(matches!(driver.last_error(), Some(OutputError::NotConnected)));
        assert!(driver.status().error.is_some());
    }

    #[test]
    fn test_keeps_last_frame_and_counts() {
        let mut driver = DebugDriver::new();
        assert!(driver.connect());
        for i in 0..3 {
            let frame = CommandFrame::new().with(channels::THROTTLE, f64::from(i) / 10.0);
            assert!(driver.send(&frame));
        }
        assert_eq!(driver.frames_received(), 3);
        assert_eq!(
            driver.last_frame().and_then(|f| f.axis(channels::THROTTLE)),
            Some(0.2)
        );
        assert!(driver.status().is_healthy());
    }

    #[test]
    fn test_reconnect_clears_last_frame_keeps_counter() {
        let mut driver = DebugDriver::new();
        driver.connect();
        driver.send(&CommandFrame::new());
        driver.disconnect();
        driver.connect();
        assert!(driver.last_frame().is_none());
        assert_eq!(driver.frames_received(), 1);
    }
}

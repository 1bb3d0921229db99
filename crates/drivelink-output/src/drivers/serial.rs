use std::io::Write;

use drivelink_types::CommandFrame;
use tracing::{debug, info};

use super::{OutputDriver, settle};
use crate::config::{DriverKind, SerialConfig};
use crate::error::OutputError;
use crate::status::{DriverStatus, StatusDetails};

/// Byte sink the serial driver writes frames to.
pub type SerialSink = Box<dyn Write + Send>;

/// Opens the sink for a config. Swappable so the driver can run without hardware.
pub type PortOpener = Box<dyn Fn(&SerialConfig) -> Result<SerialSink, OutputError> + Send>;

fn open_port(config: &SerialConfig) -> Result<SerialSink, OutputError> {
    let path = config
        .port
        .as_deref()
        .ok_or(OutputError::ConfigMissing("port"))?;
    let port = serialport::new(path, config.baudrate)
        .timeout(config.timeout())
        .open()?;
    Ok(Box::new(port))
}

/// Newline-delimited JSON over a serial port.
pub struct SerialDriver {
    config: SerialConfig,
    opener: PortOpener,
    port: Option<SerialSink>,
    error: Option<OutputError>,
}

impl std::fmt::Debug for SerialDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialDriver")
            .field("config", &self.config)
            .field("open", &self.port.is_some())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl SerialDriver {
    pub fn new(config: SerialConfig) -> Self {
        Self::with_opener(config, Box::new(open_port))
    }

    pub fn with_opener(config: SerialConfig, opener: PortOpener) -> Self {
        Self {
            config,
            opener,
            port: None,
            error: None,
        }
    }

    /// Serial port names present on this machine.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Transport`] if the OS cannot enumerate ports.
    pub fn available_ports() -> Result<Vec<String>, OutputError> {
        let ports = serialport::available_ports()
            .map_err(|e| OutputError::Transport(e.to_string()))?;
        Ok(ports.into_iter().map(|p| p.port_name).collect())
    }

    /// One JSON object terminated by `\n`.
    pub fn encode_line(frame: &CommandFrame) -> Result<Vec<u8>, OutputError> {
        let mut line = serde_json::to_vec(frame)?;
        line.push(b'\n');
        Ok(line)
    }

    fn try_connect(&mut self) -> Result<(), OutputError> {
        if self.port.is_some() {
            return Ok(());
        }
        let port = (self.opener)(&self.config)?;
        info!(
            port = self.config.port.as_deref().unwrap_or("<none>"),
            baudrate = self.config.baudrate,
            "Serial port opened"
        );
        self.port = Some(port);
        Ok(())
    }

    fn try_send(&mut self, frame: &CommandFrame) -> Result<(), OutputError> {
        let line = Self::encode_line(frame)?;
        let port = self.port.as_mut().ok_or(OutputError::NotConnected)?;
        let written = port.write_all(&line).and_then(|()| port.flush());
        if let Err(e) = written {
            self.port = None;
            return Err(e.into());
        }
        debug!(bytes = line.len(), "Serial frame written");
        Ok(())
    }
}

impl OutputDriver for SerialDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Serial
    }

    fn connect(&mut self) -> bool {
        let result = self.try_connect();
        settle(DriverKind::Serial, "connect", result, &mut self.error)
    }

    fn disconnect(&mut self) -> bool {
        if self.port.take().is_some() {
            info!("Serial port closed");
        }
        true
    }

    fn send(&mut self, frame: &CommandFrame) -> bool {
        let result = self.try_send(frame);
        settle(DriverKind::Serial, "send", result, &mut self.error)
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    fn status(&self) -> DriverStatus {
        DriverStatus {
            driver: DriverKind::Serial,
            connected: self.is_connected(),
            error: self.error.as_ref().map(ToString::to_string),
            details: StatusDetails::Serial {
                port: self.config.port.clone(),
                baudrate: self.config.baudrate,
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
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0
                .lock()
                .map_err(|_| std::io::Error::other("poisoned"))?
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "unplugged"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn config() -> SerialConfig {
        SerialConfig {
            port: Some("/dev/ttyTEST".to_string()),
            ..SerialConfig::default()
        }
    }

    #[test]
    fn test_missing_port_fails_connect() {
        let mut driver = SerialDriver::new(SerialConfig::default());
        assert!(!driver.connect());
        assert!(matches!(
            driver.last_error(),
            Some(OutputError::ConfigMissing("port"))
        ));
        assert!(!driver.status().connected);
    }

    #[test]
    fn test_writes_one_json_line_per_frame() -> Result<(), Box<dyn std::error::Error>> {
        let buffer = SharedBuffer::default();
        let sink = buffer.clone();
        let mut driver = SerialDriver::with_opener(
            config(),
            Box::new(move |_: &SerialConfig| Ok(Box::new(sink.clone()) as SerialSink)),
        );
        assert!(driver.connect());
        assert!(driver.send(&CommandFrame::new().with(channels::THROTTLE, 0.25)));
        assert!(driver.send(&CommandFrame::new().with(channels::BRAKE, true)));

        let written = buffer.0.lock().map_err(|e| e.to_string())?.clone();
        let text = String::from_utf8(written)?;
        assert_eq!(text, "{\"throttle\":0.25}\n{\"brake\":true}\n");
        Ok(())
    }

    #[test]
    fn test_write_failure_disconnects() {
        let mut driver = SerialDriver::with_opener(
            config(),
            Box::new(|_: &SerialConfig| Ok(Box::new(BrokenPipe) as SerialSink)),
        );
        assert!(driver.connect());
        assert!(!driver.send(&CommandFrame::new()));
        assert!(!driver.is_connected());
        assert!(matches!(driver.last_error(), Some(OutputError::Transport(_))));
    }

    #[test]
    fn test_send_without_connect() {
        let mut driver = SerialDriver::new(config());
        assert!(!driver.send(&CommandFrame::new()));
        assert!(matches!(driver.last_error(), Some(OutputError::NotConnected)));
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let mut driver = SerialDriver::with_opener(
            config(),
            Box::new(|_: &SerialConfig| Ok(Box::new(std::io::sink()) as SerialSink)),
        );
        assert!(driver.disconnect());
        assert!(driver.connect());
        assert!(driver.disconnect());
        assert!(driver.disconnect());
        assert!(!driver.is_connected());
    }
}

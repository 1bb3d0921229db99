use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use drivelink_types::CommandFrame;
use tracing::{info, trace};

use super::{OutputDriver, settle};
use crate::codec::{UDP_FRAME_LEN, UdpCommand};
use crate::config::{DriverKind, UdpConfig};
use crate::error::OutputError;
use crate::status::{DriverStatus, StatusDetails};

/// Fire-and-forget binary datagrams, see [`UdpCommand`] for the layout.
#[derive(Debug)]
pub struct UdpDriver {
    config: UdpConfig,
    link: Option<(UdpSocket, SocketAddr)>,
    packets_sent: u64,
    error: Option<OutputError>,
}

impl UdpDriver {
    pub fn new(config: UdpConfig) -> Self {
        Self {
            config,
            link: None,
            packets_sent: 0,
            error: None,
        }
    }

    /// Resolved receiver address while connected.
    pub fn peer(&self) -> Option<SocketAddr> {
        self.link.as_ref().map(|(_, peer)| *peer)
    }

    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }

    fn try_connect(&mut self) -> Result<(), OutputError> {
        self.link = None;
        if self.config.host.trim().is_empty() {
            return Err(OutputError::ConfigMissing("host"));
        }

        let peer = (self.config.host.as_str(), self.config.port)
            .to_socket_addrs()
            .map_err(|e| OutputError::ConnectionFailed(format!("{}: {e}", self.config.host)))?
            .next()
            .ok_or_else(|| {
                OutputError::ConnectionFailed(format!("{} did not resolve", self.config.host))
            })?;

        let local: SocketAddr = if peer.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket =
            UdpSocket::bind(local).map_err(|e| OutputError::ConnectionFailed(e.to_string()))?;
        socket.set_write_timeout(self.config.timeout())?;

        info!(peer = %peer, "UDP output ready");
        self.link = Some((socket, peer));
        Ok(())
    }

    fn try_send(&mut self, frame: &CommandFrame) -> Result<(), OutputError> {
        let (socket, peer) = self.link.as_ref().ok_or(OutputError::NotConnected)?;
        let command = UdpCommand::from_frame(frame);
        let bytes = command.encode();

        match socket.send_to(&bytes, *peer) {
            Ok(UDP_FRAME_LEN) => {
                self.packets_sent += 1;
                trace!(?command, "UDP frame sent");
                Ok(())
            }
            Ok(written) => {
                self.link = None;
                Err(OutputError::Transport(format!(
                    "short datagram: {written} of {UDP_FRAME_LEN} bytes"
                )))
            }
            Err(e) => {
                self.link = None;
                Err(e.into())
            }
        }
    }
}

impl OutputDriver for UdpDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Udp
    }

    fn connect(&mut self) -> bool {
        let result = self.try_connect();
        settle(DriverKind::Udp, "connect", result, &mut self.error)
    }

    fn disconnect(&mut self) -> bool {
        if self.link.take().is_some() {
            info!("UDP socket closed");
        }
        true
    }

    fn send(&mut self, frame: &CommandFrame) -> bool {
        let result = self.try_send(frame);
        settle(DriverKind::Udp, "send", result, &mut self.error)
    }

    fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    fn status(&self) -> DriverStatus {
        DriverStatus {
            driver: DriverKind::Udp,
            connected: self.is_connected(),
            error: self.error.as_ref().map(ToString::to_string),
            details: StatusDetails::Udp {
                host: self.config.host.clone(),
                port: self.config.port,
                timeout: self.config.timeout,
                packets_sent: self.packets_sent,
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

    #[test]
    fn test_empty_host_fails_connect() {
        let mut driver = UdpDriver::new(UdpConfig {
            host: String::new(),
            ..UdpConfig::default()
        });
        assert!(!driver.connect());
        assert!(matches!(
            driver.last_error(),
            Some(OutputError::ConfigMissing("host"))
        ));
    }

    #[test]
    fn test_connect_resolves_peer_without_traffic() {
        let mut driver = UdpDriver::new(UdpConfig {
            host: "127.0.0.1".to_string(),
            port: 4210,
            timeout: 0.5,
        });
        assert!(driver.connect());
        assert_eq!(driver.peer(), Some(SocketAddr::from(([127, 0, 0, 1], 4210))));
        assert_eq!(driver.packets_sent(), 0);
        assert!(driver.disconnect());
        assert_eq!(driver.peer(), None);
    }

    #[test]
    fn test_send_without_connect() {
        let mut driver = UdpDriver::new(UdpConfig::default());
        assert!(!driver.send(&CommandFrame::new()));
        assert!(matches!(driver.last_error(), Some(OutputError::NotConnected)));
    }
}

use drivelink_types::CommandFrame;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::{debug, info};

use super::{OutputDriver, settle};
use crate::config::{DriverKind, HttpConfig};
use crate::error::OutputError;
use crate::status::{DriverStatus, StatusDetails};

/// Liveness endpoint checked on connect.
pub const HEALTH_PATH: &str = "/health";

const ACCEPTED: [StatusCode; 4] = [
    StatusCode::OK,
    StatusCode::CREATED,
    StatusCode::ACCEPTED,
    StatusCode::NO_CONTENT,
];

struct Session {
    client: Client,
    control_url: String,
}

/// JSON POST per frame to an HTTP receiver.
pub struct HttpDriver {
    config: HttpConfig,
    session: Option<Session>,
    last_status: Option<u16>,
    error: Option<OutputError>,
}

impl std::fmt::Debug for HttpDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDriver")
            .field("config", &self.config)
            .field("connected", &self.session.is_some())
            .field("last_status", &self.last_status)
            .finish_non_exhaustive()
    }
}

impl HttpDriver {
    pub fn new(config: HttpConfig) -> Self {
        Self {
            config,
            session: None,
            last_status: None,
            error: None,
        }
    }

    fn try_connect(&mut self) -> Result<(), OutputError> {
        self.session = None;
        let base = self
            .config
            .base_url()
            .ok_or(OutputError::ConfigMissing("host"))?;

        let mut builder = Client::builder();
        if let Some(timeout) = self.config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let health_url = format!("{base}{HEALTH_PATH}");
        let response = client.get(&health_url).send()?;
        let status = response.status();
        self.last_status = Some(status.as_u16());
        if status != StatusCode::OK {
            return Err(OutputError::ConnectionFailed(format!(
                "{health_url} returned {status}"
            )));
        }

        info!(url = %base, "HTTP receiver reachable");
        self.session = Some(Session {
            client,
            control_url: format!("{base}{}", self.config.endpoint),
        });
        Ok(())
    }

    fn try_send(&mut self, frame: &CommandFrame) -> Result<(), OutputError> {
        let session = self.session.as_ref().ok_or(OutputError::NotConnected)?;
        let result = session
            .client
            .post(&session.control_url)
            .json(frame)
            .send()
            .map_err(OutputError::from)
            .and_then(|response| {
                let status = response.status();
                self.last_status = Some(status.as_u16());
                if ACCEPTED.contains(&status) {
                    Ok(())
                } else {
                    Err(OutputError::Rejected {
                        status: status.as_u16(),
                    })
                }
            });

        match result {
            Ok(()) => {
                debug!(status = ?self.last_status, "HTTP frame accepted");
                Ok(())
            }
            Err(e) => {
                self.session = None;
                Err(e)
            }
        }
    }
}

impl OutputDriver for HttpDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Http
    }

    fn connect(&mut self) -> bool {
        let result = self.try_connect();
        settle(DriverKind::Http, "connect", result, &mut self.error)
    }

    fn disconnect(&mut self) -> bool {
        if self.session.take().is_some() {
            info!("HTTP session closed");
        }
        true
    }

    fn send(&mut self, frame: &CommandFrame) -> bool {
        let result = self.try_send(frame);
        settle(DriverKind::Http, "send", result, &mut self.error)
    }

    fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    fn status(&self) -> DriverStatus {
        DriverStatus {
            driver: DriverKind::Http,
            connected: self.is_connected(),
            error: self.error.as_ref().map(ToString::to_string),
            details: StatusDetails::Http {
                url: self
                    .config
                    .base_url()
                    .map(|base| format!("{base}{}", self.config.endpoint)),
                timeout: self.config.timeout,
                last_status: self.last_status,
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
    fn test_missing_host_fails_connect() {
        let mut driver = HttpDriver::new(HttpConfig::default());
        assert!(!driver.connect());
        assert!(matches!(
            driver.last_error(),
            Some(OutputError::ConfigMissing("host"))
        ));
        assert_eq!(
            driver.status().error.as_deref(),
            Some("Missing configuration: host")
        );
    }

    #[test]
    fn test_send_without_connect() {
        let mut driver = HttpDriver::new(HttpConfig::default());
        assert!(!driver.send(&CommandFrame::new()));
        assert!(matches!(driver.last_error(), Some(OutputError::NotConnected)));
    }

    #[test]
    fn test_status_reports_control_url() {
        let driver = HttpDriver::new(HttpConfig {
            host: Some("10.0.0.7".to_string()),
            ..HttpConfig::default()
        });
        let StatusDetails::Http { url, .. } = driver.status().details else {
            panic!("expected http details");
        };
        assert_eq!(url.as_deref(), Some("http://10.0.0.7:8000/control"));
    }
}

//! Output driver configuration
//!
//! Each transport has its own settings struct. [`DriverConfig`] ties them
//! together and is what gets stored on disk:
//!
//! ```json
//! { "driver_type": "udp", "host": "192.168.4.1", "port": 4210 }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::OutputError;

/// Transport keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Serial,
    Http,
    Udp,
    Debug,
}

impl DriverKind {
    pub const ALL: [DriverKind; 4] = [
        DriverKind::Serial,
        DriverKind::Http,
        DriverKind::Udp,
        DriverKind::Debug,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DriverKind::Serial => "serial",
            DriverKind::Http => "http",
            DriverKind::Udp => "udp",
            DriverKind::Debug => "debug",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DriverKind::Serial => "Newline-delimited JSON over a serial port",
            DriverKind::Http => "JSON POST to an HTTP endpoint",
            DriverKind::Udp => "5-byte binary datagram for embedded receivers",
            DriverKind::Debug => "Keeps the last frame in memory, sends nothing",
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverKind {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serial" => Ok(DriverKind::Serial),
            "http" => Ok(DriverKind::Http),
            "udp" => Ok(DriverKind::Udp),
            "debug" => Ok(DriverKind::Debug),
            _ => Err(OutputError::UnknownDriver(s.to_string())),
        }
    }
}

fn secs_to_duration(secs: f64) -> Option<Duration> {
    if secs.is_finite() && secs > 0.0 {
        Some(Duration::from_secs_f64(secs))
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path such as `/dev/ttyUSB0` or `COM3`. Required to connect.
    pub port: Option<String>,
    pub baudrate: u32,
    /// Write timeout in seconds.
    pub timeout: f64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baudrate: 9600,
            timeout: 1.0,
        }
    }
}

impl SerialConfig {
    pub fn timeout(&self) -> Duration {
        secs_to_duration(self.timeout).unwrap_or(Duration::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Receiver host name or address. Required to connect.
    pub host: Option<String>,
    pub port: u16,
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout: f64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 8000,
            endpoint: "/control".to_string(),
            timeout: 2.0,
        }
    }
}

impl HttpConfig {
    /// `http://host:port`, or `None` without a host.
    pub fn base_url(&self) -> Option<String> {
        self.host
            .as_deref()
            .map(|host| format!("http://{host}:{}", self.port))
    }

    pub fn timeout(&self) -> Option<Duration> {
        secs_to_duration(self.timeout)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UdpConfig {
    pub host: String,
    pub port: u16,
    /// Send timeout in seconds. Zero disables it.
    pub timeout: f64,
}

impl Default for UdpConfig {
    fn default() -> Self {
        Self {
            host: "192.168.4.1".to_string(),
            port: 4210,
            timeout: 0.5,
        }
    }
}

impl UdpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        secs_to_duration(self.timeout)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugConfig {}

/// Settings for one driver, tagged with its transport keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "driver_type", rename_all = "lowercase")]
pub enum DriverConfig {
    Serial(SerialConfig),
    Http(HttpConfig),
    Udp(UdpConfig),
    Debug(DebugConfig),
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig::Debug(DebugConfig::default())
    }
}

impl DriverConfig {
    pub fn default_for(kind: DriverKind) -> Self {
        match kind {
            DriverKind::Serial => DriverConfig::Serial(SerialConfig::default()),
            DriverKind::Http => DriverConfig::Http(HttpConfig::default()),
            DriverKind::Udp => DriverConfig::Udp(UdpConfig::default()),
            DriverKind::Debug => DriverConfig::Debug(DebugConfig::default()),
        }
    }

    /// Build the config for `kind` from an untagged settings object.
    ///
    /// `None` gives the defaults. Unknown keys are ignored.
    pub fn from_value(
        kind: DriverKind,
        settings: Option<serde_json::Value>,
    ) -> Result<Self, OutputError> {
        let Some(settings) = settings else {
            return Ok(Self::default_for(kind));
        };
        let invalid = |e: serde_json::Error| OutputError::ConfigInvalid(format!("{kind}: {e}"));
        let config = match kind {
            DriverKind::Serial => {
                DriverConfig::Serial(serde_json::from_value(settings).map_err(invalid)?)
            }
            DriverKind::Http => {
                DriverConfig::Http(serde_json::from_value(settings).map_err(invalid)?)
            }
            DriverKind::Udp => {
                DriverConfig::Udp(serde_json::from_value(settings).map_err(invalid)?)
            }
            DriverKind::Debug => DriverConfig::Debug(DebugConfig::default()),
        };
        Ok(config)
    }

    pub fn kind(&self) -> DriverKind {
        match self {
            DriverConfig::Serial(_) => DriverKind::Serial,
            DriverConfig::Http(_) => DriverKind::Http,
            DriverConfig::Udp(_) => DriverKind::Udp,
            DriverConfig::Debug(_) => DriverKind::Debug,
        }
    }

    pub fn load(path: &Path) -> Result<Self, OutputError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| OutputError::ConfigInvalid(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| OutputError::ConfigInvalid(format!("{}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<(), OutputError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)
            .map_err(|e| OutputError::ConfigInvalid(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_kind_parse() -> Result<(), OutputError> {
        for kind in DriverKind::ALL {
            assert_eq!(kind.as_str().parse::<DriverKind>()?, kind);
        }
        assert_eq!("UDP".parse::<DriverKind>()?, DriverKind::Udp);
        assert!(matches!(
            "bluetooth".parse::<DriverKind>(),
            Err(OutputError::UnknownDriver(_))
        ));
        Ok(())
    }

    #[test]
    fn test_defaults() {
        let udp = UdpConfig::default();
        assert_eq!(udp.host, "192.168.4.1");
        assert_eq!(udp.port, 4210);
        assert_eq!(udp.timeout(), Some(Duration::from_millis(500)));

        let http = HttpConfig::default();
        assert_eq!(http.endpoint, "/control");
        assert_eq!(http.base_url(), None);

        assert_eq!(SerialConfig::default().baudrate, 9600);
    }

    #[test]
    fn test_tagged_json() -> Result<(), Box<dyn std::error::Error>> {
        let config: DriverConfig =
            serde_json::from_str(r#"{"driver_type": "http", "host": "car.local"}"#)?;
        let DriverConfig::Http(http) = &config else {
            return Err("expected http config".into());
        };
        assert_eq!(http.base_url().as_deref(), Some("http://car.local:8000"));
        assert_eq!(config.kind(), DriverKind::Http);
        Ok(())
    }

    #[test]
    fn test_from_value() -> Result<(), OutputError> {
        let config =
            DriverConfig::from_value(DriverKind::Udp, Some(serde_json::json!({"port": 9000})))?;
        assert_eq!(
            config,
            DriverConfig::Udp(UdpConfig {
                port: 9000,
                ..UdpConfig::default()
            })
        );
        assert_eq!(
            DriverConfig::from_value(DriverKind::Serial, None)?,
            DriverConfig::Serial(SerialConfig::default())
        );
        Ok(())
    }

    #[test]
    fn test_from_value_rejects_wrong_types() {
        let result =
            DriverConfig::from_value(DriverKind::Udp, Some(serde_json::json!({"port": "high"})));
        assert!(matches!(result, Err(OutputError::ConfigInvalid(_))));
    }

    #[test]
    fn test_zero_timeout_disables() {
        let udp = UdpConfig {
            timeout: 0.0,
            ..UdpConfig::default()
        };
        assert_eq!(udp.timeout(), None);
    }
}

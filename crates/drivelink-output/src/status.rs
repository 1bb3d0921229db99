//! Driver status snapshots

use serde::Serialize;

use crate::config::DriverKind;

/// Point-in-time view of a driver.
///
/// `connected` is true only between a successful `connect` and the next
/// `disconnect` or failed `send`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverStatus {
    #[serde(rename = "type")]
    pub driver: DriverKind,
    pub connected: bool,
    /// Most recent failure, if any.
    pub error: Option<String>,
    #[serde(flatten)]
    pub details: StatusDetails,
}

impl DriverStatus {
    pub fn is_healthy(&self) -> bool {
        self.connected && self.error.is_none()
    }
}

/// Transport-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatusDetails {
    Serial {
        port: Option<String>,
        baudrate: u32,
    },
    Http {
        url: Option<String>,
        timeout: f64,
        last_status: Option<u16>,
    },
    Udp {
        host: String,
        port: u16,
        timeout: f64,
        packets_sent: u64,
    },
    Debug {
        frames_received: u64,
        last_frame: Option<serde_json::Value>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_flattens_details() -> Result<(), Box<dyn std::error::Error>> {
        let status = DriverStatus {
            driver: DriverKind::Udp,
            connected: true,
            error: None,
            details: StatusDetails::Udp {
                host: "127.0.0.1".to_string(),
                port: 4210,
                timeout: 0.5,
                packets_sent: 3,
            },
        };
        let json = serde_json::to_value(&status)?;
        assert_eq!(
            json,
            serde_json::json!({
                "type": "udp",
                "connected": true,
                "error": null,
                "host": "127.0.0.1",
                "port": 4210,
                "timeout": 0.5,
                "packets_sent": 3
            })
        );
        assert!(json.get("driver").is_none());
        assert!(status.is_healthy());
        Ok(())
    }
}

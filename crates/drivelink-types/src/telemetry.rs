//! Telemetry projection for the dashboard

use serde::Serialize;

use crate::gear::GearDisplay;

/// Read-only view of a driving mode, recomputed every tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    pub mode: String,
    pub gear: GearDisplay,
    /// Speed in percent of the vehicle maximum, negative when reversing.
    pub speed: f64,
    /// Throttle-derived power in percent.
    pub power: f64,
}

impl TelemetrySnapshot {
    pub fn new(mode: impl Into<String>, gear: GearDisplay, speed: f64, power: f64) -> Self {
        Self {
            mode: mode.into(),
            gear,
            speed,
            power,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Gear;

    #[test]
    fn test_snapshot_json_shape() -> Result<(), Box<dyn std::error::Error>> {
        let snapshot = TelemetrySnapshot::new("CarSim", GearDisplay::Gear(Gear::REVERSE), -5.0, 50.0);
        let json = serde_json::to_string(&snapshot)?;
        assert_eq!(json, r#"{"mode":"CarSim","gear":-1,"speed":-5.0,"power":50.0}"#);
        Ok(())
    }
}

//! Pass-through driving mode

use drivelink_types::{CommandFrame, ControlSample, GearDisplay, TelemetrySnapshot, channels};
use tracing::info;

use crate::input::{normalize_axis, raw_pedal};
use crate::mode::ModeBehavior;

/// Sends the control sample to the vehicle unchanged.
///
/// Power follows the throttle and speed mirrors power; there is no gearbox so
/// the dashboard shows [`GearDisplay::Drive`].
#[derive(Debug, Clone, Default)]
pub struct DirectMode {
    power: f64,
    active: bool,
}

impl DirectMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn power_percent(&self) -> f64 {
        self.power
    }
}

impl ModeBehavior for DirectMode {
    fn name(&self) -> &'static str {
        "Direct"
    }

    fn description(&self) -> &'static str {
        "Control inputs are sent straight to the vehicle"
    }

    fn process_input(&mut self, sample: &ControlSample) -> CommandFrame {
        self.power = normalize_axis(raw_pedal(sample, channels::THROTTLE)) * 100.0;
        CommandFrame::from(sample)
    }

    fn update(&mut self, _dt: f64) {}

    fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::new(self.name(), GearDisplay::Drive, self.power, self.power)
    }

    fn activate(&mut self) {
        self.power = 0.0;
        self.active = true;
        info!(mode = self.name(), "Driving mode activated");
    }

    fn deactivate(&mut self) {
        self.active = false;
        info!(mode = self.name(), "Driving mode deactivated");
    }

    fn reset(&mut self) {
        self.power = 0.0;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

//! Manual transmission car simulation
//!
//! The wheel's pedals drive a simulated five-speed gearbox with reverse. Shift
//! paddles move one gear per press, with a short cooldown so switch bounce
//! cannot skip gears. The resulting speed, gear and power ride along in the
//! command frame as `simulated_speed`, `simulated_gear` and `simulated_power`.

mod config;
pub mod physics;
mod state;

pub use config::{CarSimConfig, GearCharacteristics, GearTable};
pub use state::CarSimState;

use drivelink_types::{
    CommandFrame, ControlSample, Gear, GearDisplay, TelemetrySnapshot, channels,
};
use tracing::{debug, info};

use crate::input::PedalInputs;
use crate::mode::ModeBehavior;

/// Clutch travel above which the clutch counts as engaged.
pub const CLUTCH_ENGAGE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct CarSimMode {
    config: CarSimConfig,
    state: CarSimState,
    active: bool,
}

impl Default for CarSimMode {
    fn default() -> Self {
        Self::new(CarSimConfig::default())
    }
}

impl CarSimMode {
    pub fn new(config: CarSimConfig) -> Self {
        Self {
            config,
            state: CarSimState::default(),
            active: false,
        }
    }

    /// Start from an arbitrary state, e.g. to resume a recorded run.
    pub fn with_state(config: CarSimConfig, state: CarSimState) -> Self {
        Self {
            config,
            state,
            active: false,
        }
    }

    pub fn config(&self) -> &CarSimConfig {
        &self.config
    }

    pub fn state(&self) -> &CarSimState {
        &self.state
    }

    pub fn gear(&self) -> Gear {
        self.state.gear
    }

    pub fn speed_percent(&self) -> f64 {
        self.state.speed_percent
    }

    pub fn power_percent(&self) -> f64 {
        self.state.throttle * 100.0
    }

    /// Rising-edge shift handling. Button states are latched on every call.
    fn handle_shifts(&mut self, shift_up: bool, shift_down: bool) {
        let up_edge = shift_up && !self.state.prev_shift_up;
        let down_edge = shift_down && !self.state.prev_shift_down;
        self.state.prev_shift_up = shift_up;
        self.state.prev_shift_down = shift_down;

        if self.state.shift_cooldown > 0.0 {
            return;
        }

        let target = if up_edge {
            self.state.gear.up()
        } else if down_edge {
            self.state.gear.down()
        } else {
            None
        };

        if let Some(next) = target {
            debug!(
                from = %self.state.gear,
                to = %next,
                speed = self.state.speed_percent,
                "Gear shift"
            );
            self.state.gear = next;
            self.state.shift_cooldown = self.config.shift_cooldown;
        }
    }
}

impl ModeBehavior for CarSimMode {
    fn name(&self) -> &'static str {
        "CarSim"
    }

    fn description(&self) -> &'static str {
        "Manual transmission simulation with gears, clutch and engine braking"
    }

    fn process_input(&mut self, sample: &ControlSample) -> CommandFrame {
        let pedals = PedalInputs::from_sample(sample);
        self.state.throttle = pedals.throttle;
        self.state.brake = pedals.brake;
        self.state.clutch_engaged = pedals.clutch > CLUTCH_ENGAGE_THRESHOLD;

        self.handle_shifts(
            sample.button(channels::SHIFT_UP),
            sample.button(channels::SHIFT_DOWN),
        );

        let mut frame = CommandFrame::from(sample);
        frame.set_simulation(
            self.state.speed_percent,
            self.state.gear,
            self.power_percent(),
        );
        frame
    }

    fn update(&mut self, dt: f64) {
        physics::advance(&mut self.state, &self.config, dt);
    }

    fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::new(
            self.name(),
            GearDisplay::Gear(self.state.gear),
            self.state.speed_percent,
            self.power_percent(),
        )
    }

    fn activate(&mut self) {
        self.state = CarSimState::default();
        self.active = true;
        info!(mode = self.name(), "Driving mode activated");
    }

    fn deactivate(&mut self) {
        self.active = false;
        info!(mode = self.name(), "Driving mode deactivated");
    }

    fn reset(&mut self) {
        self.state.gear = Gear::NEUTRAL;
        self.state.speed_percent = 0.0;
        self.state.throttle = 0.0;
        self.state.brake = 0.0;
        self.state.shift_cooldown = 0.0;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(shift_up: bool, shift_down: bool) -> ControlSample {
        ControlSample::new()
            .with(channels::SHIFT_UP, shift_up)
            .with(channels::SHIFT_DOWN, shift_down)
    }

    #[test]
    fn test_starts_in_neutral_at_rest() {
        let mode = CarSimMode::default();
        assert_eq!(mode.gear(), Gear::NEUTRAL);
        assert!(mode.speed_percent().abs() < 1e-12);
        assert!(!mode.is_active());
    }

    #[test]
    fn test_single_press_shifts_once() {
        let mut mode = CarSimMode::default();
        mode.process_input(&press(true, false));
        assert_eq!(mode.gear(), Gear::FIRST);

        // still held after the cooldown: no new edge
        mode.update(1.0);
        mode.process_input(&press(true, false));
        assert_eq!(mode.gear(), Gear::FIRST);
    }

    #[test]
    fn test_cooldown_blocks_second_edge() {
        let mut mode = CarSimMode::default();
        mode.process_input(&press(true, false));
        mode.process_input(&press(false, false));
        mode.update(0.1);
        mode.process_input(&press(true, false));
        assert_eq!(mode.gear(), Gear::FIRST);
    }

    #[test]
    fn test_press_during_cooldown_is_consumed() {
        let mut mode = CarSimMode::default();
        mode.process_input(&press(true, false));
        mode.process_input(&press(false, false));
        mode.update(0.1);
        mode.process_input(&press(true, false));
        mode.update(0.5);
        // the held press was latched during cooldown and does not fire later
        mode.process_input(&press(true, false));
        assert_eq!(mode.gear(), Gear::FIRST);
    }

    #[test]
    fn test_shift_after_cooldown() {
        let mut mode = CarSimMode::default();
        mode.process_input(&press(true, false));
        mode.process_input(&press(false, false));
        mode.update(0.31);
        mode.process_input(&press(true, false));
        assert_eq!(mode.gear().value(), 2);
    }

    #[test]
    fn test_shift_down_to_reverse_and_cap() {
        let mut mode = CarSimMode::default();
        mode.process_input(&press(false, true));
        assert_eq!(mode.gear(), Gear::REVERSE);
        mode.process_input(&press(false, false));
        mode.update(0.5);
        mode.process_input(&press(false, true));
        assert_eq!(mode.gear(), Gear::REVERSE);
        // no shift happened, so no cooldown was started
        assert!(mode.state().shift_cooldown.abs() < 1e-12);
    }

    #[test]
    fn test_frame_carries_simulation_fields() {
        let mut mode = CarSimMode::default();
        let sample = ControlSample::new()
            .with(channels::THROTTLE, 0.0)
            .with(channels::STEERING, 0.25);
        let frame = mode.process_input(&sample);

        assert_eq!(frame.axis(channels::STEERING), Some(0.25));
        assert_eq!(frame.integer(channels::SIMULATED_GEAR), Some(0));
        assert_eq!(frame.axis(channels::SIMULATED_POWER), Some(50.0));
        assert_eq!(frame.axis(channels::SIMULATED_SPEED), Some(0.0));
    }

    #[test]
    fn test_sample_without_pedals_stays_at_rest() {
        let mut mode =
            CarSimMode::with_state(CarSimConfig::default(), CarSimState::in_gear(Gear::FIRST, 0.0));
        mode.process_input(&ControlSample::new());
        assert!(mode.state().throttle.abs() < 1e-12);
        assert!(mode.state().brake.abs() < 1e-12);
        mode.update(1.0);
        assert!(mode.speed_percent().abs() < 1e-12);
    }

    #[test]
    fn test_clutch_released_disengages() {
        let mut mode = CarSimMode::default();
        mode.process_input(&ControlSample::new().with(channels::CLUTCH, -1.0));
        assert!(!mode.state().clutch_engaged);
        mode.process_input(&ControlSample::new());
        assert!(mode.state().clutch_engaged);
    }

    #[test]
    fn test_telemetry_reports_gear_number() {
        let mode = CarSimMode::with_state(
            CarSimConfig::default(),
            CarSimState::in_gear(Gear::REVERSE, -5.0),
        );
        let telemetry = mode.telemetry();
        assert_eq!(telemetry.mode, "CarSim");
        assert_eq!(telemetry.gear, GearDisplay::Gear(Gear::REVERSE));
        assert!((telemetry.speed + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_activate_resets_and_reset_zeroes() {
        let mut mode =
            CarSimMode::with_state(CarSimConfig::default(), CarSimState::in_gear(Gear::TOP, 80.0));
        mode.activate();
        assert!(mode.is_active());
        assert_eq!(mode.state(), &CarSimState::default());

        mode.process_input(&press(true, false).with(channels::THROTTLE, 1.0));
        mode.update(0.1);
        mode.reset();
        assert_eq!(mode.gear(), Gear::NEUTRAL);
        assert!(mode.speed_percent().abs() < 1e-12);
        assert!(mode.power_percent().abs() < 1e-12);

        mode.deactivate();
        assert!(!mode.is_active());
    }
}

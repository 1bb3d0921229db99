use drivelink_types::Gear;

/// Mutable state of the simulated car.
///
/// Owned by one [`CarSimMode`](super::CarSimMode). Callers only ever see it
/// by reference, or seed a fresh mode with one.
#[derive(Debug, Clone, PartialEq)]
pub struct CarSimState {
    pub gear: Gear,
    /// Percent of the vehicle maximum in `[-100, 100]`, negative when reversing.
    pub speed_percent: f64,
    pub clutch_engaged: bool,
    /// Seconds left before another shift is accepted. Never negative.
    pub shift_cooldown: f64,
    /// Pedal travel from the last processed sample, in `[0, 1]`.
    pub throttle: f64,
    pub brake: f64,
    pub prev_shift_up: bool,
    pub prev_shift_down: bool,
}

impl Default for CarSimState {
    fn default() -> Self {
        Self {
            gear: Gear::NEUTRAL,
            speed_percent: 0.0,
            clutch_engaged: true,
            shift_cooldown: 0.0,
            throttle: 0.0,
            brake: 0.0,
            prev_shift_up: false,
            prev_shift_down: false,
        }
    }
}

impl CarSimState {
    pub fn in_gear(gear: Gear, speed_percent: f64) -> Self {
        Self {
            gear,
            speed_percent,
            ..Self::default()
        }
    }

    /// Whether drive is transmitted to the wheels.
    pub fn is_driving(&self) -> bool {
        !self.gear.is_neutral() && self.clutch_engaged
    }
}

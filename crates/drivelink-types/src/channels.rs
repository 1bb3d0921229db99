//! Well-known channel names

pub const STEERING: &str = "steering";
pub const THROTTLE: &str = "throttle";
pub const BRAKE: &str = "brake";
pub const CLUTCH: &str = "clutch";
pub const SHIFT_UP: &str = "shift_up";
pub const SHIFT_DOWN: &str = "shift_down";

/// Drive direction consumed by the UDP receiver: 0 = stop, 1 = forward, 2 = reverse.
pub const DIRECTION: &str = "direction";

pub const SIMULATED_SPEED: &str = "simulated_speed";
pub const SIMULATED_GEAR: &str = "simulated_gear";
pub const SIMULATED_POWER: &str = "simulated_power";

//! Speed integration for the simulated gearbox
//!
//! One call to [`advance`] moves the car forward by `dt` seconds. With drive
//! engaged the gear's acceleration factor and speed cap apply; otherwise the
//! car coasts on inertia alone.

use drivelink_types::Gear;

use super::config::CarSimConfig;
use super::state::CarSimState;

/// Throttle travel below this counts as released.
pub const THROTTLE_DEADBAND: f64 = 0.001;
/// Brake travel below this counts as released.
pub const BRAKE_DEADBAND: f64 = 0.01;
/// Speed percent shed per second at full brake with a brake power of 1.
pub const BRAKE_RATE: f64 = 20.0;
/// Speeds closer to zero than this snap to zero.
pub const CREEP_THRESHOLD: f64 = 0.1;
/// Momentum a forward gear wants per gear above first, in speed percent.
pub const MOMENTUM_PER_GEAR: f64 = 15.0;

const MIN_MOMENTUM_SCALE: f64 = 0.1;
const THROTTLE_ENGINE_BRAKING: f64 = 5.0;
const COAST_ENGINE_BRAKING: f64 = 4.0;

/// Advance `state` by `dt` seconds. Non-positive or non-finite `dt` is ignored.
pub fn advance(state: &mut CarSimState, config: &CarSimConfig, dt: f64) {
    if !(dt.is_finite() && dt > 0.0) {
        return;
    }

    if state.shift_cooldown > 0.0 {
        state.shift_cooldown = (state.shift_cooldown - dt).max(0.0);
    }

    let decay = 1.0 - config.inertia.powf(dt);
    let brake_decel = if state.brake > BRAKE_DEADBAND {
        config.brake_power * state.brake * BRAKE_RATE * dt
    } else {
        0.0
    };

    let speed = if state.is_driving() {
        driven_speed(state, config, dt, decay, brake_decel)
    } else {
        coast_speed(state.speed_percent, decay, brake_decel)
    };

    let speed = speed.clamp(-100.0, 100.0);
    state.speed_percent = if speed.abs() < CREEP_THRESHOLD {
        0.0
    } else {
        speed
    };
}

/// Engaged gear: signed speed, then the direction clamp for the gear.
///
/// Throttle in reverse pushes the signed speed up toward zero and the brake
/// pushes it down toward the reverse limit.
fn driven_speed(
    state: &CarSimState,
    config: &CarSimConfig,
    dt: f64,
    decay: f64,
    brake_decel: f64,
) -> f64 {
    let gear = config.gears.get(state.gear);
    let max_speed = gear.max_speed_percent;

    let mut speed = state.speed_percent;
    let over_limit_ratio = (speed - max_speed) / 100.0;

    if state.throttle > THROTTLE_DEADBAND {
        let accel = config.base_acceleration * gear.accel_factor * state.throttle * dt
            * momentum_scale(state.gear, speed);
        if speed < max_speed {
            speed = (speed + accel).min(max_speed);
        } else {
            speed *= 1.0 - decay * (1.0 + over_limit_ratio * THROTTLE_ENGINE_BRAKING);
        }
    } else if over_limit_ratio > 0.0 {
        speed *= 1.0 - decay * (1.0 + over_limit_ratio * COAST_ENGINE_BRAKING);
    } else {
        speed *= 1.0 - decay;
    }

    speed -= brake_decel;

    if state.gear.is_reverse() {
        speed.min(0.0).max(-max_speed)
    } else {
        speed.max(0.0)
    }
}

/// Neutral or clutch pressed: inertia only, brake pulls toward zero.
fn coast_speed(speed: f64, decay: f64, brake_decel: f64) -> f64 {
    let speed = speed * (1.0 - decay);
    if speed > 0.0 {
        (speed - brake_decel).max(0.0)
    } else {
        (speed + brake_decel).min(0.0)
    }
}

/// Acceleration scale for a forward gear that has not yet built up momentum.
///
/// First gear and reverse always pull at full strength.
pub fn momentum_scale(gear: Gear, speed: f64) -> f64 {
    if gear.value() <= 1 {
        return 1.0;
    }
    let min_effective = f64::from(gear.value() - 1) * MOMENTUM_PER_GEAR;
    if speed >= min_effective {
        return 1.0;
    }
    let deficit = min_effective - speed;
    (1.0 - deficit / (min_effective + 1.0) * 0.9).max(MIN_MOMENTUM_SCALE)
}

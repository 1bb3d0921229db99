//! Pedal normalization shared by the driving modes
//!
//! Pedal axes arrive in `[-1, 1]` with `-1` meaning released. Modes work with
//! pedal travel in `[0, 1]`.

use drivelink_types::{ControlSample, channels};

/// Raw axis reading used when a pedal channel is absent or not a finite number.
pub const RELEASED_AXIS: f64 = -1.0;

/// Map a raw axis in `[-1, 1]` to pedal travel in `[0, 1]`.
///
/// Out-of-range input is clamped first, NaN reads as released.
pub fn normalize_axis(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    (raw.clamp(-1.0, 1.0) + 1.0) / 2.0
}

/// Raw pedal axis, falling back to released.
pub fn raw_pedal(sample: &ControlSample, channel: &str) -> f64 {
    sample
        .axis(channel)
        .filter(|v| v.is_finite())
        .map_or(RELEASED_AXIS, |v| v.clamp(-1.0, 1.0))
}

/// Pedal travel for one tick, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PedalInputs {
    pub throttle: f64,
    pub brake: f64,
    pub clutch: f64,
}

impl PedalInputs {
    pub fn from_sample(sample: &ControlSample) -> Self {
        Self {
            throttle: normalize_axis(raw_pedal(sample, channels::THROTTLE)),
            brake: normalize_axis(raw_pedal(sample, channels::BRAKE)),
            clutch: clutch_travel(sample),
        }
    }
}

/// Clutch travel in `[0, 1]`.
///
/// Some wheels report an unplugged clutch pedal as exactly `0.0`, and an
/// absent channel reads the same way. Both are treated as fully pressed so a
/// wheel without a clutch can still drive with the clutch engaged.
pub fn clutch_travel(sample: &ControlSample) -> f64 {
    let raw = sample
        .axis(channels::CLUTCH)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);
    if raw == 0.0 {
        1.0
    } else {
        normalize_axis(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_normalize_axis_endpoints() {
        assert!(approx(normalize_axis(-1.0), 0.0));
        assert!(approx(normalize_axis(0.0), 0.5));
        assert!(approx(normalize_axis(1.0), 1.0));
    }

    #[test]
    fn test_normalize_axis_clamps_out_of_range() {
        assert!(approx(normalize_axis(-3.0), 0.0));
        assert!(approx(normalize_axis(7.5), 1.0));
        assert!(approx(normalize_axis(f64::NAN), 0.0));
    }

    #[test]
    fn test_missing_pedals_read_released() {
        let pedals = PedalInputs::from_sample(&ControlSample::new());
        assert!(approx(pedals.throttle, 0.0));
        assert!(approx(pedals.brake, 0.0));
    }

    #[test]
    fn test_non_numeric_pedal_reads_released() {
        let sample = ControlSample::new()
            .with(channels::THROTTLE, true)
            .with(channels::BRAKE, f64::INFINITY);
        let pedals = PedalInputs::from_sample(&sample);
        assert!(approx(pedals.throttle, 0.0));
        assert!(approx(pedals.brake, 0.0));
    }

    #[test]
    fn test_clutch_zero_or_absent_is_fully_pressed() {
        assert!(approx(clutch_travel(&ControlSample::new()), 1.0));
        let sample = ControlSample::new().with(channels::CLUTCH, 0.0);
        assert!(approx(clutch_travel(&sample), 1.0));
    }

    #[test]
    fn test_clutch_released_reads_zero() {
        let sample = ControlSample::new().with(channels::CLUTCH, -1.0);
        assert!(approx(clutch_travel(&sample), 0.0));
        let sample = ControlSample::new().with(channels::CLUTCH, 0.5);
        assert!(approx(clutch_travel(&sample), 0.75));
    }
}

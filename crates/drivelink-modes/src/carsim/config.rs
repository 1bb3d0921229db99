//! Car simulation parameters

use drivelink_types::Gear;
use serde::{Deserialize, Serialize};

use crate::{ModeError, ModeResult};

/// Acceleration multiplier and speed limit for one gear.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GearCharacteristics {
    pub accel_factor: f64,
    /// Speed cap in percent of the vehicle maximum.
    pub max_speed_percent: f64,
}

impl GearCharacteristics {
    /// Returned for gears missing from the table.
    pub const NONE: GearCharacteristics = GearCharacteristics {
        accel_factor: 0.0,
        max_speed_percent: 0.0,
    };

    pub const fn new(accel_factor: f64, max_speed_percent: f64) -> Self {
        Self {
            accel_factor,
            max_speed_percent,
        }
    }
}

/// Per-gear characteristics, reverse through fifth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GearTable {
    pub reverse: GearCharacteristics,
    pub neutral: GearCharacteristics,
    pub first: GearCharacteristics,
    pub second: GearCharacteristics,
    pub third: GearCharacteristics,
    pub fourth: GearCharacteristics,
    pub fifth: GearCharacteristics,
}

impl Default for GearTable {
    fn default() -> Self {
        Self {
            reverse: GearCharacteristics::new(1.5, 20.0),
            neutral: GearCharacteristics::NONE,
            first: GearCharacteristics::new(3.0, 20.0),
            second: GearCharacteristics::new(2.0, 40.0),
            third: GearCharacteristics::new(1.5, 60.0),
            fourth: GearCharacteristics::new(1.2, 80.0),
            fifth: GearCharacteristics::new(0.9, 100.0),
        }
    }
}

impl GearTable {
    pub fn get(&self, gear: Gear) -> GearCharacteristics {
        match gear.value() {
            -1 => self.reverse,
            0 => self.neutral,
            1 => self.first,
            2 => self.second,
            3 => self.third,
            4 => self.fourth,
            5 => self.fifth,
            _ => GearCharacteristics::NONE,
        }
    }

    fn entries(&self) -> [GearCharacteristics; 7] {
        [
            self.reverse,
            self.neutral,
            self.first,
            self.second,
            self.third,
            self.fourth,
            self.fifth,
        ]
    }
}

/// Tunables for [`CarSimMode`](super::CarSimMode).
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarSimConfig {
    /// Fraction of speed kept after one second of coasting.
    pub inertia: f64,
    pub brake_power: f64,
    /// Speed percent gained per second at full throttle with an accel factor of 1.
    pub base_acceleration: f64,
    /// Seconds after a shift during which further shifts are ignored.
    pub shift_cooldown: f64,
    pub gears: GearTable,
}

impl Default for CarSimConfig {
    fn default() -> Self {
        Self {
            inertia: 0.88,
            brake_power: 1.0,
            base_acceleration: 12.0,
            shift_cooldown: 0.3,
            gears: GearTable::default(),
        }
    }
}

impl CarSimConfig {
    pub fn validate(&self) -> ModeResult<()> {
        if !(self.inertia > 0.0 && self.inertia <= 1.0) {
            return Err(ModeError::InvalidParameter {
                name: "inertia",
                value: self.inertia,
            });
        }
        let non_negative = [
            ("brake_power", self.brake_power),
            ("base_acceleration", self.base_acceleration),
            ("shift_cooldown", self.shift_cooldown),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ModeError::InvalidParameter { name, value });
            }
        }
        for entry in self.gears.entries() {
            if !entry.accel_factor.is_finite() || entry.accel_factor < 0.0 {
                return Err(ModeError::InvalidParameter {
                    name: "accel_factor",
                    value: entry.accel_factor,
                });
            }
            if !(0.0..=100.0).contains(&entry.max_speed_percent) {
                return Err(ModeError::InvalidParameter {
                    name: "max_speed_percent",
                    value: entry.max_speed_percent,
                });
            }
        }
        Ok(())
    }
}

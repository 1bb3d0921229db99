//! Gear type definitions

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::{GearError, GearResult};

pub const REVERSE_GEAR: i32 = -1;
pub const NEUTRAL_GEAR: i32 = 0;
pub const TOP_GEAR: i32 = 5;

/// Transmission state: -1 is reverse, 0 is neutral, 1..=5 are forward gears.
///
/// Ordered by integer value.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct Gear(i8);

impl Gear {
    pub const REVERSE: Gear = Gear(-1);
    pub const NEUTRAL: Gear = Gear(0);
    pub const FIRST: Gear = Gear(1);
    pub const TOP: Gear = Gear(5);

    #[allow(clippy::cast_possible_truncation)]
    pub fn new(gear: i32) -> GearResult<Self> {
        if (REVERSE_GEAR..=TOP_GEAR).contains(&gear) {
            Ok(Gear(gear as i8))
        } else {
            Err(GearError::InvalidGear(gear))
        }
    }

    pub fn value(self) -> i32 {
        i32::from(self.0)
    }

    pub fn is_neutral(self) -> bool {
        self == Gear::NEUTRAL
    }

    pub fn is_reverse(self) -> bool {
        self == Gear::REVERSE
    }

    pub fn is_forward(self) -> bool {
        self.0 > 0
    }

    /// Next gear up, or `None` in top gear.
    pub fn up(self) -> Option<Gear> {
        Gear::new(self.value() + 1).ok()
    }

    /// Next gear down, or `None` in reverse.
    pub fn down(self) -> Option<Gear> {
        Gear::new(self.value() - 1).ok()
    }

    /// Every gear from reverse to top.
    #[allow(clippy::cast_possible_truncation)]
    pub fn all() -> impl Iterator<Item = Gear> {
        (REVERSE_GEAR..=TOP_GEAR).map(|g| Gear(g as i8))
    }
}

impl TryFrom<i32> for Gear {
    type Error = GearError;

    fn try_from(value: i32) -> GearResult<Self> {
        Gear::new(value)
    }
}

impl From<Gear> for i32 {
    fn from(gear: Gear) -> Self {
        gear.value()
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            -1 => write!(f, "R"),
            0 => write!(f, "N"),
            g => write!(f, "{g}"),
        }
    }
}

/// What the dashboard shows in the gear slot.
///
/// Direct mode has no transmission and shows a `D` marker instead of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GearDisplay {
    Gear(Gear),
    Drive,
}

impl Serialize for GearDisplay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GearDisplay::Gear(gear) => serializer.serialize_i32(gear.value()),
            GearDisplay::Drive => serializer.serialize_str("D"),
        }
    }
}

impl fmt::Display for GearDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GearDisplay::Gear(gear) => write!(f, "{gear}"),
            GearDisplay::Drive => write!(f, "D"),
        }
    }
}

impl From<Gear> for GearDisplay {
    fn from(gear: Gear) -> Self {
        GearDisplay::Gear(gear)
    }
}

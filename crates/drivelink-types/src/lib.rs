//! Shared data model for DriveLink
//!
//! This crate holds the values that flow through one control tick:
//! a [`ControlSample`] read from the wheel and pedals, the [`CommandFrame`]
//! a driving mode derives from it, and the [`TelemetrySnapshot`] shown to the
//! driver. [`Gear`] is the discrete transmission state used by the car
//! simulation.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod channels;
pub mod frame;
pub mod gear;
pub mod sample;
pub mod telemetry;

pub use frame::CommandFrame;
pub use gear::{Gear, GearDisplay};
pub use sample::{ChannelValue, ControlSample};
pub use telemetry::TelemetrySnapshot;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GearError {
    #[error("Invalid gear: {0} (expected -1..=5)")]
    InvalidGear(i32),
}

pub type GearResult<T> = Result<T, GearError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_gear() {
        let err = GearError::InvalidGear(9);
        assert!(err.to_string().contains('9'));
    }
}

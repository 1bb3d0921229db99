//! Driving modes for DriveLink
//!
//! A driving mode turns one tick of control input into the command frame that
//! is sent to the vehicle, and keeps whatever state it needs to do so.
//!
//! - [`DirectMode`]: pass-through, the vehicle receives the pedals as read
//! - [`CarSimMode`]: manual transmission simulation with gears, clutch,
//!   inertia and engine braking
//!
//! Both implement [`ModeBehavior`]; [`DrivingMode`] is the closed set the rest
//! of the system works with.
//!
//! # Tick order
//!
//! Call [`ModeBehavior::process_input`] with the sample, then
//! [`ModeBehavior::update`] with the measured elapsed time in seconds.
//! [`DrivingMode::step`] does both.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod carsim;
pub mod direct;
pub mod input;
mod mode;

pub use carsim::{CarSimConfig, CarSimMode, CarSimState, GearCharacteristics, GearTable};
pub use direct::DirectMode;
pub use mode::{DrivingMode, ModeBehavior, ModeKind, ModeOutput};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModeError {
    #[error("Unknown driving mode: {0} (expected direct or carsim)")]
    UnknownMode(String),

    #[error("Invalid car simulation parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

pub type ModeResult<T> = Result<T, ModeError>;

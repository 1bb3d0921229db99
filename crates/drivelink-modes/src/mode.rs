//! Mode contract and the closed set of modes

use std::fmt;
use std::str::FromStr;

use drivelink_types::{CommandFrame, ControlSample, TelemetrySnapshot};
use serde::{Deserialize, Serialize};

use crate::carsim::{CarSimConfig, CarSimMode};
use crate::direct::DirectMode;
use crate::ModeError;

/// Behavior shared by every driving mode.
///
/// Per tick, `process_input` runs first and `update` second. Neither fails:
/// malformed channels fall back to released pedals.
pub trait ModeBehavior {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Consume one sample and produce the frame for this tick.
    fn process_input(&mut self, sample: &ControlSample) -> CommandFrame;

    /// Advance internal state by `dt` seconds.
    fn update(&mut self, dt: f64);

    fn telemetry(&self) -> TelemetrySnapshot;

    /// Reset to the initial state and mark active.
    fn activate(&mut self);

    fn deactivate(&mut self);

    /// Zero gear, speed and power.
    fn reset(&mut self);

    fn is_active(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    #[default]
    Direct,
    CarSim,
}

impl ModeKind {
    pub const ALL: [ModeKind; 2] = [ModeKind::Direct, ModeKind::CarSim];

    pub fn as_str(self) -> &'static str {
        match self {
            ModeKind::Direct => "direct",
            ModeKind::CarSim => "carsim",
        }
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeKind {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(ModeKind::Direct),
            "carsim" => Ok(ModeKind::CarSim),
            _ => Err(ModeError::UnknownMode(s.to_string())),
        }
    }
}

/// Frame and telemetry produced by one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeOutput {
    pub frame: CommandFrame,
    pub telemetry: TelemetrySnapshot,
}

/// The driving mode in use.
#[derive(Debug, Clone)]
pub enum DrivingMode {
    Direct(DirectMode),
    CarSim(CarSimMode),
}

impl Default for DrivingMode {
    fn default() -> Self {
        DrivingMode::Direct(DirectMode::new())
    }
}

impl DrivingMode {
    /// Fresh mode of `kind`; car simulation uses `carsim` for its parameters.
    pub fn new(kind: ModeKind, carsim: CarSimConfig) -> Self {
        match kind {
            ModeKind::Direct => DrivingMode::Direct(DirectMode::new()),
            ModeKind::CarSim => DrivingMode::CarSim(CarSimMode::new(carsim)),
        }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            DrivingMode::Direct(_) => ModeKind::Direct,
            DrivingMode::CarSim(_) => ModeKind::CarSim,
        }
    }

    /// One full tick: process the sample, then advance by `dt`.
    ///
    /// The telemetry reflects the state the frame was built from.
    pub fn step(&mut self, sample: &ControlSample, dt: f64) -> ModeOutput {
        let frame = self.process_input(sample);
        let telemetry = self.telemetry();
        self.update(dt);
        ModeOutput { frame, telemetry }
    }

    fn inner(&self) -> &dyn ModeBehavior {
        match self {
            DrivingMode::Direct(mode) => mode,
            DrivingMode::CarSim(mode) => mode,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ModeBehavior {
        match self {
            DrivingMode::Direct(mode) => mode,
            DrivingMode::CarSim(mode) => mode,
        }
    }
}

impl ModeBehavior for DrivingMode {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn description(&self) -> &'static str {
        self.inner().description()
    }

    fn process_input(&mut self, sample: &ControlSample) -> CommandFrame {
        self.inner_mut().process_input(sample)
    }

    fn update(&mut self, dt: f64) {
        self.inner_mut().update(dt);
    }

    fn telemetry(&self) -> TelemetrySnapshot {
        self.inner().telemetry()
    }

    fn activate(&mut self) {
        self.inner_mut().activate();
    }

    fn deactivate(&mut self) {
        self.inner_mut().deactivate();
    }

    fn reset(&mut self) {
        self.inner_mut().reset();
    }

    fn is_active(&self) -> bool {
        self.inner().is_active()
    }
}

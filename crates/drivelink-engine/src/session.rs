//! Drive loop: sample → mode → dispatcher

use std::time::Instant;

use drivelink_modes::{CarSimConfig, DrivingMode, ModeBehavior, ModeKind, ModeOutput};
use drivelink_output::{DriverConfig, DriverStatus, OutputDispatcher};
use drivelink_types::{CommandFrame, ControlSample, TelemetrySnapshot};
use serde::Serialize;
use tracing::{info, trace};

use crate::config::SessionConfig;

/// What one tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub frame: CommandFrame,
    pub telemetry: TelemetrySnapshot,
    /// Seconds the mode was advanced by.
    pub dt: f64,
    /// `None` when no driver was connected, otherwise the driver's result.
    pub delivered: Option<bool>,
}

/// Counters since the session started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub ticks: u64,
    pub frames_sent: u64,
    pub send_failures: u64,
    /// Ticks that produced a frame while no driver was connected.
    pub frames_skipped: u64,
}

/// One driving mode feeding one output dispatcher.
#[derive(Debug)]
pub struct DriveSession {
    mode: DrivingMode,
    dispatcher: OutputDispatcher,
    carsim: CarSimConfig,
    last_tick: Option<Instant>,
    stats: SessionStats,
}

impl Default for DriveSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl DriveSession {
    /// Build the session and activate its mode. The output is not connected.
    pub fn new(config: SessionConfig) -> Self {
        let dispatcher = OutputDispatcher::new(config.output.clone());
        Self::with_dispatcher(config, dispatcher)
    }

    /// Use `dispatcher` instead of building one from `config.output`.
    pub fn with_dispatcher(config: SessionConfig, dispatcher: OutputDispatcher) -> Self {
        let mut mode = DrivingMode::new(config.mode, config.carsim);
        mode.activate();
        Self {
            mode,
            dispatcher,
            carsim: config.carsim,
            last_tick: None,
            stats: SessionStats::default(),
        }
    }

    pub fn mode(&self) -> &DrivingMode {
        &self.mode
    }

    pub fn dispatcher(&self) -> &OutputDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut OutputDispatcher {
        &mut self.dispatcher
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn output_status(&self) -> DriverStatus {
        self.dispatcher.status()
    }

    pub fn connect(&mut self) -> bool {
        self.dispatcher.connect()
    }

    pub fn disconnect(&mut self) -> bool {
        self.dispatcher.disconnect()
    }

    /// Replace the driving mode. The old mode is deactivated, the new one starts fresh.
    pub fn set_mode(&mut self, kind: ModeKind) {
        self.mode.deactivate();
        self.mode = DrivingMode::new(kind, self.carsim);
        self.mode.activate();
        info!(mode = self.mode.name(), "Session driving mode set");
    }

    /// Replace the output driver. Call [`connect`](Self::connect) afterwards.
    pub fn switch_output(&mut self, config: DriverConfig) {
        self.dispatcher.switch_driver(config);
    }

    /// Run one tick using the wall-clock time since the previous tick.
    ///
    /// The first tick advances by zero.
    pub fn tick(&mut self, sample: &ControlSample) -> TickReport {
        let now = Instant::now();
        let dt = self
            .last_tick
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f64());
        self.last_tick = Some(now);
        self.tick_with_dt(sample, dt)
    }

    /// Run one tick with an explicit step, for replay and tests.
    ///
    /// Negative or non-finite steps count as zero.
    pub fn tick_with_dt(&mut self, sample: &ControlSample, dt: f64) -> TickReport {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let ModeOutput { frame, telemetry } = self.mode.step(sample, dt);

        let delivered = if self.dispatcher.is_connected() {
            let ok = self.dispatcher.send(&frame);
            if ok {
                self.stats.frames_sent += 1;
            } else {
                self.stats.send_failures += 1;
            }
            Some(ok)
        } else {
            self.stats.frames_skipped += 1;
            None
        };

        self.stats.ticks += 1;
        trace!(
            tick = self.stats.ticks,
            dt,
            gear = %telemetry.gear,
            speed = telemetry.speed,
            delivered = ?delivered,
            "Tick"
        );

        TickReport {
            frame,
            telemetry,
            dt,
            delivered,
        }
    }
}

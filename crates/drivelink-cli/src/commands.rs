//! Command implementations for the drivelink CLI

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use clap::Args;
use drivelink_engine::{DriveSession, SessionConfig};
use drivelink_modes::ModeKind;
use drivelink_output::{
    DriverConfig, DriverKind, SerialDriver, UdpCommand, available_drivers,
};
use drivelink_types::{CommandFrame, ControlSample};
use tracing::{debug, info};

use crate::error::CliError;
use crate::output;

/// Where the session configuration comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Session file (mode, output and physics settings)
    #[arg(short, long, env = "DRIVELINK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Driving mode, overrides the session file
    #[arg(short, long)]
    pub mode: Option<ModeKind>,

    /// Output driver with default settings, overrides the session file
    #[arg(short, long)]
    pub output: Option<DriverKind>,

    /// Driver config file (JSON with a `driver_type` tag)
    #[arg(long)]
    pub output_config: Option<PathBuf>,
}

impl SessionArgs {
    /// Merge the session file with command-line overrides.
    pub fn resolve(&self) -> Result<SessionConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }

        match (&self.output_config, self.output) {
            (Some(path), kind) => {
                let output = DriverConfig::load(path)?;
                if let Some(kind) = kind
                    && kind != output.kind()
                {
                    return Err(CliError::Validation(format!(
                        "--output {kind} conflicts with {} config in {}",
                        output.kind(),
                        path.display()
                    )));
                }
                config.output = output;
            }
            (None, Some(kind)) if kind != config.output.kind() => {
                config.output = DriverConfig::default_for(kind);
            }
            (None, _) => {}
        }

        Ok(config)
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// JSON-lines file of control samples, `-` or absent for stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Fixed step in seconds instead of wall-clock time
    #[arg(long, value_name = "SECONDS")]
    pub dt: Option<f64>,

    /// Do not connect the output driver
    #[arg(long)]
    pub offline: bool,
}

/// Replay control samples through a session, one tick per line.
pub fn run(args: &RunArgs, json: bool) -> Result<(), CliError> {
    let config = args.session.resolve()?;
    if let Some(dt) = args.dt
        && !(dt.is_finite() && dt >= 0.0)
    {
        return Err(CliError::Validation(format!(
            "--dt must be a non-negative number of seconds, got {dt}"
        )));
    }

    let mut session = DriveSession::new(config);
    if !args.offline {
        connect(&mut session)?;
    }

    let reader = open_input(args.input.as_deref())?;
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| CliError::Io {
            path: args.input.clone().unwrap_or_else(|| PathBuf::from("-")),
            source,
        })?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let sample: ControlSample =
            serde_json::from_str(text).map_err(|source| CliError::Sample {
                line: index + 1,
                source,
            })?;
        let report = match args.dt {
            Some(dt) => session.tick_with_dt(&sample, dt),
            None => session.tick(&sample),
        };
        output::print_tick(session.stats().ticks, &report, json);
    }

    output::print_summary(&session.stats(), &session.output_status(), json);
    if session.dispatcher().is_connected() && !session.disconnect() {
        debug!("Output did not disconnect cleanly");
    }
    Ok(())
}

/// Connect the configured output once and report its status.
pub fn status(args: &SessionArgs, json: bool) -> Result<(), CliError> {
    let mut session = DriveSession::new(args.resolve()?);
    let result = connect(&mut session);
    output::print_status(&session.output_status(), json);
    if result.is_ok() {
        session.disconnect();
    }
    result
}

pub fn drivers(json: bool) {
    output::print_drivers(&available_drivers(), json);
}

pub fn ports(json: bool) -> Result<(), CliError> {
    let ports = SerialDriver::available_ports()?;
    output::print_ports(&ports, json);
    Ok(())
}

/// Show the UDP datagram a command frame turns into.
pub fn encode(frame: &str, json: bool) -> Result<(), CliError> {
    let frame: CommandFrame = serde_json::from_str(frame).map_err(CliError::Frame)?;
    let command = UdpCommand::from_frame(&frame);
    output::print_encoded(&command, &command.encode(), json);
    Ok(())
}

/// Write a session file with every default spelled out.
pub fn init(path: &Path, force: bool, mode: ModeKind, json: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Validation(format!(
            "{} already exists, pass --force to overwrite",
            path.display()
        )));
    }
    let config = SessionConfig {
        mode,
        ..SessionConfig::default()
    };
    config.save(path)?;
    info!(path = %path.display(), mode = %mode, "Session file written");
    output::print_written(path, json);
    Ok(())
}

fn connect(session: &mut DriveSession) -> Result<(), CliError> {
    if session.connect() {
        return Ok(());
    }
    let status = session.output_status();
    Err(CliError::ConnectFailed {
        driver: status.driver.to_string(),
        reason: status
            .error
            .unwrap_or_else(|| "driver refused to connect".to_string()),
    })
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>, CliError> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path).map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(std::io::stdin().lock())),
    }
}

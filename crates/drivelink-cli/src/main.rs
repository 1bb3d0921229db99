//! drivelink - headless DriveLink session runner
//!
//! Replays JSON-lines control samples through a driving mode and streams the
//! resulting command frames to the configured output driver.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use drivelink_modes::ModeKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{RunArgs, SessionArgs};
use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "drivelink")]
#[command(about = "Drive RC vehicles from game-controller samples")]
#[command(version)]
#[command(long_about = "
drivelink feeds control samples (one JSON object per line) through a driving
mode, either Direct pass-through or CarSim manual-transmission physics, and
sends each resulting command frame to a serial, HTTP, UDP or debug output.

Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay control samples through a session
    Run(RunArgs),

    /// Connect the configured output once and show its status
    Status(SessionArgs),

    /// List output drivers
    Drivers,

    /// List serial ports
    Ports,

    /// Show the UDP datagram for a command frame given as JSON
    Encode {
        /// Frame, e.g. '{"throttle": 0.5, "direction": 1}'
        frame: String,
    },

    /// Write a session file with default settings
    Init {
        path: PathBuf,

        /// Driving mode to store
        #[arg(short, long, default_value_t = ModeKind::Direct)]
        mode: ModeKind,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("drivelink={log_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute_command(&cli) {
        if cli.json {
            output::print_error_json(&e);
        } else {
            output::print_error_human(&e);
        }

        let exit_code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(exit_code);
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run(args) => commands::run(args, cli.json)?,
        Commands::Status(args) => commands::status(args, cli.json)?,
        Commands::Drivers => commands::drivers(cli.json),
        Commands::Ports => commands::ports(cli.json)?,
        Commands::Encode { frame } => commands::encode(frame, cli.json)?,
        Commands::Init { path, mode, force } => commands::init(path, *force, *mode, cli.json)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivelink_output::DriverKind;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_verbose_levels() -> TestResult {
        for (args, expected) in [
            (vec!["drivelink", "drivers"], 0),
            (vec!["drivelink", "-v", "drivers"], 1),
            (vec!["drivelink", "-vvv", "drivers"], 3),
        ] {
            assert_eq!(Cli::try_parse_from(args)?.verbose, expected);
        }
        Ok(())
    }

    #[test]
    fn parse_global_json_flag_after_subcommand() -> TestResult {
        let cli = Cli::try_parse_from(["drivelink", "drivers", "--json"])?;
        assert!(cli.json);
        Ok(())
    }

    #[test]
    fn parse_run_with_overrides() -> TestResult {
        let cli = Cli::try_parse_from([
            "drivelink", "run", "--mode", "CarSim", "--output", "udp", "--dt", "0.02", "--input",
            "samples.jsonl",
        ])?;
        let Commands::Run(args) = cli.command else {
            return Err("expected run command".into());
        };
        assert_eq!(args.session.mode, Some(ModeKind::CarSim));
        assert_eq!(args.session.output, Some(DriverKind::Udp));
        assert!(args.dt.is_some_and(|dt| (dt - 0.02).abs() < 1e-12));
        assert_eq!(args.input, Some(PathBuf::from("samples.jsonl")));
        assert!(!args.offline);
        Ok(())
    }

    #[test]
    fn parse_rejects_unknown_mode_and_driver() {
        assert!(Cli::try_parse_from(["drivelink", "run", "--mode", "rally"]).is_err());
        assert!(Cli::try_parse_from(["drivelink", "status", "--output", "bluetooth"]).is_err());
    }

    #[test]
    fn parse_init_defaults_to_direct() -> TestResult {
        let cli = Cli::try_parse_from(["drivelink", "init", "session.json"])?;
        let Commands::Init { mode, force, .. } = cli.command else {
            return Err("expected init command".into());
        };
        assert_eq!(mode, ModeKind::Direct);
        assert!(!force);
        Ok(())
    }
}

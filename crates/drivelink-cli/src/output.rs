//! Output formatting for CLI responses
//!
//! Data goes to stdout, logs and errors to stderr, so JSON output can be piped.

use std::path::Path;

use anyhow::Error;
use colored::Colorize;
use drivelink_engine::{SessionStats, TickReport};
use drivelink_output::{DriverInfo, DriverStatus, UDP_FRAME_LEN, UdpCommand};
use serde_json::{Value, json};

use crate::error::CliError;

fn print_json(value: &Value) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}

fn print_json_pretty(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}

pub fn print_error_json(error: &Error) {
    let exit_code = error.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
    print_json_pretty(&json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "exit_code": exit_code,
        }
    }));
}

pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "Caused by:".yellow(), cause);
    }
}

pub fn print_drivers(drivers: &[DriverInfo], json: bool) {
    if json {
        let list: Vec<Value> = drivers
            .iter()
            .map(|info| json!({ "driver_type": info.kind, "description": info.description }))
            .collect();
        print_json_pretty(&json!({ "success": true, "drivers": list }));
        return;
    }

    println!("{}", "Output drivers:".bold());
    for info in drivers {
        println!("  {:<8} {}", info.kind.as_str().cyan(), info.description);
    }
}

pub fn print_ports(ports: &[String], json: bool) {
    if json {
        print_json_pretty(&json!({ "success": true, "ports": ports }));
    } else if ports.is_empty() {
        println!("{}", "No serial ports found".yellow());
    } else {
        println!("{}", "Serial ports:".bold());
        for port in ports {
            println!("  {port}");
        }
    }
}

/// One line per tick: JSON object, or a compact dashboard row.
pub fn print_tick(tick: u64, report: &TickReport, json: bool) {
    if json {
        print_json(&json!({
            "tick": tick,
            "dt": report.dt,
            "telemetry": report.telemetry,
            "frame": report.frame,
            "delivered": report.delivered,
        }));
        return;
    }

    let delivery = match report.delivered {
        Some(true) => "sent".green(),
        Some(false) => "failed".red(),
        None => "-".dimmed(),
    };
    let t = &report.telemetry;
    println!(
        "{tick:>6}  {:<7} gear {:>2}  speed {:>7.2}%  power {:>6.1}%  {delivery}",
        t.mode, t.gear, t.speed, t.power
    );
}

pub fn print_summary(stats: &SessionStats, status: &DriverStatus, json: bool) {
    if json {
        print_json(&json!({ "summary": stats, "output": status }));
        return;
    }

    println!(
        "{} {} ticks, {} sent, {} failed, {} skipped",
        "Done:".bold(),
        stats.ticks,
        stats.frames_sent,
        stats.send_failures,
        stats.frames_skipped
    );
    print_status(status, false);
}

pub fn print_status(status: &DriverStatus, json: bool) {
    if json {
        print_json_pretty(&json!({ "success": status.is_healthy(), "status": status }));
        return;
    }

    let state = if status.connected {
        "connected".green()
    } else {
        "disconnected".red()
    };
    println!("  {} output: {state}", status.driver.as_str().bold());
    if let Some(error) = &status.error {
        println!("  {} {error}", "Last error:".yellow());
    }
}

pub fn print_encoded(command: &UdpCommand, bytes: &[u8; UDP_FRAME_LEN], json: bool) {
    let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
    if json {
        print_json_pretty(&json!({
            "power": command.power,
            "direction": command.direction,
            "steering": command.steering,
            "bytes": hex,
        }));
    } else {
        println!(
            "power {} direction {} steering {}",
            command.power, command.direction, command.steering
        );
        println!("{}", hex.join(" "));
    }
}

pub fn print_written(path: &Path, json: bool) {
    if json {
        print_json_pretty(&json!({ "success": true, "path": path }));
    } else {
        println!("{} {}", "Wrote".green(), path.display());
    }
}

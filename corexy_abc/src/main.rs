//! # CoreXY ABC Binary
//!
//! Builds the kinematics from a machine file over the simulated toolhead,
//! optionally homes every configured axis, validates a list of moves and
//! prints the resulting status as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Home the ABC triplet, then try two moves
//! corexy_abc --config machine.toml --home --move 10,20,0 --move 10,20,5
//!
//! # Verbose JSON logs
//! corexy_abc --config machine.toml -v --json
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use corexy_abc::sim::{SimEventBus, SimHomingState, SimToolhead};
use corexy_abc::{CoreXYKinematics, KinematicsStatus, Move};
use motion_common::config::{ConfigLoader, LogLevel};
use motion_common::consts::DEFAULT_CONFIG_PATH;
use motion_common::machine::MachineConfig;
use serde::Serialize;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// CoreXY ABC - triplet kinematics check against a simulated toolhead
#[derive(Parser, Debug)]
#[command(name = "corexy_abc")]
#[command(version)]
#[command(about = "CoreXY kinematics for a configurable axis triplet")]
#[command(long_about = None)]
struct Args {
    /// Path to the machine configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Home every configured axis before checking moves
    #[arg(long)]
    home: bool,

    /// Target position "X,Y,Z" in triplet coordinates (can be repeated)
    #[arg(
        short,
        long = "move",
        value_name = "X,Y,Z",
        value_parser = parse_point,
        allow_hyphen_values = true,
        action = clap::ArgAction::Append
    )]
    moves: Vec<[f64; 3]>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

/// Outcome of one `--move`.
#[derive(Debug, Serialize)]
struct MoveReport {
    end_pos: [f64; 3],
    accepted: bool,
    max_velocity: f64,
    accel: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct Report {
    status: KinematicsStatus,
    moves: Vec<MoveReport>,
}

fn main() {
    let args = Args::parse();

    // Tracing needs the configured level, so a load failure goes to stderr.
    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("corexy_abc: {e}");
            std::process::exit(1);
        }
    };
    setup_tracing(&args, config.shared.log_level);

    if let Err(e) = run(&args, &config) {
        error!("corexy_abc failed: {e}");
        std::process::exit(1);
    }
}

/// Load the machine file, naming it in the error.
fn load_config(path: &Path) -> Result<MachineConfig, String> {
    MachineConfig::load(path).map_err(|e| format!("{}: {e}", path.display()))
}

fn run(args: &Args, config: &MachineConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    info!(
        "{} v{} starting with {}",
        config.shared.service_name,
        env!("CARGO_PKG_VERSION"),
        args.config.display()
    );

    let mut toolhead = SimToolhead::from_config(&config.printer);
    let mut events = SimEventBus::default();
    let mut kin = CoreXYKinematics::new(
        &mut toolhead,
        &mut events,
        config,
        None,
        &config.kinematics.axis_indices,
        &config.kinematics.axes,
    )?;

    let mut current = [0.0; 3];
    if args.home {
        let mut state = SimHomingState::new(kin.axis_set().indices().to_vec());
        kin.home(&mut state)?;
        current = state.final_position(kin.axis_set().triplet());
        kin.set_position(current, &state.homed_axes())?;
        info!("Homed {:?} at {current:?}", state.homed_axes());
    }

    let mut moves = Vec::with_capacity(args.moves.len());
    for &end_pos in &args.moves {
        let mut mv = Move::new(
            current,
            end_pos,
            config.printer.max_velocity,
            config.printer.max_accel,
        );
        let outcome = kin.check_move(&mut mv);
        let error = match outcome {
            Ok(()) => {
                info!(
                    "Move to {end_pos:?} accepted at {:.3} mm/s",
                    mv.max_cruise_v()
                );
                current = end_pos;
                None
            }
            Err(e) => {
                warn!("Move to {end_pos:?} rejected: {e}");
                Some(e.to_string())
            }
        };
        moves.push(MoveReport {
            end_pos,
            accepted: error.is_none(),
            max_velocity: mv.max_cruise_v(),
            accel: mv.accel,
            error,
        });
    }

    let report = Report {
        status: kin.get_status(0.0),
        moves,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Parse "X,Y,Z" into a triplet-local coordinate.
fn parse_point(s: &str) -> Result<[f64; 3], String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        &[x, y, z] => Ok([x, y, z]),
        _ => Err(format!("expected X,Y,Z, got '{s}'")),
    }
}

/// Setup tracing subscriber based on CLI arguments and the configured level.
fn setup_tracing(args: &Args, log_level: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::from(log_level)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

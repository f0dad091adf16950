//! Command line interface for pendulums

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::config::SimulationConfig;
use crate::driver::{BlowUpPolicy, Pacing};
use crate::error::ConfigError;
use crate::physics::{Role, Scalar};

/// Pendulums - double pendulum chaos simulation
///
/// Steps the coupled equations of motion on a fixed cadence and writes
/// every frame as a CSV row.
#[derive(Parser, Debug, Default)]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about,
    long_about = None
)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Gravitational acceleration (overrides config file)
    #[arg(short = 'g', long, value_name = "VALUE")]
    pub gravity: Option<Scalar>,

    /// Mass of the upper bob
    #[arg(long, value_name = "VALUE")]
    pub upper_mass: Option<Scalar>,

    /// Mass of the lower bob
    #[arg(long, value_name = "VALUE")]
    pub lower_mass: Option<Scalar>,

    /// Length of the upper rod
    #[arg(long, value_name = "VALUE")]
    pub upper_length: Option<Scalar>,

    /// Length of the lower rod
    #[arg(long, value_name = "VALUE")]
    pub lower_length: Option<Scalar>,

    /// Starting angle of the upper rod, in multiples of pi
    #[arg(long, value_name = "MULTIPLE", allow_negative_numbers = true)]
    pub upper_angle: Option<Scalar>,

    /// Starting angle of the lower rod, in multiples of pi
    #[arg(long, value_name = "MULTIPLE", allow_negative_numbers = true)]
    pub lower_angle: Option<Scalar>,

    /// Milliseconds between steps
    #[arg(long, value_name = "MS")]
    pub step_interval: Option<u64>,

    /// Stop after this many steps (runs until interrupted otherwise)
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub steps: Option<u64>,

    /// Step as fast as possible instead of once per step interval
    #[arg(long)]
    pub unpaced: bool,

    /// Stop with an error as soon as the state becomes non-finite
    #[arg(long)]
    pub strict: bool,

    /// Write the CSV trace to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the effective configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub write_config: Option<PathBuf>,

    /// Save the effective configuration as the per-user default and exit
    #[arg(long)]
    pub save_user_config: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Loads configuration from file or defaults, then applies command-line overrides
///
/// An explicit `--config` file must load; the per-user file falls back to
/// defaults when it is missing or broken. Nothing is validated here.
pub fn load_and_apply_config(args: &Args) -> Result<SimulationConfig, ConfigError> {
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        SimulationConfig::load(config_path)?
    } else {
        SimulationConfig::load_from_user_config()
    };

    apply_overrides(args, &mut config);

    Ok(config)
}

/// Applies command-line overrides on top of a loaded configuration
pub fn apply_overrides(args: &Args, config: &mut SimulationConfig) {
    let physics = &mut config.physics;

    if let Some(gravity) = args.gravity {
        info!("Overriding gravity to: {gravity}");
        physics.gravity = gravity;
    }

    let body_overrides = [
        (Role::Upper, args.upper_mass, args.upper_length, args.upper_angle),
        (Role::Lower, args.lower_mass, args.lower_length, args.lower_angle),
    ];
    for (role, mass, length, angle) in body_overrides {
        let body = physics.body_mut(role);
        if let Some(mass) = mass {
            info!("Overriding {role} mass to: {mass}");
            body.mass = mass;
        }
        if let Some(length) = length {
            info!("Overriding {role} length to: {length}");
            body.length = length;
        }
        if let Some(angle) = angle {
            info!("Overriding {role} starting angle to: {angle}π");
            body.initial_angle = angle;
        }
    }

    if let Some(step_interval) = args.step_interval {
        info!("Overriding step interval to: {step_interval} ms");
        physics.step_interval_ms = step_interval;
    }

    if args.unpaced {
        config.driver.pacing = Pacing::Unpaced;
    }

    if args.strict {
        config.driver.blow_up_policy = BlowUpPolicy::Halt;
    }
}

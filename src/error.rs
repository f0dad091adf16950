//! Error types
//!
//! Validation failures are raised before a [`PendulumSystem`] exists, so a
//! system is never partially initialised. Non-finite state is advisory: the
//! core reports it on request and keeps stepping.
//!
//! [`PendulumSystem`]: crate::physics::PendulumSystem

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::driver::RunError;
use crate::physics::{Role, Scalar};

/// A configurable quantity that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Gravity,
    Mass(Role),
    Length(Role),
    StepInterval,
    Role(Role),
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Gravity => write!(f, "gravity"),
            Parameter::Mass(role) => write!(f, "{role} pendulum mass"),
            Parameter::Length(role) => write!(f, "{role} pendulum length"),
            Parameter::StepInterval => write!(f, "step interval"),
            Parameter::Role(role) => write!(f, "{role} pendulum role"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid parameter: {parameter}. {reason}")]
pub struct InvalidParameterError {
    pub parameter: Parameter,
    pub reason: String,
}

impl InvalidParameterError {
    pub fn new(parameter: Parameter, reason: impl Into<String>) -> Self {
        Self {
            parameter,
            reason: reason.into(),
        }
    }

    /// Fails unless `value` is strictly positive. NaN is rejected.
    pub(crate) fn require_positive(parameter: Parameter, value: Scalar) -> Result<(), Self> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(Self::new(
                parameter,
                format!("The {parameter} must be positive, got {value}."),
            ))
        }
    }
}

/// The dynamic quantity of a body that went non-finite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateQuantity {
    AngularAcceleration,
    AngularVelocity,
    Angle,
}

impl fmt::Display for StateQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateQuantity::AngularAcceleration => write!(f, "angular acceleration"),
            StateQuantity::AngularVelocity => write!(f, "angular velocity"),
            StateQuantity::Angle => write!(f, "angle"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("{role} pendulum {quantity} is non-finite ({value}) after step {step}")]
pub struct NonFiniteStateError {
    pub role: Role,
    pub quantity: StateQuantity,
    pub value: Scalar,
    pub step: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write config file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no configuration directory available on this platform")]
    NoConfigDirectory,
}

/// Errors surfaced by the `pendulums` binary
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameterError),
    #[error("simulation halted: {0}")]
    NonFiniteState(#[from] NonFiniteStateError),
    #[error("failed to write trace: {0}")]
    Trace(#[from] std::io::Error),
}

impl From<RunError<std::io::Error>> for CliError {
    fn from(err: RunError<std::io::Error>) -> Self {
        match err {
            RunError::NonFiniteState(err) => CliError::NonFiniteState(err),
            RunError::Observer(err) => CliError::Trace(err),
        }
    }
}

//! Simulation configuration
//!
//! Parameters are read once, validated, and then frozen into a
//! [`PendulumSystem`]. Changing them means building a new system.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::driver::{BlowUpPolicy, Pacing};
use crate::error::{ConfigError, InvalidParameterError, Parameter};
use crate::physics::{PendulumBody, PendulumSystem, Point, Role, Scalar};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SimulationConfig {
    pub physics: SimulationParameters,
    pub driver: DriverConfig,
}

/// Physical parameters for one run
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SimulationParameters {
    pub gravity: Scalar,
    /// Wall-clock milliseconds between steps
    pub step_interval_ms: u64,
    pub upper: BodyParameters,
    pub lower: BodyParameters,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BodyParameters {
    pub mass: Scalar,
    pub length: Scalar,
    /// Starting angle as a multiple of π
    pub initial_angle: Scalar,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            step_interval_ms: 50,
            upper: BodyParameters {
                mass: 20.0,
                length: 100.0,
                initial_angle: 0.25,
            },
            lower: BodyParameters {
                mass: 17.0,
                length: 125.0,
                initial_angle: -0.33,
            },
        }
    }
}

impl SimulationParameters {
    pub fn body(&self, role: Role) -> &BodyParameters {
        match role {
            Role::Upper => &self.upper,
            Role::Lower => &self.lower,
        }
    }

    pub fn body_mut(&mut self, role: Role) -> &mut BodyParameters {
        match role {
            Role::Upper => &mut self.upper,
            Role::Lower => &mut self.lower,
        }
    }

    /// Check every parameter, reporting the first one that is out of range.
    pub fn validate(&self) -> Result<(), InvalidParameterError> {
        InvalidParameterError::require_positive(Parameter::Gravity, self.gravity)?;

        for role in [Role::Upper, Role::Lower] {
            let body = self.body(role);
            InvalidParameterError::require_positive(Parameter::Mass(role), body.mass)?;
            InvalidParameterError::require_positive(Parameter::Length(role), body.length)?;
        }

        if self.step_interval_ms < 1 {
            return Err(InvalidParameterError::new(
                Parameter::StepInterval,
                "There must be at least 1 ms between steps.",
            ));
        }

        Ok(())
    }

    /// Validate and build a fresh system at rest.
    pub fn build_system(&self) -> Result<PendulumSystem, InvalidParameterError> {
        self.validate()?;

        let body = |role: Role| {
            let params = self.body(role);
            PendulumBody::new(role, params.length, params.mass, 0.0)
                .with_angle_multiple_of_pi(params.initial_angle)
        };

        PendulumSystem::new(body(Role::Upper), body(Role::Lower), self.gravity)
    }

    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DriverConfig {
    pub pacing: Pacing,
    pub blow_up_policy: BlowUpPolicy,
    /// Pivot position used for the bob coordinates in the trace
    pub origin: [Scalar; 2],
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            pacing: Pacing::RealTime,
            blow_up_policy: BlowUpPolicy::Continue,
            // Centre of the 600px stage
            origin: [300.0, 300.0],
        }
    }
}

impl DriverConfig {
    pub fn origin(&self) -> Point {
        Point::from(self.origin)
    }
}

impl SimulationConfig {
    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from a file, falling back to defaults if the file doesn't exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                info!("Config file {} not found. Using defaults.", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("{e}. Using defaults.");
                Self::default()
            }
        }
    }

    /// Path of the per-user config file, if the platform has a config directory
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "pendulums").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load the per-user config file, or defaults if there is none
    pub fn load_from_user_config() -> Self {
        match Self::user_config_path() {
            Some(path) => Self::load_or_default(path),
            None => {
                warn!("No configuration directory available. Using defaults.");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save to the per-user config file, creating its directory if needed
    pub fn save_to_user_config(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::user_config_path().ok_or(ConfigError::NoConfigDirectory)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        self.save(&path)?;
        Ok(path)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

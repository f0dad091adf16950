//! Pendulums library
//!
//! The double pendulum integrator plus the configuration, driver and trace
//! output around it. Exposed as a library so renderers and integration tests
//! can drive the core directly.

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod physics;
pub mod trace;

// Re-export commonly used items
pub use config::{BodyParameters, SimulationConfig, SimulationParameters};
pub use driver::{BlowUpPolicy, Driver, Frame, FrameObserver, Pacing};
pub use error::{InvalidParameterError, NonFiniteStateError, Parameter};
pub use physics::{PendulumBody, PendulumSystem, Role, Scalar};

//! Double pendulum physics core

pub mod body;
pub mod math;
pub mod system;

pub use body::{PendulumBody, Role};
pub use math::{PI, Point, Scalar};
pub use system::{
    BobPositions, PendulumSystem, lower_angular_acceleration, upper_angular_acceleration,
};

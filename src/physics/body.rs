//! Pendulum arm state

use std::fmt;

use crate::error::{NonFiniteStateError, StateQuantity};
use crate::physics::math::Scalar;

/// Which arm of the double pendulum a body is
///
/// Selects the equation of motion that applies to the body. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Hangs from the fixed pivot
    Upper,
    /// Hangs from the upper bob
    Lower,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Upper => write!(f, "upper"),
            Role::Lower => write!(f, "lower"),
        }
    }
}

/// One arm of the pendulum: a massless rod of `length` ending in a bob of `mass`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendulumBody {
    role: Role,
    length: Scalar,
    mass: Scalar,
    /// Radians from the downward vertical, unbounded
    pub(crate) angle: Scalar,
    pub(crate) angular_velocity: Scalar,
    pub(crate) angular_acceleration: Scalar,
}

impl PendulumBody {
    /// A body at rest at `angle` radians.
    ///
    /// Length and mass are checked when the body is handed to
    /// [`PendulumSystem::new`](super::PendulumSystem::new).
    pub fn new(role: Role, length: Scalar, mass: Scalar, angle: Scalar) -> Self {
        Self {
            role,
            length,
            mass,
            angle,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
        }
    }

    pub fn upper(length: Scalar, mass: Scalar, angle: Scalar) -> Self {
        Self::new(Role::Upper, length, mass, angle)
    }

    pub fn lower(length: Scalar, mass: Scalar, angle: Scalar) -> Self {
        Self::new(Role::Lower, length, mass, angle)
    }

    /// Starting angle given as a multiple of π, the way the parameters express it
    pub fn with_angle_multiple_of_pi(self, multiple: Scalar) -> Self {
        Self {
            angle: super::math::PI * multiple,
            ..self
        }
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn length(&self) -> Scalar {
        self.length
    }

    #[inline]
    pub fn mass(&self) -> Scalar {
        self.mass
    }

    #[inline]
    pub fn angle(&self) -> Scalar {
        self.angle
    }

    #[inline]
    pub fn angular_velocity(&self) -> Scalar {
        self.angular_velocity
    }

    #[inline]
    pub fn angular_acceleration(&self) -> Scalar {
        self.angular_acceleration
    }

    #[inline]
    pub(crate) fn update_velocity(&mut self) {
        self.angular_velocity += self.angular_acceleration;
    }

    #[inline]
    pub(crate) fn update_displacement(&mut self) {
        self.angle += self.angular_velocity;
    }

    /// First non-finite dynamic quantity, checked in update order
    pub(crate) fn non_finite(&self, step: u64) -> Option<NonFiniteStateError> {
        [
            (StateQuantity::AngularAcceleration, self.angular_acceleration),
            (StateQuantity::AngularVelocity, self.angular_velocity),
            (StateQuantity::Angle, self.angle),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(quantity, value)| NonFiniteStateError {
            role: self.role,
            quantity,
            value,
            step,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::math::PI;

    #[test]
    fn test_new_body_is_at_rest() {
        let body = PendulumBody::upper(100.0, 20.0, 0.5);
        assert_eq!(body.role(), Role::Upper);
        assert_eq!(body.angle(), 0.5);
        assert_eq!(body.angular_velocity(), 0.0);
        assert_eq!(body.angular_acceleration(), 0.0);
    }

    #[test]
    fn test_angle_multiple_of_pi() {
        let body = PendulumBody::lower(125.0, 17.0, 0.0).with_angle_multiple_of_pi(-0.33);
        assert_eq!(body.angle(), PI * -0.33);
        assert_eq!(body.role(), Role::Lower);
    }

    #[test]
    fn test_velocity_then_displacement() {
        let mut body = PendulumBody::upper(1.0, 1.0, 1.0);
        body.angular_acceleration = 0.25;

        body.update_velocity();
        body.update_displacement();

        // Displacement uses the velocity that was just updated
        assert_eq!(body.angular_velocity(), 0.25);
        assert_eq!(body.angle(), 1.25);
    }

    #[test]
    fn test_non_finite_reports_first_quantity() {
        let mut body = PendulumBody::lower(1.0, 1.0, 0.0);
        assert!(body.non_finite(0).is_none());

        body.angle = Scalar::INFINITY;
        body.angular_velocity = Scalar::NAN;
        let err = body.non_finite(7).unwrap();
        assert_eq!(err.role, Role::Lower);
        assert_eq!(err.quantity, StateQuantity::AngularVelocity);
        assert_eq!(err.step, 7);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Upper.to_string(), "upper");
        assert_eq!(Role::Lower.to_string(), "lower");
    }
}

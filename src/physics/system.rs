//! Coupled double pendulum integrator
//!
//! The two arms are advanced together with a unit time step. Each step runs
//! in three stages, and every stage finishes for both bodies before the next
//! one starts:
//!
//! ```text
//! Stage 1: accelerations from the pre-step state of BOTH bodies
//!   a_u = f_u(u, w, g)
//!   a_w = f_w(u, w, g)
//!
//! Stage 2: velocities
//!   v_u += a_u
//!   v_w += a_w
//!
//! Stage 3: angles, using the NEW velocities
//!   θ_u += v_u
//!   θ_w += v_w
//! ```
//!
//! Updating velocity before angle makes this semi-implicit (symplectic)
//! Euler. Computing one body's acceleration after the other body has already
//! moved would mix two time levels and corrupt the coupling.
//!
//! Nothing is clamped. A denominator that reaches zero yields an infinite or
//! NaN acceleration which then flows into velocity and angle; use
//! [`PendulumSystem::check_finite`] to detect it.

use tracing::debug;

use crate::error::{InvalidParameterError, NonFiniteStateError, Parameter};
use crate::physics::body::{PendulumBody, Role};
use crate::physics::math::{Point, Scalar, cos, sin};

/// Angular acceleration of the upper arm
///
/// `u` is the upper body, `w` the lower one, `g` the gravitational
/// acceleration. Evaluated on whatever state is passed in; nothing is
/// validated, so a zero denominator is reported as an infinite or NaN result.
pub fn upper_angular_acceleration(u: &PendulumBody, w: &PendulumBody, g: Scalar) -> Scalar {
    let num1 = -g * (2.0 * u.mass() + w.mass()) * sin(u.angle);
    let num2 = -w.mass() * g * sin(u.angle - 2.0 * w.angle);
    let num3 = -2.0 * sin(u.angle - w.angle) * w.mass();
    let num4 = w.angular_velocity * w.angular_velocity * w.length()
        + u.angular_velocity * u.angular_velocity * u.length() * cos(u.angle - w.angle);
    let den = u.length() * mass_term(u, w);

    (num1 + num2 + num3 * num4) / den
}

/// Angular acceleration of the lower arm
///
/// Same conventions as [`upper_angular_acceleration`].
pub fn lower_angular_acceleration(u: &PendulumBody, w: &PendulumBody, g: Scalar) -> Scalar {
    let num1 = 2.0 * sin(u.angle - w.angle);
    let num2 = u.angular_velocity * u.angular_velocity * u.length() * (u.mass() + w.mass());
    let num3 = g * (u.mass() + w.mass()) * cos(u.angle);
    let num4 = w.angular_velocity * w.angular_velocity
        * w.length()
        * w.mass()
        * cos(u.angle - w.angle);
    let den = w.length() * mass_term(u, w);

    (num1 * (num2 + num3 + num4)) / den
}

// Shared factor of both denominators
#[inline]
fn mass_term(u: &PendulumBody, w: &PendulumBody) -> Scalar {
    2.0 * u.mass() + w.mass() - w.mass() * cos(2.0 * u.angle - 2.0 * w.angle)
}

/// Cartesian bob positions for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BobPositions {
    pub pivot: Point,
    pub upper: Point,
    pub lower: Point,
}

/// Two coupled pendulum arms under constant gravity
#[derive(Debug, Clone, PartialEq)]
pub struct PendulumSystem {
    upper: PendulumBody,
    lower: PendulumBody,
    gravity: Scalar,
    steps: u64,
}

impl PendulumSystem {
    /// Build a system from an upper and a lower body.
    ///
    /// Both bodies start at rest at their given angle. Fails, without
    /// building anything, if gravity, either mass or either length is not
    /// strictly positive, or if the bodies are not an upper/lower pair.
    pub fn new(
        upper: PendulumBody,
        lower: PendulumBody,
        gravity: Scalar,
    ) -> Result<Self, InvalidParameterError> {
        InvalidParameterError::require_positive(Parameter::Gravity, gravity)?;

        for (expected, body) in [(Role::Upper, &upper), (Role::Lower, &lower)] {
            if body.role() != expected {
                return Err(InvalidParameterError::new(
                    Parameter::Role(expected),
                    format!("Expected the {expected} body, got the {} body.", body.role()),
                ));
            }
            InvalidParameterError::require_positive(Parameter::Mass(expected), body.mass())?;
            InvalidParameterError::require_positive(Parameter::Length(expected), body.length())?;
        }

        debug!(
            gravity,
            upper_angle = upper.angle(),
            lower_angle = lower.angle(),
            "pendulum system created"
        );

        Ok(Self {
            upper: PendulumBody::new(Role::Upper, upper.length(), upper.mass(), upper.angle()),
            lower: PendulumBody::new(Role::Lower, lower.length(), lower.mass(), lower.angle()),
            gravity,
            steps: 0,
        })
    }

    /// Advance both bodies by one unit time step.
    pub fn advance(&mut self) {
        let upper_acceleration =
            upper_angular_acceleration(&self.upper, &self.lower, self.gravity);
        let lower_acceleration =
            lower_angular_acceleration(&self.upper, &self.lower, self.gravity);

        self.upper.angular_acceleration = upper_acceleration;
        self.lower.angular_acceleration = lower_acceleration;

        self.upper.update_velocity();
        self.lower.update_velocity();

        self.upper.update_displacement();
        self.lower.update_displacement();

        self.steps += 1;
    }

    /// Report the first non-finite quantity, upper body first.
    ///
    /// Stepping is unaffected either way; what to do about a blow-up is up
    /// to the caller.
    pub fn check_finite(&self) -> Result<(), NonFiniteStateError> {
        match self
            .upper
            .non_finite(self.steps)
            .or_else(|| self.lower.non_finite(self.steps))
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn body(&self, role: Role) -> &PendulumBody {
        match role {
            Role::Upper => &self.upper,
            Role::Lower => &self.lower,
        }
    }

    #[inline]
    pub fn current_angle(&self, role: Role) -> Scalar {
        self.body(role).angle()
    }

    #[inline]
    pub fn current_angular_velocity(&self, role: Role) -> Scalar {
        self.body(role).angular_velocity()
    }

    #[inline]
    pub fn current_angular_acceleration(&self, role: Role) -> Scalar {
        self.body(role).angular_acceleration()
    }

    #[inline]
    pub fn length(&self, role: Role) -> Scalar {
        self.body(role).length()
    }

    #[inline]
    pub fn mass(&self, role: Role) -> Scalar {
        self.body(role).mass()
    }

    #[inline]
    pub fn gravity(&self) -> Scalar {
        self.gravity
    }

    /// Number of completed [`advance`](Self::advance) calls
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Where the renderer draws the bobs when the pivot sits at `origin`
    pub fn bob_positions(&self, origin: Point) -> BobPositions {
        let upper = origin.offset(self.upper.length(), self.upper.angle());
        let lower = upper.offset(self.lower.length(), self.lower.angle());

        BobPositions {
            pivot: origin,
            upper,
            lower,
        }
    }
}

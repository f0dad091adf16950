//! Fixed-cadence driver
//!
//! Owns one [`PendulumSystem`], advances it once per step interval and hands
//! every resulting [`Frame`] to a [`FrameObserver`]. Readers only ever see
//! the state between two `advance()` calls.

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::error::{InvalidParameterError, NonFiniteStateError};
use crate::physics::{BobPositions, PendulumSystem, Point, Role, Scalar};

/// How steps are spaced in time
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    /// One step per step interval of wall-clock time
    #[default]
    RealTime,
    /// Back to back, for traces and batch runs
    Unpaced,
}

/// What to do once the state stops being finite
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlowUpPolicy {
    /// Log once and keep stepping
    #[default]
    Continue,
    /// Stop and return the error
    Halt,
}

/// Dynamic state of one body as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub angle: Scalar,
    pub angular_velocity: Scalar,
    pub angular_acceleration: Scalar,
}

/// Snapshot taken right after a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Number of completed steps, starting at 1
    pub step: u64,
    pub upper: BodyState,
    pub lower: BodyState,
    pub positions: BobPositions,
}

impl Frame {
    pub fn capture(system: &PendulumSystem, origin: Point) -> Self {
        let state = |role| BodyState {
            angle: system.current_angle(role),
            angular_velocity: system.current_angular_velocity(role),
            angular_acceleration: system.current_angular_acceleration(role),
        };

        Self {
            step: system.steps(),
            upper: state(Role::Upper),
            lower: state(Role::Lower),
            positions: system.bob_positions(origin),
        }
    }
}

/// Receives each frame; stands in for the renderer
pub trait FrameObserver {
    type Error;

    fn observe(&mut self, frame: &Frame) -> Result<ControlFlow<()>, Self::Error>;
}

impl<F, E> FrameObserver for F
where
    F: FnMut(&Frame) -> Result<ControlFlow<()>, E>,
{
    type Error = E;

    fn observe(&mut self, frame: &Frame) -> Result<ControlFlow<()>, E> {
        self(frame)
    }
}

#[derive(Debug, Error)]
pub enum RunError<E> {
    #[error(transparent)]
    NonFiniteState(#[from] NonFiniteStateError),
    #[error("frame observer failed: {0}")]
    Observer(E),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub steps: u64,
    /// First non-finite state seen, when the policy let the run continue past it
    pub blow_up: Option<NonFiniteStateError>,
}

pub struct Driver {
    system: PendulumSystem,
    step_interval: Duration,
    pacing: Pacing,
    policy: BlowUpPolicy,
    origin: Point,
    blow_up: Option<NonFiniteStateError>,
}

impl Driver {
    pub fn new(
        system: PendulumSystem,
        step_interval: Duration,
        pacing: Pacing,
        policy: BlowUpPolicy,
    ) -> Self {
        Self {
            system,
            step_interval,
            pacing,
            policy,
            origin: Point::ORIGIN,
            blow_up: None,
        }
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Validate the parameters and build a driver around a fresh system
    pub fn from_config(config: &SimulationConfig) -> Result<Self, InvalidParameterError> {
        let system = config.physics.build_system()?;

        Ok(Self::new(
            system,
            config.physics.step_interval(),
            config.driver.pacing,
            config.driver.blow_up_policy,
        )
        .with_origin(config.driver.origin()))
    }

    pub fn system(&self) -> &PendulumSystem {
        &self.system
    }

    /// Advance once and apply the blow-up policy
    pub fn step(&mut self) -> Result<Frame, NonFiniteStateError> {
        self.system.advance();

        if self.blow_up.is_none() {
            if let Err(err) = self.system.check_finite() {
                match self.policy {
                    BlowUpPolicy::Halt => return Err(err),
                    BlowUpPolicy::Continue => {
                        warn!("{err}; continuing");
                        self.blow_up = Some(err);
                    }
                }
            }
        }

        Ok(Frame::capture(&self.system, self.origin))
    }

    /// Step until `max_steps` frames have been produced or the observer breaks.
    ///
    /// `None` runs until the observer breaks.
    pub fn run<O: FrameObserver>(
        &mut self,
        max_steps: Option<u64>,
        observer: &mut O,
    ) -> Result<RunSummary, RunError<O::Error>> {
        info!(
            ?max_steps,
            pacing = ?self.pacing,
            interval_ms = self.step_interval.as_millis() as u64,
            "starting run"
        );

        let mut steps = 0;
        let mut next_deadline = Instant::now() + self.step_interval;

        while max_steps.is_none_or(|max| steps < max) {
            if self.pacing == Pacing::RealTime {
                let now = Instant::now();
                if next_deadline > now {
                    std::thread::sleep(next_deadline - now);
                }
                next_deadline += self.step_interval;
            }

            let frame = self.step()?;
            steps += 1;

            if observer
                .observe(&frame)
                .map_err(RunError::Observer)?
                .is_break()
            {
                debug!(step = frame.step, "observer stopped the run");
                break;
            }
        }

        info!(steps, total_steps = self.system.steps(), "run finished");

        Ok(RunSummary {
            steps,
            blow_up: self.blow_up,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationParameters;
    use crate::error::StateQuantity;
    use crate::physics::PendulumBody;
    use std::convert::Infallible;

    fn unpaced(system: PendulumSystem, policy: BlowUpPolicy) -> Driver {
        Driver::new(system, Duration::from_millis(1), Pacing::Unpaced, policy)
    }

    fn overflowing_system() -> PendulumSystem {
        PendulumSystem::new(
            PendulumBody::upper(100.0, Scalar::MAX, 0.25),
            PendulumBody::lower(125.0, Scalar::MAX, -1.0),
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn test_run_stops_at_max_steps() {
        let system = SimulationParameters::default().build_system().unwrap();
        let mut driver = unpaced(system, BlowUpPolicy::Continue);

        let mut seen = Vec::new();
        let summary = driver
            .run(Some(25), &mut |frame: &Frame| {
                seen.push(frame.step);
                Ok::<_, Infallible>(ControlFlow::Continue(()))
            })
            .unwrap();

        assert_eq!(summary.steps, 25);
        assert!(summary.blow_up.is_none());
        assert_eq!(seen, (1..=25).collect::<Vec<_>>());
        assert_eq!(driver.system().steps(), 25);
    }

    #[test]
    fn test_observer_can_break() {
        let system = SimulationParameters::default().build_system().unwrap();
        let mut driver = unpaced(system, BlowUpPolicy::Continue);

        let summary = driver
            .run(None, &mut |frame: &Frame| {
                Ok::<_, Infallible>(if frame.step == 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                })
            })
            .unwrap();

        assert_eq!(summary.steps, 3);
    }

    #[test]
    fn test_halt_policy_stops_on_blow_up() {
        let mut driver = unpaced(overflowing_system(), BlowUpPolicy::Halt);

        let result = driver.run(Some(10), &mut |_: &Frame| {
            Ok::<_, Infallible>(ControlFlow::Continue(()))
        });

        match result {
            Err(RunError::NonFiniteState(err)) => {
                assert_eq!(err.step, 1);
                assert_eq!(err.quantity, StateQuantity::AngularAcceleration);
            }
            other => panic!("expected a non-finite state error, got {other:?}"),
        }
    }

    #[test]
    fn test_continue_policy_records_blow_up() {
        let mut driver = unpaced(overflowing_system(), BlowUpPolicy::Continue);

        let summary = driver
            .run(Some(10), &mut |frame: &Frame| {
                assert!(frame.upper.angle.is_nan());
                Ok::<_, Infallible>(ControlFlow::Continue(()))
            })
            .unwrap();

        assert_eq!(summary.steps, 10);
        assert_eq!(summary.blow_up.map(|err| err.step), Some(1));
    }

    #[test]
    fn test_observer_error_propagates() {
        let system = SimulationParameters::default().build_system().unwrap();
        let mut driver = unpaced(system, BlowUpPolicy::Continue);

        let result = driver.run(Some(5), &mut |_: &Frame| Err::<ControlFlow<()>, _>("sink closed"));
        assert!(matches!(result, Err(RunError::Observer("sink closed"))));
    }

    #[test]
    fn test_real_time_pacing_waits_between_steps() {
        let system = SimulationParameters::default().build_system().unwrap();
        let mut driver = Driver::new(
            system,
            Duration::from_millis(5),
            Pacing::RealTime,
            BlowUpPolicy::Continue,
        );

        let started = Instant::now();
        driver
            .run(Some(4), &mut |_: &Frame| {
                Ok::<_, Infallible>(ControlFlow::Continue(()))
            })
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_frame_carries_positions() {
        let config = SimulationConfig::default();
        let mut driver = Driver::from_config(&config).unwrap();

        let frame = driver.step().unwrap();
        assert_eq!(frame.step, 1);
        assert_eq!(frame.positions.pivot, Point::new(300.0, 300.0));
        assert_eq!(
            frame.positions,
            driver.system().bob_positions(Point::new(300.0, 300.0))
        );
    }
}

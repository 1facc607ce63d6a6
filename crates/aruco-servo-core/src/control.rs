//! Bang-bang vertical servo law.

use crate::{Centroid, MarkerLostPolicy, ServoConfig, VelocityCommand};
use std::fmt;

/// Direction chosen for one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Marker at or below the setpoint: `linear.x = -magnitude`.
    Down,
    /// Marker above the setpoint: `linear.x = +magnitude`.
    Up,
    /// No marker and [`MarkerLostPolicy::Stop`]: zero command.
    Hold,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Down => "DOWN",
            Self::Up => "UP",
            Self::Hold => "HOLD",
        })
    }
}

/// Output of [`ServoController::decide`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    /// `centroid.y - setpoint`, if the sign rule ran.
    pub diff: Option<f64>,
    pub direction: Direction,
    pub command: VelocityCommand,
}

/// Stateless controller mapping a centroid to one of two fixed commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ServoController {
    setpoint: f64,
    magnitude: f64,
    marker_lost: MarkerLostPolicy,
}

impl ServoController {
    pub fn new(setpoint: f64, magnitude: f64, marker_lost: MarkerLostPolicy) -> Self {
        Self {
            setpoint,
            magnitude,
            marker_lost,
        }
    }

    pub fn from_config(cfg: &ServoConfig) -> Self {
        Self::new(cfg.setpoint(), cfg.command_magnitude, cfg.marker_lost)
    }

    #[inline]
    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    #[inline]
    pub fn marker_lost(&self) -> MarkerLostPolicy {
        self.marker_lost
    }

    /// Pick the command for `centroid`.
    ///
    /// `diff >= 0` commands down, `diff < 0` commands up, both at the fixed
    /// magnitude. The absent sentinel only reaches the sign rule under
    /// [`MarkerLostPolicy::Legacy`]. Only the full `(-1, -1)` sentinel counts
    /// as absent; a centroid with just `y == -1` goes through the sign rule.
    pub fn decide(&self, centroid: Centroid) -> Decision {
        if centroid.is_absent() && self.marker_lost == MarkerLostPolicy::Stop {
            return Decision {
                diff: None,
                direction: Direction::Hold,
                command: VelocityCommand::STOP,
            };
        }

        let diff = f64::from(centroid.y) - self.setpoint;
        let (direction, linear_x) = if diff >= 0.0 {
            (Direction::Down, -self.magnitude)
        } else {
            (Direction::Up, self.magnitude)
        };

        Decision {
            diff: Some(diff),
            direction,
            command: VelocityCommand::linear_x(linear_x),
        }
    }

    /// Shorthand for `decide(centroid).command`.
    #[inline]
    pub fn command_for(&self, centroid: Centroid) -> VelocityCommand {
        self.decide(centroid).command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(policy: MarkerLostPolicy) -> ServoController {
        ServoController::new(300.0, 5.0, policy)
    }

    #[test]
    fn at_or_below_setpoint_commands_down() {
        let c = controller(MarkerLostPolicy::Stop);
        for y in [300, 301, 310, 599, 10_000] {
            let d = c.decide(Centroid::new(400, y));
            assert_eq!(d.direction, Direction::Down, "y={y}");
            assert_eq!(d.command, VelocityCommand::linear_x(-5.0));
        }
    }

    #[test]
    fn above_setpoint_commands_up() {
        let c = controller(MarkerLostPolicy::Stop);
        for y in [299, 100, 0, -500] {
            let d = c.decide(Centroid::new(400, y));
            assert_eq!(d.direction, Direction::Up, "y={y}");
            assert_eq!(d.command, VelocityCommand::linear_x(5.0));
        }
    }

    #[test]
    fn magnitude_does_not_scale_with_offset() {
        let c = controller(MarkerLostPolicy::Stop);
        let near = c.command_for(Centroid::new(0, 301));
        let far = c.command_for(Centroid::new(0, 1300));
        assert_eq!(near.linear.x.abs(), far.linear.x.abs());

        let near = c.command_for(Centroid::new(0, 299));
        let far = c.command_for(Centroid::new(0, -700));
        assert_eq!(near, far);
    }

    #[test]
    fn diff_is_reported() {
        let c = controller(MarkerLostPolicy::Stop);
        assert_eq!(c.decide(Centroid::new(0, 310)).diff, Some(10.0));
        assert_eq!(c.decide(Centroid::new(0, 100)).diff, Some(-200.0));
    }

    #[test]
    fn stop_policy_holds_without_marker() {
        let d = controller(MarkerLostPolicy::Stop).decide(Centroid::ABSENT);
        assert_eq!(d.direction, Direction::Hold);
        assert_eq!(d.diff, None);
        assert!(d.command.is_stop());
    }

    #[test]
    fn legacy_policy_treats_sentinel_as_far_above() {
        let d = controller(MarkerLostPolicy::Legacy).decide(Centroid::ABSENT);
        assert_eq!(d.diff, Some(-301.0));
        assert_eq!(d.direction, Direction::Up);
        assert_eq!(d.command, VelocityCommand::linear_x(5.0));
    }

    #[test]
    fn only_the_full_sentinel_counts_as_absent() {
        let c = controller(MarkerLostPolicy::Stop);
        let d = c.decide(Centroid::new(400, -1));
        assert_eq!(d.direction, Direction::Up);
        assert_eq!(d.diff, Some(-301.0));
        assert_eq!(c.decide(Centroid::new(-1, -1)).direction, Direction::Hold);
    }

    #[test]
    fn from_config_uses_frame_midpoint() {
        let cfg = ServoConfig {
            frame_height: 480,
            command_magnitude: 2.5,
            ..ServoConfig::default()
        };
        let c = ServoController::from_config(&cfg);
        assert_eq!(c.setpoint(), 240.0);
        assert_eq!(c.command_for(Centroid::new(0, 240)), VelocityCommand::linear_x(-2.5));
    }
}

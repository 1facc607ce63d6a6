use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// One detected marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerDetection {
    pub id: i32,
    /// Image-space corners in detector order: TL, TR, BR, BL.
    pub corners: [Point2<f32>; 4],
}

impl MarkerDetection {
    #[inline]
    pub fn top_left(&self) -> Point2<f32> {
        self.corners[0]
    }

    #[inline]
    pub fn bottom_right(&self) -> Point2<f32> {
        self.corners[2]
    }
}

/// Result of one detector run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Detections {
    /// Accepted markers, in whatever order the detector produced them.
    pub markers: Vec<MarkerDetection>,
    /// Number of candidate quads the detector rejected.
    pub rejected: usize,
}

impl Detections {
    pub fn new(markers: Vec<MarkerDetection>) -> Self {
        Self {
            markers,
            rejected: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Integer pixel centroid of a marker, or [`Centroid::ABSENT`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Centroid {
    pub x: i32,
    pub y: i32,
}

impl Centroid {
    /// Sentinel reported when no marker is in view.
    pub const ABSENT: Centroid = Centroid { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        *self == Self::ABSENT
    }

    /// `None` for the sentinel, the point otherwise.
    pub fn as_point(&self) -> Option<Point2<i32>> {
        (!self.is_absent()).then(|| Point2::new(self.x, self.y))
    }
}

/// Three-component vector in `geometry_msgs/Vector3` layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Velocity command in `geometry_msgs/Twist` layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityCommand {
    pub linear: Vector3,
    pub angular: Vector3,
}

impl VelocityCommand {
    /// All-zero command.
    pub const STOP: VelocityCommand = VelocityCommand {
        linear: Vector3 {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        },
        angular: Vector3 {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        },
    };

    /// Command moving only along `linear.x`.
    pub fn linear_x(value: f64) -> Self {
        Self {
            linear: Vector3 {
                x: value,
                ..Vector3::default()
            },
            ..Self::STOP
        }
    }

    #[inline]
    pub fn is_stop(&self) -> bool {
        *self == Self::STOP
    }
}

/// Inbound position update (`turtlesim/Pose` layout). Only its arrival
/// is used; the payload is carried for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseEvent {
    pub x: f32,
    pub y: f32,
    pub theta: f32,
    pub linear_velocity: f32,
    pub angular_velocity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_centroid_has_no_point() {
        assert!(Centroid::ABSENT.is_absent());
        assert_eq!(Centroid::ABSENT.as_point(), None);
        assert_eq!(Centroid::new(0, 0).as_point(), Some(Point2::new(0, 0)));
    }

    #[test]
    fn linear_x_leaves_other_axes_zero() {
        let cmd = VelocityCommand::linear_x(-5.0);
        assert_eq!(cmd.linear.x, -5.0);
        assert_eq!(cmd.linear.y, 0.0);
        assert_eq!(cmd.linear.z, 0.0);
        assert_eq!(cmd.angular, Vector3::default());
        assert!(!cmd.is_stop());
        assert!(VelocityCommand::default().is_stop());
    }

    #[test]
    fn twist_json_layout() {
        let json = serde_json::to_value(VelocityCommand::linear_x(5.0)).unwrap();
        assert_eq!(json["linear"]["x"], 5.0);
        assert_eq!(json["angular"]["z"], 0.0);
    }
}

//! Facade crate for the `aruco-servo-*` workspace.
//!
//! The servo watches a camera, finds the first ArUco marker in each frame
//! and publishes a fixed-magnitude `linear.x` command that drives the
//! marker's vertical position toward the middle of the frame. One cycle runs
//! per inbound pose event.
//!
//! ## API map
//! - `aruco_servo::core`: dictionaries, configuration, locator, controller,
//!   pipeline and the JSON-lines transport.
//! - `aruco_servo::opencv` (feature `opencv`): camera, detector, debug window
//!   and marker generator.
//! - `aruco_servo::ros` (feature `ros2`): turtlesim pose subscription and
//!   `cmd_vel` publisher.
//! - `aruco_servo::node` (feature `opencv`): wires a camera pipeline to any
//!   event source and command sink.
//!
//! ## Quickstart
//!
//! ```no_run
//! # #[cfg(feature = "opencv")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use aruco_servo::{node, JsonLinesEvents, JsonLinesSink, ServoConfig};
//!
//! let cfg = ServoConfig::default();
//! let mut events = JsonLinesEvents::new(std::io::stdin().lock());
//! let stats = node::run_node(&cfg, &mut events, JsonLinesSink::new(std::io::stdout()))?;
//! println!("published {} commands", stats.published);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "opencv"))]
//! # fn main() {}
//! ```

pub use aruco_servo_core as core;
#[cfg(feature = "opencv")]
pub use aruco_servo_opencv as opencv;
#[cfg(feature = "ros2")]
pub use aruco_servo_ros as ros;

pub use aruco_servo_core::{
    run_event_loop, CameraSource, Centroid, CommandSink, ConfigError, CycleError, CycleOutcome,
    DebugView, Decision, Direction, EventSource, FrameSource, JsonLinesEvents, JsonLinesSink,
    LoopStats, MarkerDetector, MarkerDictionary, MarkerLostPolicy, PoseEvent, ServoConfig,
    ServoController, ServoPipeline, VelocityCommand,
};

#[cfg(feature = "opencv")]
pub mod node;

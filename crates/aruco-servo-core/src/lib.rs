//! Core of the ArUco vertical servo.
//!
//! This crate holds everything with decision logic: dictionary selection,
//! configuration, first-match marker location, the bang-bang controller and
//! the synchronous detection-to-command pipeline. Cameras, detectors, debug
//! windows and message buses plug in through the traits in [`traits`]; the
//! crate itself does not depend on any image library.

mod config;
mod control;
mod dictionary;
mod locate;
mod logger;
mod pipeline;
pub mod traits;
mod transport;
mod types;

pub use config::{
    CameraSource, ConfigError, DisplayConfig, MarkerLostPolicy, ServoConfig, TopicConfig,
};
pub use control::{Decision, Direction, ServoController};
pub use dictionary::{DictionaryInfo, MarkerDictionary, UnknownDictionary};
pub use locate::{marker_centroid, MarkerLocator};
pub use pipeline::{run_event_loop, CycleError, CycleOutcome, LoopStats, ServoPipeline};
pub use traits::{
    CaptureError, CommandSink, DebugView, DetectError, DisplayError, EventSource, FrameSource,
    MarkerDetector, NoDebugView, SinkError, TransportError, ViewAction,
};
pub use transport::{JsonLinesEvents, JsonLinesSink};
pub use types::{Centroid, Detections, MarkerDetection, PoseEvent, Vector3, VelocityCommand};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

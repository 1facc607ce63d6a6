//! Camera-backed servo node.

use aruco_servo_core::{
    run_event_loop, CommandSink, ConfigError, EventSource, LoopStats, ServoConfig, ServoPipeline,
    TransportError,
};
use aruco_servo_opencv::{ArucoMarkerDetector, CameraFrameSource, HighGuiView, OpenCvSetupError};
use log::info;

/// Pipeline over the OpenCV camera, detector and (optional) debug window.
pub type CameraPipeline<K> =
    ServoPipeline<CameraFrameSource, ArucoMarkerDetector, K, Option<HighGuiView>>;

#[derive(thiserror::Error, Debug)]
pub enum NodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Setup(#[from] OpenCvSetupError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Validate `cfg`, then open the camera, the detector and, when enabled, the
/// debug window.
pub fn open_camera_pipeline<K: CommandSink>(
    cfg: &ServoConfig,
    sink: K,
) -> Result<CameraPipeline<K>, NodeError> {
    cfg.validate()?;
    let source = CameraFrameSource::open(cfg)?;
    let detector = ArucoMarkerDetector::new(cfg.dictionary)?;
    let view = if cfg.display.enabled {
        Some(HighGuiView::new(&cfg.display)?)
    } else {
        None
    };
    info!(
        "servo ready: {} setpoint y={} magnitude {} marker_lost={:?}",
        cfg.dictionary,
        cfg.setpoint(),
        cfg.command_magnitude,
        cfg.marker_lost
    );
    Ok(ServoPipeline::new(source, detector, sink, cfg).with_view(view))
}

/// Run a camera pipeline for every event of `events` until it closes.
pub fn run_node<E, K>(cfg: &ServoConfig, events: &mut E, sink: K) -> Result<LoopStats, NodeError>
where
    E: EventSource + ?Sized,
    K: CommandSink,
{
    let mut pipeline = open_camera_pipeline(cfg, sink)?;
    Ok(run_event_loop(events, &mut pipeline)?)
}

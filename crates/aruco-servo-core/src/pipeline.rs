//! Detection-to-command pipeline.
//!
//! One cycle runs capture, detection, location, control, the optional debug
//! view and publication, in that order, synchronously. Cycles are triggered by
//! events from an [`EventSource`]; nothing is carried from one cycle to the
//! next.

use crate::{
    CaptureError, Centroid, CommandSink, DebugView, Decision, DetectError, DisplayError,
    EventSource, FrameSource, MarkerDetector, MarkerLocator, NoDebugView, PoseEvent, ServoConfig,
    ServoController, SinkError, TransportError, ViewAction,
};
use log::{debug, info, warn};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Why a cycle ended without publishing because something failed.
#[derive(thiserror::Error, Debug)]
pub enum CycleError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error(transparent)]
    Display(#[from] DisplayError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// How a cycle that did not fail ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CycleOutcome {
    /// The command was delivered to the sink.
    Published {
        centroid: Centroid,
        decision: Decision,
    },
    /// The debug view requested an abort; nothing was published.
    Aborted {
        centroid: Centroid,
        decision: Decision,
    },
}

impl CycleOutcome {
    #[inline]
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }

    pub fn decision(&self) -> &Decision {
        match self {
            Self::Published { decision, .. } | Self::Aborted { decision, .. } => decision,
        }
    }
}

/// Per-run counters kept by [`run_event_loop`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub events: usize,
    pub published: usize,
    pub aborted: usize,
    /// Cycles skipped because a frame could not be captured.
    pub no_frame: usize,
    /// Cycles skipped for any other error.
    pub failed: usize,
}

/// The servo pipeline with its collaborators.
pub struct ServoPipeline<S, D, K, V = NoDebugView> {
    source: S,
    detector: D,
    sink: K,
    view: V,
    locator: MarkerLocator,
    controller: ServoController,
}

impl<S, D, K> ServoPipeline<S, D, K, NoDebugView>
where
    S: FrameSource,
    D: MarkerDetector<S::Frame>,
    K: CommandSink,
{
    /// Build a pipeline without a debug view.
    pub fn new(source: S, detector: D, sink: K, cfg: &ServoConfig) -> Self {
        Self {
            source,
            detector,
            sink,
            view: NoDebugView,
            locator: MarkerLocator,
            controller: ServoController::from_config(cfg),
        }
    }
}

impl<S, D, K, V> ServoPipeline<S, D, K, V>
where
    S: FrameSource,
    D: MarkerDetector<S::Frame>,
    K: CommandSink,
    V: DebugView<S::Frame>,
{
    /// Replace the debug view.
    pub fn with_view<W: DebugView<S::Frame>>(self, view: W) -> ServoPipeline<S, D, K, W> {
        ServoPipeline {
            source: self.source,
            detector: self.detector,
            sink: self.sink,
            view,
            locator: self.locator,
            controller: self.controller,
        }
    }

    #[inline]
    pub fn controller(&self) -> &ServoController {
        &self.controller
    }

    #[inline]
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Handler bound to the inbound event. The payload is not used.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, event), fields(x = event.x, y = event.y))
    )]
    pub fn handle_event(&mut self, event: &PoseEvent) -> Result<CycleOutcome, CycleError> {
        debug!(
            "pose event x={:.3} y={:.3} theta={:.3}",
            event.x, event.y, event.theta
        );
        self.run_cycle()
    }

    /// Run one full cycle.
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip(self)))]
    pub fn run_cycle(&mut self) -> Result<CycleOutcome, CycleError> {
        let mut frame = self.source.capture()?;
        let detections = self.detector.detect(&frame)?;
        if detections.rejected > 0 {
            debug!("{} rejected marker candidates", detections.rejected);
        }

        let centroid = self.locator.locate(&detections.markers);
        if let Some(first) = detections.markers.first() {
            debug!(
                "marker id={} centroid=({}, {}) of {} detected",
                first.id,
                centroid.x,
                centroid.y,
                detections.markers.len()
            );
        }

        let decision = self.controller.decide(centroid);
        match decision.diff {
            Some(diff) => debug!("diff={diff} -> {}", decision.direction),
            None => debug!("no marker -> {}", decision.direction),
        }

        if self.view.show(&mut frame, &detections)? == ViewAction::Abort {
            info!("cycle aborted from debug view");
            return Ok(CycleOutcome::Aborted { centroid, decision });
        }

        self.sink.publish(&decision.command)?;
        Ok(CycleOutcome::Published { centroid, decision })
    }
}

/// Drive `pipeline` with every event from `events` until the source closes.
///
/// Cycle errors are logged and counted; the loop keeps serving events.
/// Only a failing event source ends the loop early.
pub fn run_event_loop<E, S, D, K, V>(
    events: &mut E,
    pipeline: &mut ServoPipeline<S, D, K, V>,
) -> Result<LoopStats, TransportError>
where
    E: EventSource + ?Sized,
    S: FrameSource,
    D: MarkerDetector<S::Frame>,
    K: CommandSink,
    V: DebugView<S::Frame>,
{
    let mut stats = LoopStats::default();
    while let Some(event) = events.next_event()? {
        stats.events += 1;
        match pipeline.handle_event(&event) {
            Ok(CycleOutcome::Published { .. }) => stats.published += 1,
            Ok(CycleOutcome::Aborted { .. }) => stats.aborted += 1,
            Err(CycleError::Capture(CaptureError::NoFrame)) => {
                warn!("no frame from camera, skipping cycle");
                stats.no_frame += 1;
            }
            Err(err) => {
                warn!("cycle failed: {err}");
                stats.failed += 1;
            }
        }
    }
    info!(
        "event source closed after {} events ({} published, {} aborted, {} without frame, {} failed)",
        stats.events, stats.published, stats.aborted, stats.no_frame, stats.failed
    );
    Ok(stats)
}

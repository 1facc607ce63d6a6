//! Seams between the servo pipeline and its collaborators.

use crate::{Detections, PoseEvent, VelocityCommand};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("capture device returned no frame")]
    NoFrame,
    #[error("capture backend error")]
    Backend(#[source] BoxError),
}

#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("marker detector error")]
    Backend(#[source] BoxError),
}

#[derive(thiserror::Error, Debug)]
pub enum DisplayError {
    #[error("debug view error")]
    Backend(#[source] BoxError),
}

#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("command channel error")]
    Backend(#[source] BoxError),
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed event on line {line}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("event source error")]
    Backend(#[source] BoxError),
}

/// Produces the most recent frame, already resized to the configured size.
pub trait FrameSource {
    type Frame;

    fn capture(&mut self) -> Result<Self::Frame, CaptureError>;
}

/// Runs fiducial detection on one frame.
///
/// Implementations are bound to one dictionary at construction time.
pub trait MarkerDetector<F: ?Sized> {
    fn detect(&mut self, frame: &F) -> Result<Detections, DetectError>;
}

/// Result of showing a frame in a debug view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewAction {
    Continue,
    /// End the cycle without publishing.
    Abort,
}

/// Optional on-screen view of each cycle.
pub trait DebugView<F: ?Sized> {
    fn show(&mut self, frame: &mut F, detections: &Detections) -> Result<ViewAction, DisplayError>;
}

/// View that shows nothing and never aborts.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDebugView;

impl<F: ?Sized> DebugView<F> for NoDebugView {
    fn show(
        &mut self,
        _frame: &mut F,
        _detections: &Detections,
    ) -> Result<ViewAction, DisplayError> {
        Ok(ViewAction::Continue)
    }
}

/// `None` behaves like [`NoDebugView`].
impl<F: ?Sized, V: DebugView<F>> DebugView<F> for Option<V> {
    fn show(&mut self, frame: &mut F, detections: &Detections) -> Result<ViewAction, DisplayError> {
        match self {
            Some(view) => view.show(frame, detections),
            None => Ok(ViewAction::Continue),
        }
    }
}

/// Motion-control channel.
pub trait CommandSink {
    fn publish(&mut self, command: &VelocityCommand) -> Result<(), SinkError>;
}

impl<S: CommandSink + ?Sized> CommandSink for &mut S {
    fn publish(&mut self, command: &VelocityCommand) -> Result<(), SinkError> {
        (**self).publish(command)
    }
}

impl<S: CommandSink + ?Sized> CommandSink for Box<S> {
    fn publish(&mut self, command: &VelocityCommand) -> Result<(), SinkError> {
        (**self).publish(command)
    }
}

/// Collects every published command.
impl CommandSink for Vec<VelocityCommand> {
    fn publish(&mut self, command: &VelocityCommand) -> Result<(), SinkError> {
        self.push(*command);
        Ok(())
    }
}

/// Source of the position-update events that trigger cycles.
pub trait EventSource {
    /// Block until the next event; `Ok(None)` once the source is closed.
    fn next_event(&mut self) -> Result<Option<PoseEvent>, TransportError>;
}

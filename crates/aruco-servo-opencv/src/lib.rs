//! OpenCV backends for `aruco-servo-core`.
//!
//! - [`CameraFrameSource`]: `VideoCapture` device or video file, resized frames.
//! - [`ArucoMarkerDetector`]: `objdetect::ArucoDetector` on a predefined dictionary.
//! - [`HighGuiView`]: annotated debug window with an abort key.
//! - [`generate`]: printable marker images.
//!
//! Building this crate requires a system OpenCV (4.7 or newer, for the
//! `objdetect` ArUco API) discoverable by the `opencv` crate.

mod capture;
mod detect;
mod display;
pub mod generate;

pub use capture::CameraFrameSource;
pub use detect::{predefined_dictionary, ArucoMarkerDetector};
pub use display::{annotate, is_abort_key, HighGuiView};
pub use generate::{marker_file_name, render_marker, write_marker, GenerateError};

/// Errors raised while opening OpenCV resources.
#[derive(thiserror::Error, Debug)]
pub enum OpenCvSetupError {
    #[error("could not open camera ({0})")]
    CameraNotOpened(String),
    #[error(transparent)]
    Config(#[from] aruco_servo_core::ConfigError),
    #[error(transparent)]
    Cv(#[from] opencv::Error),
}

pub(crate) fn backend(e: opencv::Error) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(e)
}

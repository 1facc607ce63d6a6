use crate::{backend, OpenCvSetupError};
use aruco_servo_core::{CameraSource, CaptureError, FrameSource, ServoConfig};
use log::info;
use opencv::core::{Mat, Size};
use opencv::prelude::*;
use opencv::{imgproc, videoio};

/// Continuously open capture device producing BGR frames at a fixed size.
///
/// The device is opened once in [`CameraFrameSource::open`] and held until
/// the source is dropped.
pub struct CameraFrameSource {
    capture: videoio::VideoCapture,
    size: Size,
    raw: Mat,
}

impl CameraFrameSource {
    /// Validate `cfg`, then open the device or file named by `cfg.camera`.
    pub fn open(cfg: &ServoConfig) -> Result<Self, OpenCvSetupError> {
        cfg.validate()?;
        let (capture, label) = match &cfg.camera {
            CameraSource::Device(index) => (
                videoio::VideoCapture::new(*index, videoio::CAP_ANY)?,
                format!("device {index}"),
            ),
            CameraSource::File(path) => (
                videoio::VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)?,
                format!("file {}", path.display()),
            ),
        };
        if !capture.is_opened()? {
            return Err(OpenCvSetupError::CameraNotOpened(label));
        }
        info!(
            "camera {label} opened, frames resized to {}x{}",
            cfg.frame_width, cfg.frame_height
        );

        Ok(Self {
            capture,
            // validate() keeps both sides within i32.
            size: Size::new(cfg.frame_width as i32, cfg.frame_height as i32),
            raw: Mat::default(),
        })
    }

    #[inline]
    pub fn frame_size(&self) -> Size {
        self.size
    }
}

impl FrameSource for CameraFrameSource {
    type Frame = Mat;

    fn capture(&mut self) -> Result<Mat, CaptureError> {
        let grabbed = self
            .capture
            .read(&mut self.raw)
            .map_err(|e| CaptureError::Backend(backend(e)))?;
        if !grabbed || self.raw.empty() {
            return Err(CaptureError::NoFrame);
        }

        let mut resized = Mat::default();
        imgproc::resize(
            &self.raw,
            &mut resized,
            self.size,
            0.0,
            0.0,
            imgproc::INTER_LINEAR,
        )
        .map_err(|e| CaptureError::Backend(backend(e)))?;
        Ok(resized)
    }
}

//! HighGUI debug window.

use crate::{backend, OpenCvSetupError};
use aruco_servo_core::{
    marker_centroid, DebugView, Detections, DisplayConfig, DisplayError, ViewAction,
};
use log::debug;
use opencv::core::{Mat, Point, Scalar};
use opencv::{highgui, imgproc};

const OUTLINE_THICKNESS: i32 = 2;
const CENTROID_RADIUS: i32 = 4;
const LABEL_SCALE: f64 = 0.5;
const LABEL_OFFSET_PX: i32 = 10;

fn green() -> Scalar {
    Scalar::new(0.0, 255.0, 0.0, 0.0)
}

fn red() -> Scalar {
    Scalar::new(0.0, 0.0, 255.0, 0.0)
}

/// Draw every detection onto `frame`: green outline, red centroid dot and
/// the marker id above the top-left corner.
pub fn annotate(frame: &mut Mat, detections: &Detections) -> Result<(), opencv::Error> {
    for marker in &detections.markers {
        let pts = marker.corners.map(|p| Point::new(p.x as i32, p.y as i32));
        for k in 0..4 {
            imgproc::line(
                frame,
                pts[k],
                pts[(k + 1) % 4],
                green(),
                OUTLINE_THICKNESS,
                imgproc::LINE_8,
                0,
            )?;
        }

        let c = marker_centroid(marker);
        imgproc::circle(
            frame,
            Point::new(c.x, c.y),
            CENTROID_RADIUS,
            red(),
            -1,
            imgproc::LINE_8,
            0,
        )?;

        imgproc::put_text(
            frame,
            &marker.id.to_string(),
            Point::new(pts[0].x, pts[0].y - LABEL_OFFSET_PX),
            imgproc::FONT_HERSHEY_SIMPLEX,
            LABEL_SCALE,
            green(),
            OUTLINE_THICKNESS,
            imgproc::LINE_8,
            false,
        )?;
    }
    Ok(())
}

/// Whether a `wait_key` result is the abort key.
pub fn is_abort_key(key: i32, abort_key: char) -> bool {
    key >= 0 && u32::try_from(key & 0xFF).ok().and_then(char::from_u32) == Some(abort_key)
}

/// Window that shows each annotated frame and polls the keyboard.
pub struct HighGuiView {
    window: String,
    abort_key: char,
    wait_ms: i32,
}

impl HighGuiView {
    pub fn new(cfg: &DisplayConfig) -> Result<Self, OpenCvSetupError> {
        highgui::named_window(&cfg.window_name, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            window: cfg.window_name.clone(),
            abort_key: cfg.abort_key,
            wait_ms: cfg.wait_ms.max(1),
        })
    }
}

impl DebugView<Mat> for HighGuiView {
    fn show(
        &mut self,
        frame: &mut Mat,
        detections: &Detections,
    ) -> Result<ViewAction, DisplayError> {
        let key = annotate(frame, detections)
            .and_then(|()| highgui::imshow(&self.window, &*frame))
            .and_then(|()| highgui::wait_key(self.wait_ms))
            .map_err(|e| DisplayError::Backend(backend(e)))?;
        if is_abort_key(key, self.abort_key) {
            debug!("abort key `{}` pressed", self.abort_key);
            return Ok(ViewAction::Abort);
        }
        Ok(ViewAction::Continue)
    }
}

impl Drop for HighGuiView {
    fn drop(&mut self) {
        let _ = highgui::destroy_window(&self.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aruco_servo_core::MarkerDetection;
    use nalgebra::Point2;
    use opencv::core::{Vec3b, CV_8UC3};
    use opencv::prelude::*;

    #[test]
    fn abort_key_matching_masks_modifiers() {
        assert!(is_abort_key('q' as i32, 'q'));
        assert!(is_abort_key(0x100 | 'q' as i32, 'q'));
        assert!(!is_abort_key('w' as i32, 'q'));
        assert!(!is_abort_key(-1, 'q'));
    }

    #[test]
    fn annotate_marks_the_centroid_red() {
        let mut frame =
            Mat::new_rows_cols_with_default(600, 800, CV_8UC3, Scalar::all(0.0)).unwrap();
        let detections = Detections::new(vec![MarkerDetection {
            id: 1,
            corners: [
                Point2::new(100.0, 100.0),
                Point2::new(200.0, 100.0),
                Point2::new(200.0, 200.0),
                Point2::new(100.0, 200.0),
            ],
        }]);
        annotate(&mut frame, &detections).unwrap();

        let center = frame.at_2d::<Vec3b>(150, 150).unwrap();
        assert_eq!(center.0, [0, 0, 255]);
        let edge = frame.at_2d::<Vec3b>(100, 150).unwrap();
        assert_eq!(edge.0, [0, 255, 0]);
    }
}

use crate::{backend, OpenCvSetupError};
use aruco_servo_core::{
    DetectError, Detections, MarkerDetection, MarkerDetector, MarkerDictionary,
};
use log::debug;
use nalgebra::Point2;
use opencv::core::{Mat, Point2f, Vector};
use opencv::objdetect;
use opencv::prelude::*;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Load an OpenCV predefined dictionary.
pub fn predefined_dictionary(
    dictionary: MarkerDictionary,
) -> Result<objdetect::Dictionary, opencv::Error> {
    objdetect::get_predefined_dictionary_i32(dictionary.info().predefined_index)
}

/// ArUco detector bound to one dictionary with default detector parameters.
pub struct ArucoMarkerDetector {
    dictionary: MarkerDictionary,
    detector: objdetect::ArucoDetector,
    corners: Vector<Vector<Point2f>>,
    ids: Vector<i32>,
    rejected: Vector<Vector<Point2f>>,
}

impl ArucoMarkerDetector {
    pub fn new(dictionary: MarkerDictionary) -> Result<Self, OpenCvSetupError> {
        let dict = predefined_dictionary(dictionary)?;
        let params = objdetect::DetectorParameters::default()?;
        let refine = objdetect::RefineParameters::new(10.0, 3.0, true)?;
        let detector = objdetect::ArucoDetector::new(&dict, &params, refine)?;
        debug!("ArUco detector ready for {dictionary}");
        Ok(Self {
            dictionary,
            detector,
            corners: Vector::new(),
            ids: Vector::new(),
            rejected: Vector::new(),
        })
    }

    #[inline]
    pub fn dictionary(&self) -> MarkerDictionary {
        self.dictionary
    }

    fn collect(&self) -> Result<Vec<MarkerDetection>, opencv::Error> {
        let mut out = Vec::with_capacity(self.ids.len());
        for (quad, id) in self.corners.iter().zip(self.ids.iter()) {
            if quad.len() != 4 {
                continue;
            }
            let mut corners = [Point2::new(0.0f32, 0.0f32); 4];
            for (k, slot) in corners.iter_mut().enumerate() {
                let p = quad.get(k)?;
                *slot = Point2::new(p.x, p.y);
            }
            out.push(MarkerDetection { id, corners });
        }
        Ok(out)
    }
}

impl MarkerDetector<Mat> for ArucoMarkerDetector {
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    fn detect(&mut self, frame: &Mat) -> Result<Detections, DetectError> {
        self.corners.clear();
        self.ids.clear();
        self.rejected.clear();
        self.detector
            .detect_markers(frame, &mut self.corners, &mut self.ids, &mut self.rejected)
            .map_err(|e| DetectError::Backend(backend(e)))?;

        let markers = self
            .collect()
            .map_err(|e| DetectError::Backend(backend(e)))?;
        Ok(Detections {
            markers,
            rejected: self.rejected.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::render_marker;
    use opencv::core::{self, Scalar, CV_8UC1};

    /// 800x600 white scene with a 120 px marker whose top-left is at `(x, y)`.
    fn marker_scene(dictionary: MarkerDictionary, id: i32, x: i32, y: i32) -> Mat {
        let marker = render_marker(dictionary, id, 120).expect("render");
        let mut scene = Mat::default();
        core::copy_make_border(
            &marker,
            &mut scene,
            y,
            600 - 120 - y,
            x,
            800 - 120 - x,
            core::BORDER_CONSTANT,
            Scalar::all(255.0),
        )
        .expect("pad");
        scene
    }

    #[test]
    fn detects_a_generated_marker() {
        let scene = marker_scene(MarkerDictionary::Dict5x5_100, 1, 340, 400);
        let mut detector = ArucoMarkerDetector::new(MarkerDictionary::Dict5x5_100).unwrap();
        let detections = detector.detect(&scene).expect("detect");

        assert_eq!(detections.markers.len(), 1);
        let m = &detections.markers[0];
        assert_eq!(m.id, 1);
        let tl = m.top_left();
        let br = m.bottom_right();
        assert!(tl.x < br.x && tl.y < br.y, "corners must be TL..BR ordered");
        assert!((tl.y - 400.0).abs() < 3.0);
        assert!((br.y - 520.0).abs() < 3.0);
    }

    #[test]
    fn blank_frame_has_no_markers() {
        let scene =
            Mat::new_rows_cols_with_default(600, 800, CV_8UC1, Scalar::all(255.0)).unwrap();
        let mut detector = ArucoMarkerDetector::new(MarkerDictionary::Dict4x4_50).unwrap();
        assert!(detector.detect(&scene).unwrap().is_empty());
    }
}

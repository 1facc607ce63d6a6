//! Marker selection and centroid computation.

use crate::{Centroid, MarkerDetection};

/// Centroid of one marker: midpoint of its top-left and bottom-right corners.
///
/// Corners are truncated to whole pixels before averaging and the midpoint is
/// truncated again, so the result matches the annotated debug frame.
pub fn marker_centroid(marker: &MarkerDetection) -> Centroid {
    let tl = marker.top_left().map(|v| v as i32);
    let br = marker.bottom_right().map(|v| v as i32);
    let cx = (f64::from(tl.x) + f64::from(br.x)) / 2.0;
    let cy = (f64::from(tl.y) + f64::from(br.y)) / 2.0;
    Centroid::new(cx as i32, cy as i32)
}

/// First-match marker locator.
///
/// Only the first detection (detector order, not sorted by id or position)
/// is used. Simultaneously visible markers are not disambiguated.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkerLocator;

impl MarkerLocator {
    /// Centroid of the first detection, or [`Centroid::ABSENT`] if there is none.
    pub fn locate(&self, markers: &[MarkerDetection]) -> Centroid {
        markers
            .first()
            .map(marker_centroid)
            .unwrap_or(Centroid::ABSENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn square(id: i32, x0: f32, y0: f32, side: f32) -> MarkerDetection {
        MarkerDetection {
            id,
            corners: [
                Point2::new(x0, y0),
                Point2::new(x0 + side, y0),
                Point2::new(x0 + side, y0 + side),
                Point2::new(x0, y0 + side),
            ],
        }
    }

    #[test]
    fn empty_detections_give_the_sentinel() {
        assert_eq!(MarkerLocator.locate(&[]), Centroid::new(-1, -1));
    }

    #[test]
    fn centroid_is_tl_br_midpoint() {
        let m = square(1, 100.0, 200.0, 50.0);
        assert_eq!(MarkerLocator.locate(&[m]), Centroid::new(125, 225));
    }

    #[test]
    fn centroid_truncates_fractions() {
        let m = square(1, 10.0, 20.0, 5.0);
        // (10 + 15) / 2 = 12.5, (20 + 25) / 2 = 22.5
        assert_eq!(marker_centroid(&m), Centroid::new(12, 22));
    }

    #[test]
    fn corners_are_truncated_before_averaging() {
        let mut m = square(1, 10.9, 10.9, 11.0);
        // 10.9 -> 10 and 21.9 -> 21, (10 + 21) / 2 = 15.5 -> 15
        assert_eq!(marker_centroid(&m), Centroid::new(15, 15));
        m.corners[0] = Point2::new(-0.5, -0.5);
        m.corners[2] = Point2::new(0.5, 0.5);
        assert_eq!(marker_centroid(&m), Centroid::new(0, 0));
    }

    #[test]
    fn centroid_ignores_tr_and_bl_corners() {
        let mut m = square(3, 0.0, 0.0, 10.0);
        m.corners[1] = Point2::new(500.0, -40.0);
        m.corners[3] = Point2::new(-70.0, 900.0);
        assert_eq!(marker_centroid(&m), Centroid::new(5, 5));
    }

    #[test]
    fn first_detection_wins_regardless_of_id() {
        let first = square(42, 0.0, 0.0, 10.0);
        let second = square(1, 400.0, 400.0, 10.0);
        assert_eq!(MarkerLocator.locate(&[first, second]), Centroid::new(5, 5));
    }
}

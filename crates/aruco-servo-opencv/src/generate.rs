//! Printable marker images.

use aruco_servo_core::MarkerDictionary;
use log::info;
use opencv::core::{Mat, Vector};
use opencv::{highgui, imgcodecs, objdetect};
use std::path::{Path, PathBuf};

use crate::detect::predefined_dictionary;

pub const DEFAULT_MARKER_ID: i32 = 1;
pub const DEFAULT_MARKER_SIDE_PX: i32 = 250;

const MARKER_BORDER_BITS: i32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum GenerateError {
    #[error("marker id {id} is outside {dictionary} (0..{capacity})")]
    IdOutOfRange {
        dictionary: MarkerDictionary,
        id: i32,
        capacity: u32,
    },
    #[error("marker side must be positive (got {0} px)")]
    InvalidSide(i32),
    #[error("failed to write {}", .0.display())]
    Write(PathBuf),
    #[error(transparent)]
    Cv(#[from] opencv::Error),
}

/// Render marker `id` of `dictionary` as a single-channel image of
/// `side_px` x `side_px` pixels.
pub fn render_marker(
    dictionary: MarkerDictionary,
    id: i32,
    side_px: i32,
) -> Result<Mat, GenerateError> {
    if !dictionary.contains_id(id) {
        return Err(GenerateError::IdOutOfRange {
            dictionary,
            id,
            capacity: dictionary.info().capacity,
        });
    }
    if side_px <= 0 {
        return Err(GenerateError::InvalidSide(side_px));
    }

    let dict = predefined_dictionary(dictionary)?;
    let mut img = Mat::default();
    objdetect::generate_image_marker(&dict, id, side_px, &mut img, MARKER_BORDER_BITS)?;
    Ok(img)
}

/// `Marker_<dictionary>_<id>.png`
pub fn marker_file_name(dictionary: MarkerDictionary, id: i32) -> String {
    format!("Marker_{}_{id}.png", dictionary.name())
}

/// Render a marker and save it as PNG inside `dir`.
pub fn write_marker(
    dir: &Path,
    dictionary: MarkerDictionary,
    id: i32,
    side_px: i32,
) -> Result<PathBuf, GenerateError> {
    let img = render_marker(dictionary, id, side_px)?;
    let path = dir.join(marker_file_name(dictionary, id));
    if !imgcodecs::imwrite(&path.to_string_lossy(), &img, &Vector::new())? {
        return Err(GenerateError::Write(path));
    }
    info!("wrote {} ({side_px} px)", path.display());
    Ok(path)
}

/// Show a rendered marker in its own window until any key is pressed.
pub fn show_marker(title: &str, img: &Mat) -> Result<(), GenerateError> {
    highgui::imshow(title, img)?;
    highgui::wait_key(0)?;
    highgui::destroy_window(title)?;
    Ok(())
}

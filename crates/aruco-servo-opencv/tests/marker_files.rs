use aruco_servo_core::MarkerDictionary;
use aruco_servo_opencv::{write_marker, GenerateError};
use opencv::imgcodecs;
use opencv::prelude::*;

#[test]
fn written_marker_reads_back_at_full_size() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_marker(dir.path(), MarkerDictionary::Dict6x6_250, 3, 200).expect("write");

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("Marker_DICT_6X6_250_3.png")
    );
    let img = imgcodecs::imread(&path.to_string_lossy(), imgcodecs::IMREAD_GRAYSCALE).unwrap();
    assert_eq!((img.rows(), img.cols()), (200, 200));
}

#[test]
fn invalid_id_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = write_marker(dir.path(), MarkerDictionary::Dict4x4_50, 99, 200).unwrap_err();
    assert!(matches!(err, GenerateError::IdOutOfRange { .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

use std::path::PathBuf;

use checkerboard_calibration::calibration::CalibrationResult;
use checkerboard_calibration::error::CalibError;
use checkerboard_calibration::io::{load_calibration, save_calibration};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("calib_io_{}_{}", std::process::id(), name))
}

fn sample_result() -> CalibrationResult {
    CalibrationResult {
        camera_matrix: [
            [601.234567891011, 0.0, 319.5],
            [0.0, 598.7654321, 239.5],
            [0.0, 0.0, 1.0],
        ],
        dist_coefs: vec![-0.1023, 0.0211, 0.0003, -0.0001, 0.0045],
        image_width: 640,
        image_height: 480,
        rms_error: 0.2345678901234567,
    }
}

#[test]
fn test_save_load_round_trip_is_exact() {
    let path = temp_path("round_trip.json");
    let original = sample_result();
    save_calibration(&path, &original).unwrap();
    let loaded = load_calibration(&path).unwrap();
    // JSON persistence must not lose precision on any f64 field.
    assert_eq!(loaded, original);
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_save_overwrites_existing_file() {
    let path = temp_path("overwrite.json");
    let mut first = sample_result();
    save_calibration(&path, &first).unwrap();
    first.rms_error = 9.99;
    save_calibration(&path, &first).unwrap();
    let loaded = load_calibration(&path).unwrap();
    assert_eq!(loaded.rms_error, 9.99);
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_missing_file_is_io_error() {
    let path = temp_path("does_not_exist.json");
    match load_calibration(&path) {
        Err(CalibError::Io(_)) => {}
        other => panic!("expected io error, got {:?}", other.map(|r| r.rms_error)),
    }
}

#[test]
fn test_corrupt_file_is_json_error() {
    let path = temp_path("corrupt.json");
    std::fs::write(&path, "{ \"camera_matrix\": [1, 2").unwrap();
    match load_calibration(&path) {
        Err(CalibError::Json(_)) => {}
        other => panic!("expected json error, got {:?}", other.map(|r| r.rms_error)),
    }
    std::fs::remove_file(&path).ok();
}

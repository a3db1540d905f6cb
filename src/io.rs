//! Persistence of the calibration result.
//!
//! A single JSON document with the named arrays `camera_matrix` (3x3) and
//! `dist_coefs` (1x5). Saving overwrites any prior file at the same path;
//! the inspector refuses to invent defaults when the file is missing or
//! corrupt.

use std::io::Write;
use std::path::Path;

use crate::calibration::CalibrationResult;
use crate::error::CalibError;

pub const DEFAULT_PARAMS_FILE: &str = "camera_params.json";

pub fn save_calibration(path: &Path, result: &CalibrationResult) -> Result<(), CalibError> {
    let json = serde_json::to_string_pretty(result)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_calibration(path: &Path) -> Result<CalibrationResult, CalibError> {
    let contents = std::fs::read_to_string(path)?;
    let result = serde_json::from_str(&contents)?;
    Ok(result)
}

use std::path::PathBuf;

/// Whole-run failure conditions.
///
/// Per-image problems (unreadable file, pattern not found, wrong corner
/// count) are logged and skipped inside the collection loop and never show
/// up here.
#[derive(Debug, thiserror::Error)]
pub enum CalibError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("glob pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error(
        "frame size mismatch: calibration frame is {expected_w}x{expected_h} \
         but {path} is {got_w}x{got_h}"
    )]
    FrameSizeMismatch {
        expected_w: u32,
        expected_h: u32,
        got_w: u32,
        got_h: u32,
        path: PathBuf,
    },

    #[error("calibration solver failed: {0}")]
    Solver(String),
}

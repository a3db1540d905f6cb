use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::board::BoardConfig;

/// Everything the collector needs besides the input/output folders, with
/// documented defaults. Loadable from JSON so a run is reproducible without
/// a long flag list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    pub board: BoardConfig,

    /// Recognized raster-image extensions, matched case-insensitively.
    pub extensions: Vec<String>,

    /// Half size of the sub-pixel search window; 5 means an 11x11 window.
    pub subpix_half_window: u32,

    /// Sub-pixel refinement stops after this many iterations...
    pub subpix_max_iters: u32,

    /// ...or once a corner moves less than this many pixels.
    pub subpix_eps: f32,

    /// Where the calibration result lands. Overwritten on every run.
    pub params_file: PathBuf,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            extensions: vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()],
            subpix_half_window: 5,
            subpix_max_iters: 30,
            subpix_eps: 0.001,
            params_file: PathBuf::from("camera_params.json"),
        }
    }
}

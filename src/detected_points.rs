use std::path::PathBuf;

use glam::Vec2;

/// One image's accepted corner detection.
///
/// `corners` is raster ordered and always has exactly
/// `board.corner_count()` entries; the collection loop rejects anything
/// else before constructing this.
#[derive(Debug, Clone)]
pub struct FrameObservation {
    pub path: PathBuf,
    pub corners: Vec<Vec2>,
    pub img_w_h: (u32, u32),
    /// Name of the detector tier that produced the corners.
    pub detector: &'static str,
}

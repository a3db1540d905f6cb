//! Checkerboard corner detection.
//!
//! Detection is a capability behind the [`CornerDetector`] trait so the
//! two-tier fallback policy stays testable without touching file I/O. The
//! collector tries a [`DetectorStack`] in fixed priority order: the fast
//! detector first, the robust one only when the fast one comes up empty.

pub mod candidates;
pub mod grid;
pub mod response;

use glam::Vec2;
use image::GrayImage;
use serde::{Deserialize, Serialize};

use candidates::extract_candidates;
use grid::order_into_grid;
use response::{chess_response, equalize_hist, stretch_contrast};

/// Internal corner grid dimensions the detectors look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSize {
    pub cols: usize,
    pub rows: usize,
}

impl PatternSize {
    pub fn corner_count(&self) -> usize {
        self.cols * self.rows
    }
}

/// A corner detection strategy.
///
/// On success the returned corners are raster ordered and hold exactly
/// `pattern.corner_count()` entries; anything the detector cannot order
/// into a full grid is a failure, not a partial result.
pub trait CornerDetector: Send + Sync {
    fn name(&self) -> &'static str;
    fn detect(&self, gray: &GrayImage, pattern: PatternSize) -> Option<Vec<Vec2>>;
}

/// Shared tuning knobs for the ring-response detectors.
#[derive(Debug, Clone, Copy)]
pub struct DetectParams {
    /// Candidate threshold as a fraction of the max response.
    pub threshold_rel: f32,
    /// Non-maximum suppression radius in pixels.
    pub nms_radius: u32,
}

/// Fast single-scale detector: contrast-normalized input, radius-5 ring,
/// strict threshold. Cheap, but brittle under uneven lighting.
pub struct FastRingDetector {
    pub params: DetectParams,
}

impl Default for FastRingDetector {
    fn default() -> Self {
        Self {
            params: DetectParams {
                threshold_rel: 0.35,
                nms_radius: 5,
            },
        }
    }
}

impl CornerDetector for FastRingDetector {
    fn name(&self) -> &'static str {
        "fast-ring"
    }

    fn detect(&self, gray: &GrayImage, pattern: PatternSize) -> Option<Vec<Vec2>> {
        let normalized = stretch_contrast(gray);
        let resp = chess_response(&normalized, 5);
        let cands = extract_candidates(&resp, self.params.threshold_rel, self.params.nms_radius);
        order_into_grid(&cands, pattern)
    }
}

/// Robust detector: histogram-equalized input and responses accumulated
/// over two ring radii with a relaxed threshold. Slower, tolerant of blur
/// and lighting gradients.
pub struct RobustRingDetector {
    pub params: DetectParams,
}

impl Default for RobustRingDetector {
    fn default() -> Self {
        Self {
            params: DetectParams {
                threshold_rel: 0.25,
                nms_radius: 5,
            },
        }
    }
}

impl CornerDetector for RobustRingDetector {
    fn name(&self) -> &'static str {
        "robust-ring"
    }

    fn detect(&self, gray: &GrayImage, pattern: PatternSize) -> Option<Vec<Vec2>> {
        let equalized = equalize_hist(gray);
        let mut resp = chess_response(&equalized, 5);
        let coarse = chess_response(&equalized, 10);
        for (a, b) in resp.data.iter_mut().zip(coarse.data.iter()) {
            *a += *b;
        }
        let cands = extract_candidates(&resp, self.params.threshold_rel, self.params.nms_radius);
        order_into_grid(&cands, pattern)
    }
}

/// Ordered detector tiers; the first success wins.
pub struct DetectorStack {
    detectors: Vec<Box<dyn CornerDetector>>,
}

impl DetectorStack {
    pub fn new(detectors: Vec<Box<dyn CornerDetector>>) -> Self {
        Self { detectors }
    }

    /// The stock two-tier stack: fast first, robust as fallback.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(FastRingDetector::default()),
            Box::new(RobustRingDetector::default()),
        ])
    }

    /// Try each tier in order; returns the corners plus the name of the
    /// tier that produced them.
    pub fn detect(&self, gray: &GrayImage, pattern: PatternSize) -> Option<(Vec<Vec2>, &'static str)> {
        for det in &self.detectors {
            if let Some(corners) = det.detect(gray, pattern) {
                return Some((corners, det.name()));
            }
        }
        None
    }
}

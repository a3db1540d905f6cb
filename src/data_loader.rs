//! Folder walking, per-image detection and annotated-image output.

use std::path::{Path, PathBuf};

use glob::glob;
use image::ImageReader;
use indicatif::ParallelProgressIterator;
use log::{info, warn};
use rayon::prelude::*;

use crate::config::CollectorConfig;
use crate::detected_points::FrameObservation;
use crate::detection::{DetectorStack, PatternSize};
use crate::error::CalibError;
use crate::refine::{self, TermCriteria};
use crate::visualization::save_annotated;

/// What one pass over the input folder produced.
pub struct CollectionOutcome {
    pub observations: Vec<FrameObservation>,
    /// Images enumerated, including ones that failed to decode or detect.
    pub images_seen: usize,
    /// Validated shared pixel size of all accepted images.
    pub frame_size: Option<(u32, u32)>,
}

/// Enumerate raster images in `dir` by extension (case-insensitive).
/// Filesystem order, no sorting; accumulation order is irrelevant to the
/// solver.
pub fn list_images(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, CalibError> {
    let pattern = format!("{}/*", dir.display());
    let paths = glob(&pattern)?
        .filter_map(|rp| rp.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| {
                    let e = e.to_ascii_lowercase();
                    extensions.iter().any(|want| want.eq_ignore_ascii_case(&e))
                })
                .unwrap_or(false)
        })
        .collect();
    Ok(paths)
}

/// Walk the input folder, run the detector stack on every image, refine
/// and accept full-grid detections, and drop an annotated copy of every
/// accepted image into `annotated_dir`.
///
/// Per-image failures (unreadable file, no pattern, wrong corner count)
/// are logged and skipped. The only hard error here is a frame-size
/// disagreement between accepted images.
pub fn collect_observations(
    images_dir: &Path,
    annotated_dir: &Path,
    config: &CollectorConfig,
    stack: &DetectorStack,
) -> Result<CollectionOutcome, CalibError> {
    std::fs::create_dir_all(annotated_dir)?;
    let paths = list_images(images_dir, &config.extensions)?;
    info!("looking for images in {}", images_dir.display());
    info!("saving annotated images to {}", annotated_dir.display());
    info!("images found: {}", paths.len());

    let pattern = PatternSize {
        cols: config.board.cols,
        rows: config.board.rows,
    };
    let criteria = TermCriteria {
        max_iters: config.subpix_max_iters,
        eps: config.subpix_eps,
    };

    let observations: Vec<FrameObservation> = paths
        .par_iter()
        .progress_count(paths.len() as u64)
        .filter_map(|path| {
            process_image(path, annotated_dir, config, stack, pattern, criteria)
        })
        .collect();

    let frame_size = validate_frame_size(&observations)?;

    Ok(CollectionOutcome {
        images_seen: paths.len(),
        observations,
        frame_size,
    })
}

fn process_image(
    path: &Path,
    annotated_dir: &Path,
    config: &CollectorConfig,
    stack: &DetectorStack,
    pattern: PatternSize,
    criteria: TermCriteria,
) -> Option<FrameObservation> {
    let img = match ImageReader::open(path).map_err(CalibError::from).and_then(|r| {
        r.decode().map_err(CalibError::from)
    }) {
        Ok(img) => img,
        Err(e) => {
            warn!("could not read {}: {}", path.display(), e);
            return None;
        }
    };
    let gray = img.to_luma8();

    let Some((corners, detector)) = stack.detect(&gray, pattern) else {
        info!("✘ no corners in {}", file_name(path));
        return None;
    };
    // Detectors promise a full grid; re-check before the observation can
    // enter the accumulation set.
    if corners.len() != pattern.corner_count() {
        warn!(
            "✘ {} returned {} corners for {} (expected {}), rejected",
            detector,
            corners.len(),
            file_name(path),
            pattern.corner_count()
        );
        return None;
    }

    let corners = refine::refine_subpixel(&gray, &corners, config.subpix_half_window, criteria);

    let out_path = annotated_dir.join(path.file_name()?);
    if let Err(e) = save_annotated(&img, &corners, &out_path) {
        warn!("could not save annotated image {}: {}", out_path.display(), e);
    }
    info!("✔ corners found in {} ({})", file_name(path), detector);

    Some(FrameObservation {
        path: path.to_path_buf(),
        corners,
        img_w_h: (gray.width(), gray.height()),
        detector,
    })
}

/// All accepted images must share one pixel size; the first accepted image
/// defines it and any disagreement fails loudly instead of trusting
/// whichever image happened to be processed last.
fn validate_frame_size(
    observations: &[FrameObservation],
) -> Result<Option<(u32, u32)>, CalibError> {
    let mut frame_size: Option<(u32, u32)> = None;
    for obs in observations {
        match frame_size {
            None => frame_size = Some(obs.img_w_h),
            Some(expected) if expected != obs.img_w_h => {
                return Err(CalibError::FrameSizeMismatch {
                    expected_w: expected.0,
                    expected_h: expected.1,
                    got_w: obs.img_w_h.0,
                    got_h: obs.img_w_h.1,
                    path: obs.path.clone(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(frame_size)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

use std::sync::atomic::{AtomicUsize, Ordering};

use checkerboard_calibration::detection::{CornerDetector, DetectorStack, PatternSize};
use glam::Vec2;
use image::GrayImage;

/// Scripted detector tier that counts how often it runs.
struct SpyDetector {
    name: &'static str,
    succeed: bool,
    calls: &'static AtomicUsize,
}

impl CornerDetector for SpyDetector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn detect(&self, _gray: &GrayImage, pattern: PatternSize) -> Option<Vec<Vec2>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.succeed {
            Some(vec![Vec2::ZERO; pattern.corner_count()])
        } else {
            None
        }
    }
}

const PATTERN: PatternSize = PatternSize { cols: 3, rows: 2 };

#[test]
fn test_fallback_runs_after_primary_failure() {
    static PRIMARY: AtomicUsize = AtomicUsize::new(0);
    static FALLBACK: AtomicUsize = AtomicUsize::new(0);

    let stack = DetectorStack::new(vec![
        Box::new(SpyDetector {
            name: "primary",
            succeed: false,
            calls: &PRIMARY,
        }),
        Box::new(SpyDetector {
            name: "fallback",
            succeed: true,
            calls: &FALLBACK,
        }),
    ]);

    let gray = GrayImage::new(32, 32);
    let (corners, detector) = stack.detect(&gray, PATTERN).expect("fallback should succeed");
    assert_eq!(detector, "fallback");
    assert_eq!(corners.len(), PATTERN.corner_count());
    assert_eq!(PRIMARY.load(Ordering::SeqCst), 1);
    assert_eq!(FALLBACK.load(Ordering::SeqCst), 1);
}

#[test]
fn test_primary_success_short_circuits() {
    static PRIMARY: AtomicUsize = AtomicUsize::new(0);
    static FALLBACK: AtomicUsize = AtomicUsize::new(0);

    let stack = DetectorStack::new(vec![
        Box::new(SpyDetector {
            name: "primary",
            succeed: true,
            calls: &PRIMARY,
        }),
        Box::new(SpyDetector {
            name: "fallback",
            succeed: true,
            calls: &FALLBACK,
        }),
    ]);

    let gray = GrayImage::new(32, 32);
    let (_, detector) = stack.detect(&gray, PATTERN).expect("primary should succeed");
    assert_eq!(detector, "primary");
    assert_eq!(PRIMARY.load(Ordering::SeqCst), 1);
    assert_eq!(FALLBACK.load(Ordering::SeqCst), 0);
}

#[test]
fn test_all_tiers_failing_yields_none() {
    static PRIMARY: AtomicUsize = AtomicUsize::new(0);
    static FALLBACK: AtomicUsize = AtomicUsize::new(0);

    let stack = DetectorStack::new(vec![
        Box::new(SpyDetector {
            name: "primary",
            succeed: false,
            calls: &PRIMARY,
        }),
        Box::new(SpyDetector {
            name: "fallback",
            succeed: false,
            calls: &FALLBACK,
        }),
    ]);

    let gray = GrayImage::new(32, 32);
    assert!(stack.detect(&gray, PATTERN).is_none());
    assert_eq!(PRIMARY.load(Ordering::SeqCst), 1);
    assert_eq!(FALLBACK.load(Ordering::SeqCst), 1);
}

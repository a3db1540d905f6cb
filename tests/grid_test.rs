use checkerboard_calibration::detection::PatternSize;
use checkerboard_calibration::detection::candidates::Candidate;
use checkerboard_calibration::detection::grid::order_into_grid;
use glam::Vec2;

fn make_grid(cols: usize, rows: usize, spacing: f32, angle: f32) -> Vec<Vec2> {
    let (cos_a, sin_a) = (angle.cos(), angle.sin());
    let mut out = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let x = 100.0 + c as f32 * spacing;
            let y = 80.0 + r as f32 * spacing;
            out.push(Vec2::new(
                x * cos_a - y * sin_a,
                x * sin_a + y * cos_a,
            ));
        }
    }
    out
}

fn to_candidates(points: &[Vec2], strength: f32) -> Vec<Candidate> {
    points
        .iter()
        .map(|&pos| Candidate { pos, strength })
        .collect()
}

/// Deterministic shuffle so ordering cannot come from input order.
fn scramble<T: Clone>(items: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    let mut evens: Vec<T> = items.iter().step_by(2).cloned().collect();
    let odds: Vec<T> = items.iter().skip(1).step_by(2).cloned().collect();
    evens.reverse();
    out.extend(odds);
    out.extend(evens);
    out
}

#[test]
fn test_axis_aligned_grid_raster_order() {
    let pattern = PatternSize { cols: 5, rows: 4 };
    let truth = make_grid(5, 4, 30.0, 0.0);
    let cands = to_candidates(&scramble(&truth), 1.0);

    let ordered = order_into_grid(&cands, pattern).expect("grid should assemble");
    assert_eq!(ordered.len(), 20);
    for (got, want) in ordered.iter().zip(truth.iter()) {
        assert!((got.x - want.x).abs() < 1e-3);
        assert!((got.y - want.y).abs() < 1e-3);
    }
}

#[test]
fn test_rotated_grid_raster_order() {
    let pattern = PatternSize { cols: 5, rows: 4 };
    let truth = make_grid(5, 4, 30.0, 0.35);
    let cands = to_candidates(&scramble(&truth), 1.0);

    let ordered = order_into_grid(&cands, pattern).expect("grid should assemble");
    assert_eq!(ordered.len(), 20);
    for (got, want) in ordered.iter().zip(truth.iter()) {
        assert!((got - want).length() < 1e-3);
    }
}

#[test]
fn test_quarter_turn_grid_still_assembles() {
    let pattern = PatternSize { cols: 5, rows: 4 };
    let truth = make_grid(5, 4, 30.0, std::f32::consts::FRAC_PI_2);
    let cands = to_candidates(&truth, 1.0);

    let ordered = order_into_grid(&cands, pattern).expect("grid should assemble");
    assert_eq!(ordered.len(), 20);
}

#[test]
fn test_missing_corner_rejected() {
    let pattern = PatternSize { cols: 5, rows: 4 };
    let mut truth = make_grid(5, 4, 30.0, 0.0);
    truth.pop();
    let cands = to_candidates(&truth, 1.0);
    assert!(order_into_grid(&cands, pattern).is_none());
}

#[test]
fn test_weak_extra_candidate_pruned() {
    let pattern = PatternSize { cols: 5, rows: 4 };
    let truth = make_grid(5, 4, 30.0, 0.0);
    let mut cands = to_candidates(&truth, 1.0);
    // A spurious weak response far off the grid, e.g. a board-edge corner.
    cands.push(Candidate {
        pos: Vec2::new(400.0, 400.0),
        strength: 0.1,
    });

    let ordered = order_into_grid(&cands, pattern).expect("extras should be pruned");
    assert_eq!(ordered.len(), 20);
    for (got, want) in ordered.iter().zip(truth.iter()) {
        assert!((got - want).length() < 1e-3);
    }
}

#[test]
fn test_collinear_points_rejected() {
    let pattern = PatternSize { cols: 3, rows: 3 };
    // Nine points on one line can never split into three separated rows.
    let cands: Vec<Candidate> = (0..9)
        .map(|i| Candidate {
            pos: Vec2::new(50.0 + 20.0 * i as f32, 120.0),
            strength: 1.0,
        })
        .collect();
    assert!(order_into_grid(&cands, pattern).is_none());
}

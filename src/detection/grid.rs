//! Ordering a cloud of corner candidates into a raster grid.
//!
//! The board axes are estimated from nearest-neighbor directions (angles are
//! meaningful modulo 90 degrees, hence the 4-theta averaging), candidates are
//! rotated into an axis-aligned frame, rows are split at the largest gaps of
//! the sorted vertical coordinate, and every row must then hold exactly the
//! expected number of corners.

use glam::Vec2;

use super::PatternSize;
use super::candidates::Candidate;

/// Order candidates into raster layout (row by row, left to right).
///
/// Returns `None` unless the candidates form exactly the expected
/// `cols x rows` grid. When more candidates than expected are present the
/// weakest extras are dropped before assembly.
pub fn order_into_grid(cands: &[Candidate], pattern: PatternSize) -> Option<Vec<Vec2>> {
    let expected = pattern.corner_count();
    if expected == 0 || cands.len() < expected {
        return None;
    }

    let mut working: Vec<Candidate> = cands.to_vec();
    if working.len() > expected {
        working.sort_by(|a, b| b.strength.total_cmp(&a.strength));
        working.truncate(expected);
    }
    let points: Vec<Vec2> = working.iter().map(|c| c.pos).collect();

    let angle = dominant_axis_angle(&points)?;
    assemble(&points, angle, pattern)
        .or_else(|| assemble(&points, angle + std::f32::consts::FRAC_PI_2, pattern))
}

/// Dominant grid direction in (-pi/4, pi/4], from nearest-neighbor
/// displacement angles averaged in 4-theta space (grid axes are undirected
/// and come in orthogonal pairs).
fn dominant_axis_angle(points: &[Vec2]) -> Option<f32> {
    if points.len() < 2 {
        return None;
    }
    let mut sum_cos = 0.0f32;
    let mut sum_sin = 0.0f32;
    for (i, p) in points.iter().enumerate() {
        let mut best_d2 = f32::MAX;
        let mut best_dir = Vec2::ZERO;
        for (j, q) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let d = *q - *p;
            let d2 = d.length_squared();
            if d2 < best_d2 {
                best_d2 = d2;
                best_dir = d;
            }
        }
        let theta = best_dir.y.atan2(best_dir.x);
        sum_cos += (4.0 * theta).cos();
        sum_sin += (4.0 * theta).sin();
    }
    if sum_cos * sum_cos + sum_sin * sum_sin < 1e-12 {
        return None;
    }
    Some(sum_sin.atan2(sum_cos) / 4.0)
}

fn assemble(points: &[Vec2], angle: f32, pattern: PatternSize) -> Option<Vec<Vec2>> {
    let (cos_a, sin_a) = (angle.cos(), angle.sin());
    // Rotate by -angle so grid rows run horizontally.
    let mut rotated: Vec<(f32, f32, Vec2)> = points
        .iter()
        .map(|p| (p.x * cos_a + p.y * sin_a, -p.x * sin_a + p.y * cos_a, *p))
        .collect();
    rotated.sort_by(|a, b| a.1.total_cmp(&b.1));

    let rows = pattern.rows;
    let cols = pattern.cols;

    let mut split_at: Vec<usize> = Vec::new();
    if rows > 1 {
        // Indices of the rows-1 largest vertical gaps.
        let mut gaps: Vec<(f32, usize)> = rotated
            .windows(2)
            .enumerate()
            .map(|(i, w)| (w[1].1 - w[0].1, i))
            .collect();
        gaps.sort_by(|a, b| b.0.total_cmp(&a.0));
        split_at = gaps[..rows - 1].iter().map(|&(_, i)| i).collect();
        split_at.sort_unstable();

        // The chosen gaps must actually separate rows: every selected gap
        // has to dominate the in-row spread.
        let smallest_selected = gaps[rows - 2].0;
        let largest_unselected = gaps[rows - 1..]
            .iter()
            .map(|&(g, _)| g)
            .fold(0.0f32, f32::max);
        if smallest_selected <= 2.0 * largest_unselected {
            return None;
        }
    }

    let mut grid: Vec<Vec2> = Vec::with_capacity(points.len());
    let mut start = 0usize;
    for r in 0..rows {
        let end = if r < split_at.len() {
            split_at[r] + 1
        } else {
            rotated.len()
        };
        if end - start != cols {
            return None;
        }
        let mut row: Vec<(f32, f32, Vec2)> = rotated[start..end].to_vec();
        row.sort_by(|a, b| a.0.total_cmp(&b.0));
        grid.extend(row.iter().map(|&(_, _, p)| p));
        start = end;
    }
    Some(grid)
}

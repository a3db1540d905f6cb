//! Thresholding, non-maximum suppression and center-of-mass refinement on a
//! response map.

use glam::Vec2;

use super::response::ResponseMap;

#[derive(Clone, Copy, Debug)]
pub struct Candidate {
    pub pos: Vec2,
    pub strength: f32,
}

/// Extract corner candidates: keep local maxima above
/// `threshold_rel * max_response`, then refine each to sub-pixel by a 5x5
/// center of mass over the positive response.
pub fn extract_candidates(resp: &ResponseMap, threshold_rel: f32, nms_radius: u32) -> Vec<Candidate> {
    let max_response = resp.data.iter().cloned().fold(0.0f32, f32::max);
    if max_response <= 0.0 {
        return Vec::new();
    }
    let threshold = threshold_rel * max_response;
    let r = nms_radius as i32;
    let mut out = Vec::new();

    for y in 0..resp.h {
        for x in 0..resp.w {
            let v = resp.at(x, y);
            if v < threshold {
                continue;
            }
            if !is_local_max(resp, x, y, r, v) {
                continue;
            }
            out.push(Candidate {
                pos: center_of_mass(resp, x, y),
                strength: v,
            });
        }
    }
    out
}

fn is_local_max(resp: &ResponseMap, x: usize, y: usize, r: i32, v: f32) -> bool {
    for dy in -r..=r {
        for dx in -r..=r {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || ny < 0 || nx >= resp.w as i32 || ny >= resp.h as i32 {
                continue;
            }
            let n = resp.at(nx as usize, ny as usize);
            // Ties resolve toward the earlier (upper-left) pixel.
            if n > v || (n == v && (dy < 0 || (dy == 0 && dx < 0))) {
                return false;
            }
        }
    }
    true
}

fn center_of_mass(resp: &ResponseMap, x: usize, y: usize) -> Vec2 {
    let mut sum = 0.0f32;
    let mut sx = 0.0f32;
    let mut sy = 0.0f32;
    for dy in -2i32..=2 {
        for dx in -2i32..=2 {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || ny < 0 || nx >= resp.w as i32 || ny >= resp.h as i32 {
                continue;
            }
            let v = resp.at(nx as usize, ny as usize).max(0.0);
            sum += v;
            sx += v * nx as f32;
            sy += v * ny as f32;
        }
    }
    if sum > 0.0 {
        Vec2::new(sx / sum, sy / sum)
    } else {
        Vec2::new(x as f32, y as f32)
    }
}

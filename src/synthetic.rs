//! Synthetic checkerboard rendering for dataset generation and tests.
//!
//! Views are rendered by mapping every pixel back through the inverse of
//! the board-plane homography `K [r1 r2 t]` and sampling the checker
//! pattern, with 2x2 supersampling so corner edges are softly antialiased
//! (which is what sub-pixel refinement needs to bite on).

use glam::Vec2;
use image::GrayImage;
use nalgebra as na;

use crate::board::BoardConfig;

const DARK: f32 = 30.0;
const LIGHT: f32 = 230.0;

/// A pose that centers the board in front of the camera at `distance`,
/// tilted by Euler angles (radians).
pub fn board_pose(
    board: &BoardConfig,
    tilt_x: f64,
    tilt_y: f64,
    roll: f64,
    distance: f64,
) -> na::Isometry3<f64> {
    let s = board.square_size;
    let center = na::Vector3::new(
        (board.cols as f64 - 1.0) * s / 2.0,
        (board.rows as f64 - 1.0) * s / 2.0,
        0.0,
    );
    let recentered = na::Isometry3::new(-center, na::Vector3::zeros());
    let rotated = na::Isometry3::from_parts(
        na::Translation3::identity(),
        na::UnitQuaternion::from_euler_angles(tilt_x, tilt_y, roll),
    );
    let pushed = na::Isometry3::new(na::Vector3::new(0.0, 0.0, distance), na::Vector3::zeros());
    pushed * rotated * recentered
}

/// Ground-truth pixel positions of the internal corners, raster ordered,
/// no distortion.
pub fn project_corners(
    k: &na::Matrix3<f64>,
    pose: &na::Isometry3<f64>,
    board: &BoardConfig,
) -> Vec<Vec2> {
    let s = board.square_size;
    let mut out = Vec::with_capacity(board.corner_count());
    for r in 0..board.rows {
        for c in 0..board.cols {
            let p = pose * na::Point3::new(c as f64 * s, r as f64 * s, 0.0);
            let uvw = k * na::Vector3::new(p.x, p.y, p.z);
            out.push(Vec2::new((uvw[0] / uvw[2]) as f32, (uvw[1] / uvw[2]) as f32));
        }
    }
    out
}

/// Render one view of the checkerboard. Background matches the light
/// squares, like a board printed on white paper.
pub fn render_checkerboard(
    k: &na::Matrix3<f64>,
    pose: &na::Isometry3<f64>,
    board: &BoardConfig,
    width: u32,
    height: u32,
) -> GrayImage {
    let r = pose.rotation.to_rotation_matrix();
    let t = pose.translation.vector;
    let mut plane = na::Matrix3::zeros();
    plane.set_column(0, &r.matrix().column(0).into_owned());
    plane.set_column(1, &r.matrix().column(1).into_owned());
    plane.set_column(2, &t);
    let h = k * plane;
    let Some(h_inv) = h.try_inverse() else {
        return GrayImage::from_pixel(width, height, image::Luma([LIGHT as u8]));
    };

    let s = board.square_size;
    let mut img = GrayImage::new(width, height);
    for py in 0..height {
        for px in 0..width {
            let mut acc = 0.0f32;
            for (du, dv) in [(-0.25, -0.25), (0.25, -0.25), (-0.25, 0.25), (0.25, 0.25)] {
                let uvw = h_inv
                    * na::Vector3::new(px as f64 + du, py as f64 + dv, 1.0);
                if uvw[2].abs() < 1e-12 {
                    acc += LIGHT;
                    continue;
                }
                let x = uvw[0] / uvw[2];
                let y = uvw[1] / uvw[2];
                acc += checker_shade(x, y, s, board);
            }
            img.put_pixel(px, py, image::Luma([(acc / 4.0).round() as u8]));
        }
    }
    img
}

fn checker_shade(x: f64, y: f64, s: f64, board: &BoardConfig) -> f32 {
    let i = (x / s).floor() as i64;
    let j = (y / s).floor() as i64;
    // Internal corner (0, 0) sits between cells -1 and 0; the full board
    // spans cells -1..=cols-1 horizontally and -1..=rows-1 vertically.
    if i < -1 || j < -1 || i > board.cols as i64 - 1 || j > board.rows as i64 - 1 {
        return LIGHT;
    }
    if (i + j).rem_euclid(2) == 0 { DARK } else { LIGHT }
}

/// Paint a flat rectangle over the image, simulating an occlusion.
pub fn occlude(img: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32, value: u8) {
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            img.put_pixel(x, y, image::Luma([value]));
        }
    }
}

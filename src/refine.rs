//! Iterative sub-pixel corner refinement.
//!
//! Classic gradient-orthogonality scheme: inside a window around the
//! current estimate, every image gradient should be orthogonal to the
//! vector from the true corner to the sample point. Accumulating the
//! resulting normal equations and re-solving moves the estimate onto the
//! saddle point; iteration stops on convergence or an iteration cap.

use glam::Vec2;
use image::GrayImage;
use nalgebra as na;

/// Stop after `max_iters` iterations or once a corner moves less than
/// `eps` pixels, whichever comes first.
#[derive(Debug, Clone, Copy)]
pub struct TermCriteria {
    pub max_iters: u32,
    pub eps: f32,
}

impl Default for TermCriteria {
    fn default() -> Self {
        Self {
            max_iters: 30,
            eps: 0.001,
        }
    }
}

/// Refine all corners in place-order; `half_window` of 5 means an 11x11
/// search window.
pub fn refine_subpixel(
    gray: &GrayImage,
    corners: &[Vec2],
    half_window: u32,
    criteria: TermCriteria,
) -> Vec<Vec2> {
    corners
        .iter()
        .map(|&c| refine_one(gray, c, half_window, criteria))
        .collect()
}

fn refine_one(gray: &GrayImage, start: Vec2, half_window: u32, criteria: TermCriteria) -> Vec2 {
    let hw = half_window as i32;
    let sigma = (half_window as f32 / 2.0).max(1.0);
    let mut c = start;

    for _ in 0..criteria.max_iters {
        let mut a = na::Matrix2::<f32>::zeros();
        let mut b = na::Vector2::<f32>::zeros();

        for dy in -hw..=hw {
            for dx in -hw..=hw {
                let px = c.x + dx as f32;
                let py = c.y + dy as f32;
                let (Some(gx), Some(gy)) = (
                    sample_gradient_x(gray, px, py),
                    sample_gradient_y(gray, px, py),
                ) else {
                    continue;
                };
                let w = (-((dx * dx + dy * dy) as f32) / (2.0 * sigma * sigma)).exp();
                let gxx = w * gx * gx;
                let gxy = w * gx * gy;
                let gyy = w * gy * gy;
                a[(0, 0)] += gxx;
                a[(0, 1)] += gxy;
                a[(1, 0)] += gxy;
                a[(1, 1)] += gyy;
                b[0] += gxx * px + gxy * py;
                b[1] += gxy * px + gyy * py;
            }
        }

        let det = a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)];
        if det.abs() < 1e-6 {
            break;
        }
        let Some(inv) = a.try_inverse() else { break };
        let solved = inv * b;
        let next = Vec2::new(solved[0], solved[1]);
        let shift = (next - c).length();
        c = next;
        if shift < criteria.eps {
            break;
        }
    }
    c
}

fn sample_gradient_x(gray: &GrayImage, x: f32, y: f32) -> Option<f32> {
    Some((sample_bilinear(gray, x + 1.0, y)? - sample_bilinear(gray, x - 1.0, y)?) * 0.5)
}

fn sample_gradient_y(gray: &GrayImage, x: f32, y: f32) -> Option<f32> {
    Some((sample_bilinear(gray, x, y + 1.0)? - sample_bilinear(gray, x, y - 1.0)?) * 0.5)
}

fn sample_bilinear(gray: &GrayImage, x: f32, y: f32) -> Option<f32> {
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    if x0 + 1 >= gray.width() || y0 + 1 >= gray.height() {
        return None;
    }
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;
    let p00 = gray.get_pixel(x0, y0)[0] as f32;
    let p10 = gray.get_pixel(x0 + 1, y0)[0] as f32;
    let p01 = gray.get_pixel(x0, y0 + 1)[0] as f32;
    let p11 = gray.get_pixel(x0 + 1, y0 + 1)[0] as f32;
    Some(
        p00 * (1.0 - fx) * (1.0 - fy)
            + p10 * fx * (1.0 - fy)
            + p01 * (1.0 - fx) * fy
            + p11 * fx * fy,
    )
}

//! Annotated debug images for accepted detections.

use std::path::Path;

use glam::Vec2;
use image::{DynamicImage, Rgb, RgbImage};

use crate::error::CalibError;

/// Color for corner `idx` of `total`, running through the turbo colormap so
/// the raster order is visible in the overlay.
pub fn corner_color(idx: usize, total: usize) -> Rgb<u8> {
    let c = colorous::TURBO.eval_rational(idx, total.max(2));
    Rgb([c.r, c.g, c.b])
}

/// Render a copy of the source image with the ordered corners marked and
/// consecutive corners connected.
pub fn annotate_corners(img: &DynamicImage, corners: &[Vec2]) -> RgbImage {
    let mut out = img.to_rgb8();
    let n = corners.len();
    for (i, pair) in corners.windows(2).enumerate() {
        draw_line(&mut out, pair[0], pair[1], corner_color(i, n));
    }
    for (i, c) in corners.iter().enumerate() {
        draw_circle(&mut out, *c, 4, corner_color(i, n));
    }
    out
}

pub fn save_annotated(
    img: &DynamicImage,
    corners: &[Vec2],
    out_path: &Path,
) -> Result<(), CalibError> {
    let annotated = annotate_corners(img, corners);
    annotated.save(out_path)?;
    Ok(())
}

fn put_pixel(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_circle(img: &mut RgbImage, center: Vec2, radius: i32, color: Rgb<u8>) {
    let cx = center.x.round() as i32;
    let cy = center.y.round() as i32;
    let r2_outer = (radius * radius) as f32;
    let r2_inner = ((radius - 2).max(0) * (radius - 2).max(0)) as f32;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d2 = (dx * dx + dy * dy) as f32;
            if d2 <= r2_outer && d2 >= r2_inner {
                put_pixel(img, cx + dx, cy + dy, color);
            }
        }
    }
}

fn draw_line(img: &mut RgbImage, a: Vec2, b: Vec2, color: Rgb<u8>) {
    // Bresenham on rounded endpoints.
    let (mut x0, mut y0) = (a.x.round() as i32, a.y.round() as i32);
    let (x1, y1) = (b.x.round() as i32, b.y.round() as i32);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(img, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

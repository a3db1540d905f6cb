//! Ring-based corner response for chessboard-like X-corners.
//!
//! For each pixel, 16 samples on a surrounding ring are combined into a
//! response that is large at corners where two dark and two light quadrants
//! meet, while edges and blobs are suppressed (the "ChESS" response:
//! chess-board extraction by subtraction and summation).

use image::GrayImage;

/// Dense response map in row-major layout.
#[derive(Clone, Debug)]
pub struct ResponseMap {
    pub w: usize,
    pub h: usize,
    pub data: Vec<f32>,
}

impl ResponseMap {
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.w + x]
    }
}

/// 16 ring offsets for the canonical radius-5 ring, counter-clockwise.
const RING_R5: [(i32, i32); 16] = [
    (5, 0),
    (5, 2),
    (4, 4),
    (2, 5),
    (0, 5),
    (-2, 5),
    (-4, 4),
    (-5, 2),
    (-5, 0),
    (-5, -2),
    (-4, -4),
    (-2, -5),
    (0, -5),
    (2, -5),
    (4, -4),
    (5, -2),
];

pub fn ring_offsets(radius: u32) -> [(i32, i32); 16] {
    if radius == 5 {
        RING_R5
    } else {
        let scale = radius as f32 / 5.0;
        let mut ring = [(0i32, 0i32); 16];
        for (i, (dx, dy)) in RING_R5.iter().enumerate() {
            ring[i] = (
                (*dx as f32 * scale).round() as i32,
                (*dy as f32 * scale).round() as i32,
            );
        }
        ring
    }
}

/// Dense response over the whole image. Pixels closer than `radius + 1` to
/// the border get response 0.
pub fn chess_response(gray: &GrayImage, radius: u32) -> ResponseMap {
    let w = gray.width() as usize;
    let h = gray.height() as usize;
    let mut data = vec![0.0f32; w * h];
    let margin = radius as usize + 1;
    if w <= 2 * margin || h <= 2 * margin {
        return ResponseMap { w, h, data };
    }
    let ring = ring_offsets(radius);
    let raw = gray.as_raw();

    for y in margin..h - margin {
        for x in margin..w - margin {
            let mut s = [0.0f32; 16];
            for (i, (dx, dy)) in ring.iter().enumerate() {
                let sx = (x as i32 + dx) as usize;
                let sy = (y as i32 + dy) as usize;
                s[i] = raw[sy * w + sx] as f32;
            }

            // Four-fold alternation along the ring.
            let mut sum_response = 0.0f32;
            // Rotational symmetry by half a turn; large on edges.
            let mut diff_response = 0.0f32;
            let mut ring_mean = 0.0f32;
            for n in 0..8 {
                sum_response += (s[n] + s[(n + 8) % 16] - s[(n + 4) % 16] - s[(n + 12) % 16]).abs();
                diff_response += (s[n] - s[n + 8]).abs();
                ring_mean += s[n] + s[n + 8];
            }
            ring_mean /= 16.0;

            // Local mean over a small center cross; penalizes plain
            // light/dark patches whose ring mean drifts from the center.
            let center = (raw[y * w + x] as f32
                + raw[y * w + x - 1] as f32
                + raw[y * w + x + 1] as f32
                + raw[(y - 1) * w + x] as f32
                + raw[(y + 1) * w + x] as f32)
                / 5.0;
            let mean_response = 16.0 * (ring_mean - center).abs();

            data[y * w + x] = sum_response - diff_response - mean_response;
        }
    }
    ResponseMap { w, h, data }
}

/// Min/max contrast stretch to the full 8-bit range.
pub fn stretch_contrast(gray: &GrayImage) -> GrayImage {
    let raw = gray.as_raw();
    let mut lo = u8::MAX;
    let mut hi = u8::MIN;
    for &v in raw {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if hi <= lo {
        return gray.clone();
    }
    let span = (hi - lo) as f32;
    let data: Vec<u8> = raw
        .iter()
        .map(|&v| (((v - lo) as f32 / span) * 255.0).round() as u8)
        .collect();
    GrayImage::from_raw(gray.width(), gray.height(), data).unwrap_or_else(|| gray.clone())
}

/// Global histogram equalization; tolerant of uneven exposure at the cost
/// of amplifying noise.
pub fn equalize_hist(gray: &GrayImage) -> GrayImage {
    let raw = gray.as_raw();
    let total = raw.len() as f32;
    if raw.is_empty() {
        return gray.clone();
    }
    let mut hist = [0u32; 256];
    for &v in raw {
        hist[v as usize] += 1;
    }
    let mut lut = [0u8; 256];
    let mut cdf = 0u32;
    for (v, count) in hist.iter().enumerate() {
        cdf += count;
        lut[v] = ((cdf as f32 / total) * 255.0).round() as u8;
    }
    let data: Vec<u8> = raw.iter().map(|&v| lut[v as usize]).collect();
    GrayImage::from_raw(gray.width(), gray.height(), data).unwrap_or_else(|| gray.clone())
}

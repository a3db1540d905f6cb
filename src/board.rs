use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Geometry of the checkerboard target: internal corner grid plus the
/// physical side length of one square.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Internal corners along the horizontal board axis.
    pub cols: usize,
    /// Internal corners along the vertical board axis.
    pub rows: usize,
    /// Side length of one square, in whatever unit the caller cares about.
    /// 1.0 is fine when only intrinsics are needed.
    pub square_size: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            cols: 15,
            rows: 10,
            square_size: 1.0,
        }
    }
}

impl BoardConfig {
    pub fn corner_count(&self) -> usize {
        self.cols * self.rows
    }
}

/// The board's idealized 3D corner positions (z = 0), raster ordered:
/// row by row, left to right. Every accepted image observation pairs with
/// these points index by index.
pub struct Board {
    pub config: BoardConfig,
    pub object_points: Vec<Vec3>,
}

impl Board {
    pub fn from_config(config: &BoardConfig) -> Board {
        let s = config.square_size as f32;
        let mut object_points = Vec::with_capacity(config.corner_count());
        for r in 0..config.rows {
            for c in 0..config.cols {
                object_points.push(Vec3 {
                    x: c as f32 * s,
                    y: r as f32 * s,
                    z: 0.0,
                });
            }
        }
        Board {
            config: *config,
            object_points,
        }
    }

    pub fn corner_count(&self) -> usize {
        self.config.corner_count()
    }
}

pub fn create_default_board() -> Board {
    Board::from_config(&BoardConfig::default())
}

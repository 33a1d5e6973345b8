//! 2D point type used for landmarks, fingertips, and cursor positions.

use serde::{Deserialize, Serialize};

/// A 2D point.
///
/// Depending on context the coordinates are either normalized to
/// `[0.0, 1.0]` of the frame or expressed in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert a normalized point to image pixels, truncating each
    /// component toward zero like a raster index.
    pub fn to_pixels(&self, width: u32, height: u32) -> Point2D {
        Point2D {
            x: (self.x * width as f64).trunc(),
            y: (self.y * height as f64).trunc(),
        }
    }

    /// Whether both components lie in `[0.0, 1.0]`.
    pub fn is_normalized(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

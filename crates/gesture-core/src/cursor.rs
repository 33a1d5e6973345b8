//! Mapping hand position to screen pixels.
//!
//! The wrist landmark (normalized to the camera frame) is scaled to the
//! screen resolution. Inputs outside `[0, 1]` are not clamped by
//! [`map_to_screen`] and yield off-screen coordinates; [`CursorMapper`]
//! can clamp on request.

use handmouse_gesture_model::point::Point2D;

/// Scale a normalized point to screen pixels, truncating toward zero.
pub fn map_to_screen(point: Point2D, screen_width: u32, screen_height: u32) -> (i32, i32) {
    let x = (point.x * screen_width as f64) as i32;
    let y = (point.y * screen_height as f64) as i32;
    (x, y)
}

/// Stateful cursor mapper with optional EMA smoothing and clamping.
///
/// With `smoothing == 0.0` and `clamp == false` this is exactly
/// [`map_to_screen`] and keeps no state between frames.
#[derive(Debug, Clone)]
pub struct CursorMapper {
    screen_width: u32,
    screen_height: u32,
    smoothing: f64,
    clamp: bool,
    previous: Option<Point2D>,
}

impl CursorMapper {
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            screen_width,
            screen_height,
            smoothing: 0.0,
            clamp: false,
            previous: None,
        }
    }

    /// EMA smoothing strength in `[0.0, 1.0]`; larger values smooth more.
    ///
    /// `smoothed = alpha * current + (1 - alpha) * previous` with `alpha = 1 - strength`.
    pub fn with_smoothing(mut self, strength: f64) -> Self {
        self.smoothing = strength.clamp(0.0, 1.0);
        self
    }

    /// Keep mapped positions inside `[0, width - 1] x [0, height - 1]`.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }

    /// Map a normalized hand position to screen pixels.
    pub fn map(&mut self, normalized: Point2D) -> (i32, i32) {
        let point = if self.smoothing > 0.0 {
            let alpha = 1.0 - self.smoothing;
            let smoothed = match self.previous {
                Some(prev) => Point2D::new(
                    alpha * normalized.x + (1.0 - alpha) * prev.x,
                    alpha * normalized.y + (1.0 - alpha) * prev.y,
                ),
                None => normalized,
            };
            self.previous = Some(smoothed);
            smoothed
        } else {
            normalized
        };

        let (x, y) = map_to_screen(point, self.screen_width, self.screen_height);
        if self.clamp {
            (
                x.clamp(0, self.screen_width.saturating_sub(1) as i32),
                y.clamp(0, self.screen_height.saturating_sub(1) as i32),
            )
        } else {
            (x, y)
        }
    }

    /// Forget smoothing history, e.g. after the hand left the frame.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

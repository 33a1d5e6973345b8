//! Debug overlay: the frame with the hand skeleton drawn on top.

use std::path::PathBuf;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};

use handmouse_common::error::{HandmouseError, HandmouseResult};
use handmouse_gesture_model::gesture::FINGER_TIPS;
use handmouse_gesture_model::landmark::{HandLandmarks, HAND_CONNECTIONS};

use crate::frame::Frame;

const SKELETON_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const TIP_OUTLINE_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const TIP_FILL_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const TIP_RADIUS: i32 = 9;

/// Presents a processed frame. May report a pressed key code.
pub trait Overlay: Send {
    fn present(&mut self, frame: &Frame, hands: &[HandLandmarks]) -> HandmouseResult<Option<u8>>;
}

/// Draws nothing.
#[derive(Debug, Default)]
pub struct NullOverlay;

impl Overlay for NullOverlay {
    fn present(&mut self, _frame: &Frame, _hands: &[HandLandmarks]) -> HandmouseResult<Option<u8>> {
        Ok(None)
    }
}

/// Writes every Nth annotated frame as a PNG.
pub struct SnapshotOverlay {
    dir: PathBuf,
    every: u64,
    presented: u64,
    written: u64,
}

impl SnapshotOverlay {
    pub fn new(dir: impl Into<PathBuf>, every: u32) -> HandmouseResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            every: every.max(1) as u64,
            presented: 0,
            written: 0,
        })
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl Overlay for SnapshotOverlay {
    fn present(&mut self, frame: &Frame, hands: &[HandLandmarks]) -> HandmouseResult<Option<u8>> {
        let due = self.presented % self.every == 0;
        self.presented += 1;
        if !due {
            return Ok(None);
        }

        let image = render(frame, hands);
        let path = self.dir.join(format!("frame-{:06}.png", frame.seq));
        image.save(&path).map_err(|e| {
            HandmouseError::recording(format!("Failed to write {}: {e}", path.display()))
        })?;
        self.written += 1;
        tracing::trace!(path = %path.display(), "Snapshot written");
        Ok(None)
    }
}

/// Draw the skeleton and fingertip markers of every hand onto the frame.
///
/// Frames without pixels are drawn on a black canvas.
pub fn render(frame: &Frame, hands: &[HandLandmarks]) -> RgbImage {
    let mut image = frame
        .image
        .clone()
        .unwrap_or_else(|| RgbImage::new(frame.width, frame.height));

    for hand in hands {
        let points = hand.points_px(frame.width, frame.height);

        for &(a, b) in HAND_CONNECTIONS.iter() {
            if let (Some(p), Some(q)) = (points.get(a), points.get(b)) {
                draw_line_segment_mut(
                    &mut image,
                    (p.x as f32, p.y as f32),
                    (q.x as f32, q.y as f32),
                    SKELETON_COLOR,
                );
            }
        }

        for &tip in FINGER_TIPS.iter() {
            if let Some(p) = points.get(tip) {
                let center = (p.x as i32, p.y as i32);
                draw_hollow_circle_mut(&mut image, center, TIP_RADIUS, TIP_OUTLINE_COLOR);
                draw_hollow_circle_mut(&mut image, center, TIP_RADIUS - 1, TIP_OUTLINE_COLOR);
                draw_filled_circle_mut(&mut image, center, TIP_RADIUS - 2, TIP_FILL_COLOR);
            }
        }
    }

    image
}

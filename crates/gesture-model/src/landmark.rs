//! Hand landmark types.
//!
//! Detectors report 21 landmarks per hand using the MediaPipe anatomical
//! numbering. Coordinates are normalized to the frame; `z` is relative
//! depth and unused by the classifier.

use serde::{Deserialize, Serialize};

use handmouse_common::error::{HandmouseError, HandmouseResult};

use crate::gesture::{Finger, FingerCoords};
use crate::point::Point2D;

/// Number of landmarks in a complete hand skeleton.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices (MediaPipe hand model numbering).
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Skeleton edges drawn by the debug overlay.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = {
    use index::*;
    [
        (WRIST, THUMB_CMC),
        (THUMB_CMC, THUMB_MCP),
        (THUMB_MCP, THUMB_IP),
        (THUMB_IP, THUMB_TIP),
        (WRIST, INDEX_MCP),
        (INDEX_MCP, INDEX_PIP),
        (INDEX_PIP, INDEX_DIP),
        (INDEX_DIP, INDEX_TIP),
        (INDEX_MCP, MIDDLE_MCP),
        (MIDDLE_MCP, MIDDLE_PIP),
        (MIDDLE_PIP, MIDDLE_DIP),
        (MIDDLE_DIP, MIDDLE_TIP),
        (MIDDLE_MCP, RING_MCP),
        (RING_MCP, RING_PIP),
        (RING_PIP, RING_DIP),
        (RING_DIP, RING_TIP),
        (RING_MCP, PINKY_MCP),
        (WRIST, PINKY_MCP),
        (PINKY_MCP, PINKY_PIP),
        (PINKY_PIP, PINKY_DIP),
        (PINKY_DIP, PINKY_TIP),
    ]
};

/// A single landmark with normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// X coordinate (0.0 to 1.0, normalized to frame width).
    pub x: f64,
    /// Y coordinate (0.0 to 1.0, normalized to frame height).
    pub y: f64,
    /// Depth relative to the wrist.
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// The `(x, y)` part as a normalized point.
    pub fn point(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// One detected hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    /// Landmarks in anatomical order. A well-formed hand has exactly 21.
    pub landmarks: Vec<Landmark>,

    /// Detector confidence (0.0 to 1.0).
    #[serde(default = "default_score")]
    pub score: f32,

    /// "Left" or "Right" as reported by the detector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<String>,
}

fn default_score() -> f32 {
    1.0
}

impl HandLandmarks {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self {
            landmarks,
            score: 1.0,
            handedness: None,
        }
    }

    /// Check that the skeleton is complete.
    pub fn validate(&self) -> HandmouseResult<()> {
        if self.landmarks.len() < LANDMARK_COUNT {
            return Err(HandmouseError::invalid_input(format!(
                "expected {LANDMARK_COUNT} landmarks, got {}",
                self.landmarks.len()
            )));
        }
        Ok(())
    }

    /// Landmark at an anatomical index.
    pub fn get(&self, idx: usize) -> HandmouseResult<&Landmark> {
        self.landmarks.get(idx).ok_or_else(|| {
            HandmouseError::invalid_input(format!(
                "landmark {idx} missing (hand has {})",
                self.landmarks.len()
            ))
        })
    }

    /// Wrist position in normalized coordinates (the hand center).
    pub fn wrist(&self) -> HandmouseResult<Point2D> {
        Ok(self.get(index::WRIST)?.point())
    }

    /// The five fingertips in image pixels, in `[thumb, index, middle, ring, pinky]` order.
    pub fn fingertips_px(&self, width: u32, height: u32) -> HandmouseResult<FingerCoords> {
        let mut tips = [Point2D::default(); 5];
        for (slot, finger) in tips.iter_mut().zip(Finger::ALL) {
            *slot = self.get(finger.tip_landmark())?.point().to_pixels(width, height);
        }
        Ok(FingerCoords::new(tips))
    }

    /// All landmarks in image pixels.
    pub fn points_px(&self, width: u32, height: u32) -> Vec<Point2D> {
        self.landmarks
            .iter()
            .map(|lm| lm.point().to_pixels(width, height))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A flat open hand: wrist at the bottom, fingers fanned upward.
    fn open_hand() -> HandLandmarks {
        let mut landmarks = vec![Landmark::default(); LANDMARK_COUNT];
        landmarks[index::WRIST] = Landmark::new(0.5, 0.875);
        for finger in 0..5 {
            let base_x = 0.25 + finger as f64 * 0.125;
            for joint in 0..4 {
                landmarks[1 + finger * 4 + joint] =
                    Landmark::new(base_x, 0.75 - joint as f64 * 0.125);
            }
        }
        HandLandmarks::new(landmarks)
    }

    #[test]
    fn test_validate_rejects_short_skeleton() {
        let hand = HandLandmarks::new(vec![Landmark::default(); 12]);
        let err = hand.validate().unwrap_err();
        assert!(err.is_per_hand());
        assert!(open_hand().validate().is_ok());
    }

    #[test]
    fn test_fingertips_px_uses_tip_indices() {
        let hand = open_hand();
        let tips = hand.fingertips_px(640, 480).unwrap();
        assert_eq!(tips.thumb(), Point2D::new(160.0, 180.0));
        assert_eq!(tips.pinky(), Point2D::new(480.0, 180.0));
    }

    #[test]
    fn test_fingertips_px_fails_on_missing_tip() {
        let hand = HandLandmarks::new(vec![Landmark::default(); 10]);
        assert!(hand.fingertips_px(640, 480).is_err());
    }

    #[test]
    fn test_wrist_is_normalized() {
        let wrist = open_hand().wrist().unwrap();
        assert_eq!(wrist, Point2D::new(0.5, 0.875));
    }

    #[test]
    fn test_detector_json_without_optional_fields() {
        let raw = r#"{"landmarks":[{"x":0.1,"y":0.2}]}"#;
        let hand: HandLandmarks = serde_json::from_str(raw).unwrap();
        assert_eq!(hand.score, 1.0);
        assert_eq!(hand.handedness, None);
        assert_eq!(hand.landmarks[0].z, 0.0);
    }

    #[test]
    fn test_connections_stay_within_skeleton() {
        for (a, b) in HAND_CONNECTIONS {
            assert!(a < LANDMARK_COUNT && b < LANDMARK_COUNT);
        }
    }
}

//! Fingertip coordinates and the actions a gesture maps to.

use serde::{Deserialize, Serialize};

use handmouse_common::error::{HandmouseError, HandmouseResult};

use crate::landmark::index;
use crate::point::Point2D;

/// Landmark indices of the tracked fingertips, in classifier order.
pub const FINGER_TIPS: [usize; 5] = [
    index::THUMB_TIP,
    index::INDEX_TIP,
    index::MIDDLE_TIP,
    index::RING_TIP,
    index::PINKY_TIP,
];

/// A tracked finger. The discriminant is the position in [`FingerCoords`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Pinky = 4,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Landmark index of this finger's tip.
    pub fn tip_landmark(self) -> usize {
        FINGER_TIPS[self as usize]
    }
}

/// Exactly five fingertip positions in `[thumb, index, middle, ring, pinky]` order.
///
/// The classifier indexes by position, so order is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FingerCoords([Point2D; 5]);

impl FingerCoords {
    pub fn new(tips: [Point2D; 5]) -> Self {
        Self(tips)
    }

    /// Build from a slice, failing unless it holds exactly five points.
    pub fn from_slice(points: &[Point2D]) -> HandmouseResult<Self> {
        let tips: [Point2D; 5] = points.try_into().map_err(|_| {
            HandmouseError::invalid_input(format!(
                "expected 5 fingertip coordinates, got {}",
                points.len()
            ))
        })?;
        Ok(Self(tips))
    }

    pub fn get(&self, finger: Finger) -> Point2D {
        self.0[finger as usize]
    }

    pub fn thumb(&self) -> Point2D {
        self.get(Finger::Thumb)
    }

    pub fn index(&self) -> Point2D {
        self.get(Finger::Index)
    }

    pub fn middle(&self) -> Point2D {
        self.get(Finger::Middle)
    }

    pub fn ring(&self) -> Point2D {
        self.get(Finger::Ring)
    }

    pub fn pinky(&self) -> Point2D {
        self.get(Finger::Pinky)
    }

    pub fn as_slice(&self) -> &[Point2D] {
        &self.0
    }
}

impl TryFrom<&[Point2D]> for FingerCoords {
    type Error = HandmouseError;

    fn try_from(points: &[Point2D]) -> HandmouseResult<Self> {
        Self::from_slice(points)
    }
}

/// A discrete output of the tracking pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Move the cursor to absolute screen pixels.
    MoveCursor { x: i32, y: i32 },
    /// Thumb and index pinched together.
    LeftClick,
    /// Thumb spread away while index and middle touch.
    RightClick,
    /// Pinky tip above the thumb tip.
    ScrollUp,
    /// Pinky tip below the thumb tip.
    ScrollDown,
    /// No gesture recognized; nothing is dispatched.
    NoOp,
}

impl Action {
    /// Whether dispatching this action has any effect.
    pub fn is_noop(&self) -> bool {
        matches!(self, Action::NoOp)
    }

    /// Short label for logs and console output.
    pub fn label(&self) -> &'static str {
        match self {
            Action::MoveCursor { .. } => "move",
            Action::LeftClick => "left_click",
            Action::RightClick => "right_click",
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::NoOp => "none",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::MoveCursor { x, y } => write!(f, "move({x}, {y})"),
            other => f.write_str(other.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_requires_five_points() {
        let four = vec![Point2D::default(); 4];
        let err = FingerCoords::from_slice(&four).unwrap_err();
        assert!(err.is_per_hand());
        assert!(err.to_string().contains("got 4"));

        let six = vec![Point2D::default(); 6];
        assert!(FingerCoords::try_from(six.as_slice()).is_err());
    }

    #[test]
    fn test_accessors_follow_fixed_order() {
        let points: Vec<Point2D> = (0..5).map(|i| Point2D::new(i as f64, 0.0)).collect();
        let coords = FingerCoords::from_slice(&points).unwrap();
        assert_eq!(coords.thumb().x, 0.0);
        assert_eq!(coords.index().x, 1.0);
        assert_eq!(coords.middle().x, 2.0);
        assert_eq!(coords.ring().x, 3.0);
        assert_eq!(coords.pinky().x, 4.0);
    }

    #[test]
    fn test_tip_landmarks() {
        let tips: Vec<usize> = Finger::ALL.iter().map(|f| f.tip_landmark()).collect();
        assert_eq!(tips, vec![4, 8, 12, 16, 20]);
    }

    #[test]
    fn test_action_json_format() {
        let json = serde_json::to_string(&Action::MoveCursor { x: 10, y: 20 }).unwrap();
        assert_eq!(json, r#"{"type":"move_cursor","x":10,"y":20}"#);
        let json = serde_json::to_string(&Action::ScrollUp).unwrap();
        assert_eq!(json, r#"{"type":"scroll_up"}"#);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::MoveCursor { x: 3, y: 4 }.to_string(), "move(3, 4)");
        assert_eq!(Action::LeftClick.to_string(), "left_click");
        assert!(Action::NoOp.is_noop());
    }
}

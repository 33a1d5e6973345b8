//! Gesture classification.
//!
//! Five fingertips in, one [`Action`] out. Rules are evaluated in a fixed
//! order and the first match wins:
//!
//! 1. thumb-index distance below `pinch` → left click
//! 2. thumb-index above `spread` and index-middle below `touch` → right click
//! 3. pinky tip above the thumb tip (smaller y) → scroll up
//! 4. pinky tip below the thumb tip → scroll down
//! 5. otherwise → no-op
//!
//! Coordinates are image pixels with y growing downward.

use std::str::FromStr;

use handmouse_common::error::{HandmouseError, HandmouseResult};
use handmouse_gesture_model::gesture::{Action, FingerCoords};
use handmouse_gesture_model::point::Point2D;

use crate::geometry::distance;

/// Distance thresholds for the gesture rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Thumb-index distance below which a pinch (left click) fires.
    pub pinch: f64,
    /// Thumb-index distance above which the hand counts as spread.
    pub spread: f64,
    /// Index-middle distance below which the two fingers touch.
    pub touch: f64,
}

impl Thresholds {
    /// Pixel thresholds tuned for a 640x480 webcam at arm's length.
    pub const PIXELS: Thresholds = Thresholds {
        pinch: 50.0,
        spread: 150.0,
        touch: 50.0,
    };

    /// Hand-span ratios equivalent to [`Thresholds::PIXELS`] for a ~200 px hand.
    pub const RATIOS: Thresholds = Thresholds {
        pinch: 0.25,
        spread: 0.75,
        touch: 0.25,
    };

    /// Multiply every threshold by `scale`.
    pub fn scaled(&self, scale: f64) -> Thresholds {
        Thresholds {
            pinch: self.pinch * scale,
            spread: self.spread * scale,
            touch: self.touch * scale,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::PIXELS
    }
}

/// How thresholds relate to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdMode {
    /// Fixed pixel distances.
    #[default]
    Pixel,
    /// Ratios of the hand span (wrist to middle fingertip), so the
    /// gestures keep working as the hand moves toward or away from the camera.
    HandScaled,
}

impl FromStr for ThresholdMode {
    type Err = HandmouseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pixel" | "pixels" => Ok(Self::Pixel),
            "hand_scaled" | "hand-scaled" | "scaled" => Ok(Self::HandScaled),
            other => Err(HandmouseError::config(format!(
                "unknown threshold mode '{other}' (expected pixel|hand_scaled)"
            ))),
        }
    }
}

/// Distances the rules look at, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    pub thumb_index: f64,
    pub index_middle: f64,
    /// Not used by any rule.
    pub thumb_pinky: f64,
}

impl Measurements {
    pub fn of(tips: &FingerCoords) -> Self {
        Self {
            thumb_index: distance(tips.thumb(), tips.index()),
            index_middle: distance(tips.index(), tips.middle()),
            thumb_pinky: distance(tips.thumb(), tips.pinky()),
        }
    }
}

/// The outcome of classifying one hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub thresholds: Thresholds,
    pub measurements: Measurements,
}

/// Apply the ordered gesture rules to five fingertips.
pub fn classify(tips: &FingerCoords, thresholds: &Thresholds) -> Action {
    let thumb = tips.thumb();
    let pinky = tips.pinky();

    let thumb_index = distance(thumb, tips.index());
    if thumb_index < thresholds.pinch {
        return Action::LeftClick;
    }

    if thumb_index > thresholds.spread && distance(tips.index(), tips.middle()) < thresholds.touch
    {
        return Action::RightClick;
    }

    if pinky.y < thumb.y {
        Action::ScrollUp
    } else if pinky.y > thumb.y {
        Action::ScrollDown
    } else {
        Action::NoOp
    }
}

/// Classify a raw slice of fingertip points with pixel thresholds.
///
/// Fails with `InvalidInput` unless exactly five points are given.
pub fn classify_points(points: &[Point2D]) -> HandmouseResult<Action> {
    let tips = FingerCoords::from_slice(points)?;
    Ok(classify(&tips, &Thresholds::PIXELS))
}

/// Classifier configured with a threshold mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureClassifier {
    mode: ThresholdMode,
    pixels: Thresholds,
    ratios: Thresholds,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(ThresholdMode::Pixel, Thresholds::PIXELS, Thresholds::RATIOS)
    }
}

impl GestureClassifier {
    pub fn new(mode: ThresholdMode, pixels: Thresholds, ratios: Thresholds) -> Self {
        Self {
            mode,
            pixels,
            ratios,
        }
    }

    pub fn mode(&self) -> ThresholdMode {
        self.mode
    }

    /// Effective thresholds for a hand of the given span (pixels).
    ///
    /// In hand-scaled mode a missing or degenerate span falls back to the
    /// pixel thresholds.
    pub fn thresholds_for(&self, hand_span_px: Option<f64>) -> Thresholds {
        match (self.mode, hand_span_px) {
            (ThresholdMode::HandScaled, Some(span)) if span.is_finite() && span > 0.0 => {
                self.ratios.scaled(span)
            }
            _ => self.pixels,
        }
    }

    /// Classify one hand.
    pub fn classify(&self, tips: &FingerCoords, hand_span_px: Option<f64>) -> Decision {
        let thresholds = self.thresholds_for(hand_span_px);
        let action = classify(tips, &thresholds);
        let measurements = Measurements::of(tips);

        tracing::trace!(
            action = %action,
            thumb_index = measurements.thumb_index,
            index_middle = measurements.index_middle,
            thumb_pinky = measurements.thumb_pinky,
            "Classified hand"
        );

        Decision {
            action,
            thresholds,
            measurements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tips(points: [(f64, f64); 5]) -> FingerCoords {
        FingerCoords::new(points.map(Point2D::from))
    }

    #[test]
    fn test_pinch_is_left_click() {
        let t = tips([
            (100.0, 100.0),
            (110.0, 105.0),
            (300.0, 300.0),
            (300.0, 300.0),
            (100.0, 10.0),
        ]);
        assert_eq!(classify(&t, &Thresholds::PIXELS), Action::LeftClick);
    }

    #[test]
    fn test_spread_with_touching_fingers_is_right_click() {
        let t = tips([(0.0, 0.0), (200.0, 0.0), (210.0, 0.0), (0.0, 0.0), (0.0, 0.0)]);
        assert_eq!(classify(&t, &Thresholds::PIXELS), Action::RightClick);
    }

    #[test]
    fn test_pinky_above_thumb_is_scroll_up() {
        let t = tips([(0.0, 50.0), (100.0, 50.0), (300.0, 50.0), (0.0, 0.0), (0.0, 10.0)]);
        assert_eq!(classify(&t, &Thresholds::PIXELS), Action::ScrollUp);
    }

    #[test]
    fn test_pinky_below_thumb_is_scroll_down() {
        let t = tips([(0.0, 50.0), (100.0, 50.0), (300.0, 50.0), (0.0, 0.0), (0.0, 90.0)]);
        assert_eq!(classify(&t, &Thresholds::PIXELS), Action::ScrollDown);
    }

    #[test]
    fn test_level_pinky_is_noop() {
        let t = tips([(0.0, 50.0), (100.0, 50.0), (300.0, 50.0), (0.0, 0.0), (40.0, 50.0)]);
        assert_eq!(classify(&t, &Thresholds::PIXELS), Action::NoOp);
    }

    #[test]
    fn test_boundaries_are_strict() {
        // Exactly at pinch: not a click.
        let t = tips([(0.0, 0.0), (50.0, 0.0), (300.0, 0.0), (0.0, 0.0), (0.0, 0.0)]);
        assert_eq!(classify(&t, &Thresholds::PIXELS), Action::NoOp);

        // Exactly at spread: not a right click.
        let t = tips([(0.0, 0.0), (150.0, 0.0), (160.0, 0.0), (0.0, 0.0), (0.0, 0.0)]);
        assert_eq!(classify(&t, &Thresholds::PIXELS), Action::NoOp);
    }

    #[test]
    fn test_spread_without_touch_falls_through_to_scroll() {
        let t = tips([(0.0, 100.0), (200.0, 100.0), (400.0, 100.0), (0.0, 0.0), (0.0, 20.0)]);
        assert_eq!(classify(&t, &Thresholds::PIXELS), Action::ScrollUp);
    }

    #[test]
    fn test_classify_points_rejects_short_input() {
        let err = classify_points(&[Point2D::default(); 3]).unwrap_err();
        assert!(matches!(err, HandmouseError::InvalidInput { .. }));
    }

    #[test]
    fn test_classify_points_accepts_five() {
        let points = [
            Point2D::new(100.0, 100.0),
            Point2D::new(110.0, 105.0),
            Point2D::default(),
            Point2D::default(),
            Point2D::default(),
        ];
        assert_eq!(classify_points(&points).unwrap(), Action::LeftClick);
    }

    #[test]
    fn test_hand_scaled_thresholds_follow_span() {
        let classifier =
            GestureClassifier::new(ThresholdMode::HandScaled, Thresholds::PIXELS, Thresholds::RATIOS);
        let t = classifier.thresholds_for(Some(400.0));
        assert_eq!(t.pinch, 100.0);
        assert_eq!(t.spread, 300.0);
        assert_eq!(t.touch, 100.0);

        // A big hand close to the camera: 80 px apart is still a pinch.
        let t = tips([(0.0, 0.0), (80.0, 0.0), (300.0, 0.0), (0.0, 0.0), (0.0, 0.0)]);
        assert_eq!(classifier.classify(&t, Some(400.0)).action, Action::LeftClick);
        assert_eq!(
            GestureClassifier::default().classify(&t, Some(400.0)).action,
            Action::NoOp
        );
    }

    #[test]
    fn test_hand_scaled_falls_back_without_span() {
        let classifier =
            GestureClassifier::new(ThresholdMode::HandScaled, Thresholds::PIXELS, Thresholds::RATIOS);
        assert_eq!(classifier.thresholds_for(None), Thresholds::PIXELS);
        assert_eq!(classifier.thresholds_for(Some(0.0)), Thresholds::PIXELS);
    }

    #[test]
    fn test_measurements_include_thumb_pinky() {
        let t = tips([(0.0, 0.0), (3.0, 4.0), (3.0, 4.0), (0.0, 0.0), (0.0, 12.0)]);
        let m = Measurements::of(&t);
        assert!((m.thumb_index - 5.0).abs() < 1e-12);
        assert_eq!(m.index_middle, 0.0);
        assert_eq!(m.thumb_pinky, 12.0);
    }

    #[test]
    fn test_threshold_mode_from_str() {
        assert_eq!("pixel".parse::<ThresholdMode>().unwrap(), ThresholdMode::Pixel);
        assert_eq!(
            "Hand_Scaled".parse::<ThresholdMode>().unwrap(),
            ThresholdMode::HandScaled
        );
        assert!("relative".parse::<ThresholdMode>().is_err());
    }

    fn point() -> impl Strategy<Value = Point2D> {
        (0.0f64..640.0, 0.0f64..480.0).prop_map(|(x, y)| Point2D::new(x, y))
    }

    fn finger_coords() -> impl Strategy<Value = FingerCoords> {
        [point(), point(), point(), point(), point()].prop_map(FingerCoords::new)
    }

    proptest! {
        #[test]
        fn classify_is_deterministic(t in finger_coords()) {
            prop_assert_eq!(
                classify(&t, &Thresholds::PIXELS),
                classify(&t, &Thresholds::PIXELS)
            );
        }

        #[test]
        fn pinch_dominates_other_fingers(
            thumb in point(),
            dx in -30.0f64..30.0,
            dy in -30.0f64..30.0,
            middle in point(),
            ring in point(),
            pinky in point(),
        ) {
            let index = Point2D::new(thumb.x + dx, thumb.y + dy);
            let t = FingerCoords::new([thumb, index, middle, ring, pinky]);
            prop_assert_eq!(classify(&t, &Thresholds::PIXELS), Action::LeftClick);
        }

        #[test]
        fn spread_and_touch_is_right_click(
            thumb in point(),
            angle in 0.0f64..std::f64::consts::TAU,
            reach in 151.0f64..400.0,
            tx in -30.0f64..30.0,
            ty in -30.0f64..30.0,
            ring in point(),
            pinky in point(),
        ) {
            let index = Point2D::new(thumb.x + reach * angle.cos(), thumb.y + reach * angle.sin());
            let middle = Point2D::new(index.x + tx, index.y + ty);
            let t = FingerCoords::new([thumb, index, middle, ring, pinky]);
            prop_assert_eq!(classify(&t, &Thresholds::PIXELS), Action::RightClick);
        }

        #[test]
        fn scroll_direction_follows_pinky(t in finger_coords()) {
            let action = classify(&t, &Thresholds::PIXELS);
            if !matches!(action, Action::LeftClick | Action::RightClick) {
                let expected = if t.pinky().y < t.thumb().y {
                    Action::ScrollUp
                } else if t.pinky().y > t.thumb().y {
                    Action::ScrollDown
                } else {
                    Action::NoOp
                };
                prop_assert_eq!(action, expected);
            }
        }
    }
}

//! Planar geometry helpers.

use handmouse_gesture_model::point::Point2D;

/// Euclidean distance between two points.
///
/// Exactly `0.0` for coincident points and symmetric in its arguments.
pub fn distance(p1: Point2D, p2: Point2D) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_three_four_five() {
        let d = distance(Point2D::new(0.0, 0.0), Point2D::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_reference_pinch_distance() {
        let d = distance(Point2D::new(100.0, 100.0), Point2D::new(110.0, 105.0));
        assert!((d - 11.180_339_887).abs() < 1e-6);
    }

    #[test]
    fn test_large_coordinates_do_not_overflow() {
        let d = distance(Point2D::new(0.0, 0.0), Point2D::new(1e200, 1e200));
        assert!(d.is_finite());
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(
            ax in -1e6f64..1e6, ay in -1e6f64..1e6,
            bx in -1e6f64..1e6, by in -1e6f64..1e6,
        ) {
            let a = Point2D::new(ax, ay);
            let b = Point2D::new(bx, by);
            prop_assert_eq!(distance(a, b), distance(b, a));
        }

        #[test]
        fn distance_to_self_is_zero(x in -1e6f64..1e6, y in -1e6f64..1e6) {
            let p = Point2D::new(x, y);
            prop_assert_eq!(distance(p, p), 0.0);
        }

        #[test]
        fn distance_is_non_negative(
            ax in -1e6f64..1e6, ay in -1e6f64..1e6,
            bx in -1e6f64..1e6, by in -1e6f64..1e6,
        ) {
            prop_assert!(distance(Point2D::new(ax, ay), Point2D::new(bx, by)) >= 0.0);
        }
    }
}

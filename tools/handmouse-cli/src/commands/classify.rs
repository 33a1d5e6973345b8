//! Classify five fingertip points without a camera.

use handmouse_common::config::AppConfig;
use handmouse_gesture_model::gesture::{Finger, FingerCoords};
use handmouse_gesture_model::point::Point2D;
use handmouse_tracking::classifier_from_config;

pub fn run(
    config: &AppConfig,
    points: &[(f64, f64)],
    hand_span: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let points: Vec<Point2D> = points.iter().copied().map(Point2D::from).collect();
    let tips = FingerCoords::from_slice(&points)?;
    let classifier = classifier_from_config(&config.gesture)?;
    let decision = classifier.classify(&tips, hand_span);

    if json {
        let value = serde_json::json!({
            "action": decision.action,
            "measurements": {
                "thumb_index": decision.measurements.thumb_index,
                "index_middle": decision.measurements.index_middle,
                "thumb_pinky": decision.measurements.thumb_pinky,
            },
            "thresholds": {
                "pinch": decision.thresholds.pinch,
                "spread": decision.thresholds.spread,
                "touch": decision.thresholds.touch,
            },
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Fingertips:");
    for finger in Finger::ALL {
        let p = tips.get(finger);
        println!("  {:<7} ({}, {})", format!("{finger:?}"), p.x, p.y);
    }
    println!();
    println!(
        "Thresholds ({:?}): pinch < {:.1}, spread > {:.1}, touch < {:.1}",
        classifier.mode(),
        decision.thresholds.pinch,
        decision.thresholds.spread,
        decision.thresholds.touch
    );
    println!(
        "Distances: thumb-index {:.2}, index-middle {:.2}, thumb-pinky {:.2}",
        decision.measurements.thumb_index,
        decision.measurements.index_middle,
        decision.measurements.thumb_pinky
    );
    println!();
    println!("Action: {}", decision.action);

    Ok(())
}

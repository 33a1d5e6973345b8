//! Choosing which detected hands control the pointer.

use std::str::FromStr;

use handmouse_common::error::HandmouseError;
use handmouse_gesture_model::landmark::HandLandmarks;

/// Policy for frames with more than one detected hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandPolicy {
    /// Only the first hand the detector reports.
    #[default]
    First,
    /// Only the hand with the highest detector score.
    MostConfident,
    /// Every hand, in detector order. Later hands overwrite the cursor
    /// position set by earlier ones within the same frame.
    All,
}

impl HandPolicy {
    /// Indices of the hands that act this frame, in dispatch order.
    ///
    /// `First` and `MostConfident` choose among hands with a complete set of
    /// landmarks, so a malformed hand never hides a usable one. `All` returns
    /// every hand and leaves rejection to the caller.
    pub fn select(&self, hands: &[HandLandmarks]) -> Vec<usize> {
        let mut usable = hands
            .iter()
            .enumerate()
            .filter(|(_, hand)| hand.validate().is_ok());

        match self {
            HandPolicy::First => usable.next().map(|(idx, _)| idx).into_iter().collect(),
            HandPolicy::MostConfident => usable
                .fold(None::<(usize, f32)>, |best, (idx, hand)| match best {
                    Some((_, score)) if hand.score <= score => best,
                    _ => Some((idx, hand.score)),
                })
                .map(|(idx, _)| idx)
                .into_iter()
                .collect(),
            HandPolicy::All => (0..hands.len()).collect(),
        }
    }
}

impl FromStr for HandPolicy {
    type Err = HandmouseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "most_confident" | "most-confident" | "confident" => Ok(Self::MostConfident),
            "all" => Ok(Self::All),
            other => Err(HandmouseError::config(format!(
                "unknown hand policy '{other}' (expected first|most_confident|all)"
            ))),
        }
    }
}

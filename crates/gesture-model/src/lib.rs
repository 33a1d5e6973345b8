//! HandMouse Gesture Model
//!
//! Defines the data contracts shared by the tracking pipeline:
//! - **Points:** 2D coordinates, normalized or in image pixels
//! - **Landmarks:** The 21-point hand skeleton produced by a detector
//! - **Gestures:** Fixed-order fingertip coordinates and the actions they map to
//! - **Recordings:** JSONL landmark streams for replaying sessions offline
//!
//! Landmark coordinates are normalized to `[0.0, 1.0]` relative to the frame;
//! fingertip coordinates handed to the classifier are in image pixels.

pub mod gesture;
pub mod landmark;
pub mod point;
pub mod recording;

pub use gesture::*;
pub use landmark::*;
pub use point::*;
pub use recording::*;

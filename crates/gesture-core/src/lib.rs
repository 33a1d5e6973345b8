//! HandMouse Gesture Core
//!
//! Turns hand landmarks into pointer decisions:
//! - **Geometry:** Euclidean distance between fingertip points
//! - **Classifier:** Fixed, ordered threshold rules mapping five fingertips to one action
//! - **Cursor:** Normalized wrist position to screen pixels, with optional smoothing
//! - **Selection:** Which of several detected hands drive the pointer
//!
//! This crate is pure computation: no I/O, no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod classifier;
pub mod cursor;
pub mod geometry;
pub mod selection;

pub use classifier::{GestureClassifier, ThresholdMode, Thresholds};
pub use cursor::{map_to_screen, CursorMapper};
pub use geometry::distance;
pub use selection::HandPolicy;

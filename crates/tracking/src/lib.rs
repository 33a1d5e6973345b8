//! HandMouse Tracking
//!
//! Runs the real-time hand tracking loop: frames come from a camera (or a
//! recording), a landmark provider finds hands, the gesture core decides
//! what each hand does, and a dispatcher injects the resulting pointer
//! actions.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        FrameLoop                          │
//! │  ┌─────────────┐   ┌──────────────────┐   ┌────────────┐  │
//! │  │ FrameSource │──▶│ LandmarkProvider │──▶│ HandPolicy │  │
//! │  │ (ffmpeg)    │   │ (detector proc)  │   └─────┬──────┘  │
//! │  └─────────────┘   └──────────────────┘         │         │
//! │                                                 ▼         │
//! │  ┌─────────┐   ┌──────────────────┐   ┌──────────────────┐│
//! │  │ Overlay │◀──│ ActionDispatcher │◀──│ Classifier/Mapper││
//! │  └─────────┘   └──────────────────┘   └──────────────────┘│
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod detector;
pub mod frame;
pub mod keys;
pub mod overlay;
pub mod recorder;
pub mod replay;
pub mod session;
pub mod source;

pub use detector::{LandmarkProvider, SubprocessDetector};
pub use frame::Frame;
pub use keys::{KeySource, KeyboardOverlay, TerminalKeys};
pub use overlay::{NullOverlay, Overlay, SnapshotOverlay};
pub use recorder::LandmarkRecorder;
pub use replay::{load_recording, replay, ReplayDetector, ReplaySource};
pub use session::*;
pub use source::{FfmpegCamera, FrameSource, RawVideoSource};

//! Replaying recorded landmark sessions through the frame loop.

use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};

use handmouse_common::error::{HandmouseError, HandmouseResult};
use handmouse_gesture_model::landmark::HandLandmarks;
use handmouse_gesture_model::recording::{parse_recording, RecordedFrame, Recording};

use crate::detector::LandmarkProvider;
use crate::frame::Frame;
use crate::source::FrameSource;

/// Load a recording from disk.
pub fn load_recording(path: &Path) -> HandmouseResult<Recording> {
    if !path.exists() {
        return Err(HandmouseError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_recording(&content).map_err(|e| {
        HandmouseError::recording(format!("Failed to parse {}: {e}", path.display()))
    })
}

/// Split a recording into a frame source and a matching detector.
pub fn replay(recording: Recording) -> (ReplaySource, ReplayDetector) {
    let mut frames = VecDeque::with_capacity(recording.frames.len());
    let mut hands = VecDeque::with_capacity(recording.frames.len());

    for RecordedFrame {
        seq,
        timestamp_ns,
        width,
        height,
        hands: frame_hands,
    } in recording.frames
    {
        frames.push_back(Frame::blank(seq, timestamp_ns, width, height));
        hands.push_back((seq, frame_hands));
    }

    (
        ReplaySource {
            frames,
            realtime: false,
            started: None,
        },
        ReplayDetector { hands },
    )
}

/// Yields the recorded frames (dimensions and timing only).
pub struct ReplaySource {
    frames: VecDeque<Frame>,
    realtime: bool,
    started: Option<(Instant, u64)>,
}

impl ReplaySource {
    /// Sleep between frames to match recorded timestamps.
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ReplaySource {
    fn next_frame(&mut self) -> HandmouseResult<Option<Frame>> {
        let Some(frame) = self.frames.pop_front() else {
            return Ok(None);
        };

        if self.realtime {
            let (wall_start, first_ns) = *self
                .started
                .get_or_insert_with(|| (Instant::now(), frame.timestamp_ns));
            let due = Duration::from_nanos(frame.timestamp_ns.saturating_sub(first_ns));
            let elapsed = wall_start.elapsed();
            if due > elapsed {
                std::thread::sleep(due - elapsed);
            }
        }

        Ok(Some(frame))
    }

    fn name(&self) -> &str {
        "replay"
    }
}

/// Returns the recorded hands in recording order.
///
/// Frames are matched by position, so a recording that repeats a sequence
/// number still replays every frame's hands.
pub struct ReplayDetector {
    hands: VecDeque<(u64, Vec<HandLandmarks>)>,
}

impl LandmarkProvider for ReplayDetector {
    fn detect(&mut self, frame: &Frame) -> HandmouseResult<Vec<HandLandmarks>> {
        match self.hands.front() {
            Some((seq, _)) if *seq == frame.seq => {
                Ok(self.hands.pop_front().map(|(_, hands)| hands).unwrap_or_default())
            }
            _ => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &str {
        "replay"
    }
}

//! Append-only landmark recorder.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use handmouse_common::error::{HandmouseError, HandmouseResult};
use handmouse_gesture_model::landmark::HandLandmarks;
use handmouse_gesture_model::recording::{RecordedFrame, RecordingHeader, RECORDING_SCHEMA_VERSION};

use crate::frame::Frame;

/// Writes detected hands per frame to a JSONL recording.
pub struct LandmarkRecorder {
    writer: BufWriter<File>,
    path: PathBuf,
    frames_written: u64,
}

impl LandmarkRecorder {
    /// Create a recording, writing the header as the first line.
    pub fn create(path: impl AsRef<Path>, header: RecordingHeader) -> HandmouseResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);

        let header_json = serde_json::to_string(&header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| HandmouseError::recording(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            path,
            frames_written: 0,
        })
    }

    /// Header for a new recording of the given frame size.
    pub fn header(epoch_wall: &str, width: u32, height: u32, mirrored: bool) -> RecordingHeader {
        RecordingHeader {
            schema_version: RECORDING_SCHEMA_VERSION.to_string(),
            epoch_wall: epoch_wall.to_string(),
            frame_width: width,
            frame_height: height,
            mirrored,
        }
    }

    pub fn write_frame(&mut self, frame: &Frame, hands: &[HandLandmarks]) -> HandmouseResult<()> {
        let record = RecordedFrame {
            seq: frame.seq,
            timestamp_ns: frame.timestamp_ns,
            width: frame.width,
            height: frame.height,
            hands: hands.to_vec(),
        };
        let json = serde_json::to_string(&record)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| HandmouseError::recording(format!("Failed to write frame: {e}")))?;
        self.frames_written += 1;

        // Roughly every few seconds at camera rate.
        if self.frames_written % 120 == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> HandmouseResult<()> {
        self.writer
            .flush()
            .map_err(|e| HandmouseError::recording(format!("Failed to flush recording: {e}")))
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LandmarkRecorder {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handmouse_gesture_model::landmark::Landmark;
    use handmouse_gesture_model::recording::parse_recording;

    #[test]
    fn test_recorder_output_parses_back() {
        let dir = std::env::temp_dir().join("handmouse_test_recorder");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("landmarks.jsonl");

        let hand = HandLandmarks::new(vec![Landmark::new(0.25, 0.75); 21]);
        {
            let header = LandmarkRecorder::header("2026-01-01T00:00:00Z", 640, 480, true);
            let mut recorder = LandmarkRecorder::create(&path, header).unwrap();
            recorder
                .write_frame(&Frame::blank(0, 0, 640, 480), &[hand.clone()])
                .unwrap();
            recorder
                .write_frame(&Frame::blank(1, 33_000_000, 640, 480), &[])
                .unwrap();
            assert_eq!(recorder.frames_written(), 2);
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# "));

        let recording = parse_recording(&content).unwrap();
        let header = recording.header.unwrap();
        assert_eq!((header.frame_width, header.frame_height), (640, 480));
        assert!(header.mirrored);
        assert_eq!(recording.frames.len(), 2);
        assert_eq!(recording.frames[0].hands, vec![hand]);
        assert_eq!(recording.frames[1].timestamp_ns, 33_000_000);

        std::fs::remove_dir_all(&dir).ok();
    }
}

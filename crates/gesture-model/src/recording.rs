//! Landmark recordings.
//!
//! A recording is a JSONL file: the first line is `# ` followed by the
//! header JSON, then one [`RecordedFrame`] per line. Recordings let a
//! session be replayed through the classifier without a camera.

use serde::{Deserialize, Serialize};

use crate::landmark::HandLandmarks;

/// Current recording schema version.
pub const RECORDING_SCHEMA_VERSION: &str = "1.0";

/// Metadata written as the first line of a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at recording start (RFC 3339).
    pub epoch_wall: String,

    /// Frame dimensions at recording start.
    pub frame_width: u32,
    pub frame_height: u32,

    /// Whether frames were mirrored before detection.
    #[serde(default)]
    pub mirrored: bool,
}

/// Detector output for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Frame sequence number.
    pub seq: u64,

    /// Monotonic nanoseconds since recording start.
    #[serde(rename = "t")]
    pub timestamp_ns: u64,

    /// Frame dimensions in pixels.
    pub width: u32,
    pub height: u32,

    /// Hands reported by the detector.
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
}

/// A parsed recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub header: Option<RecordingHeader>,
    pub frames: Vec<RecordedFrame>,
}

/// Parse a recording from JSONL content.
///
/// The header line is optional; blank lines and other `#` lines are skipped.
pub fn parse_recording(jsonl: &str) -> Result<Recording, serde_json::Error> {
    let mut header = None;
    let mut frames = Vec::new();

    for line in jsonl.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if header.is_none() {
                if let Ok(parsed) = serde_json::from_str::<RecordingHeader>(comment.trim()) {
                    header = Some(parsed);
                }
            }
            continue;
        }
        frames.push(serde_json::from_str(line)?);
    }

    Ok(Recording { header, frames })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Landmark;

    fn serialize_frames(frames: &[RecordedFrame]) -> Result<String, serde_json::Error> {
        let mut output = String::new();
        for frame in frames {
            output.push_str(&serde_json::to_string(frame)?);
            output.push('\n');
        }
        Ok(output)
    }

    fn frame(seq: u64, hands: usize) -> RecordedFrame {
        RecordedFrame {
            seq,
            timestamp_ns: seq * 33_000_000,
            width: 640,
            height: 480,
            hands: (0..hands)
                .map(|_| HandLandmarks::new(vec![Landmark::new(0.5, 0.5); 21]))
                .collect(),
        }
    }

    #[test]
    fn test_parse_with_header() {
        let header = RecordingHeader {
            schema_version: RECORDING_SCHEMA_VERSION.to_string(),
            epoch_wall: "2026-01-01T00:00:00Z".to_string(),
            frame_width: 640,
            frame_height: 480,
            mirrored: true,
        };
        let body = serialize_frames(&[frame(0, 1), frame(1, 0)]).unwrap();
        let jsonl = format!("# {}\n{body}", serde_json::to_string(&header).unwrap());

        let parsed = parse_recording(&jsonl).unwrap();
        assert_eq!(parsed.header, Some(header));
        assert_eq!(parsed.frames.len(), 2);
        assert_eq!(parsed.frames[0].hands.len(), 1);
        assert!(parsed.frames[1].hands.is_empty());
    }

    #[test]
    fn test_parse_without_header_skips_comments() {
        let jsonl = "# hand-written fixture\n\n{\"seq\":3,\"t\":0,\"width\":320,\"height\":240}\n";
        let parsed = parse_recording(jsonl).unwrap();
        assert_eq!(parsed.header, None);
        assert_eq!(parsed.frames.len(), 1);
        assert_eq!(parsed.frames[0].seq, 3);
        assert!(parsed.frames[0].hands.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_frame() {
        assert!(parse_recording("{\"seq\":\"zero\"}").is_err());
    }

    #[test]
    fn test_json_format_uses_short_timestamp_key() {
        let json = serde_json::to_string(&frame(2, 0)).unwrap();
        assert!(json.contains("\"t\":66000000"));
        assert!(json.contains("\"seq\":2"));
    }
}

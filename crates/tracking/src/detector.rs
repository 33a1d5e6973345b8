//! Landmark providers.
//!
//! The shipped provider drives an external detector process (for example a
//! MediaPipe script) over stdin/stdout:
//!
//! 1. The process prints `READY` once its model is loaded.
//! 2. Per frame it receives three little-endian `u32` values
//!    (`width`, `height`, `channels = 3`) followed by the RGB bytes.
//! 3. It answers with one JSON line: `{"hands":[...],"error":null}`.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};

use handmouse_common::config::DetectorConfig;
use handmouse_common::error::{HandmouseError, HandmouseResult};
use handmouse_gesture_model::landmark::HandLandmarks;

use crate::frame::Frame;

/// Line the detector prints once it accepts frames.
pub const READY_LINE: &str = "READY";

/// Detects hands in a frame.
///
/// A `Detection` error means this frame could not be analysed; any other
/// error means the provider is gone.
pub trait LandmarkProvider: Send {
    fn detect(&mut self, frame: &Frame) -> HandmouseResult<Vec<HandLandmarks>>;

    fn name(&self) -> &str;
}

/// One detector reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectorResponse {
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,

    #[serde(default)]
    pub error: Option<String>,
}

/// Parse a reply line into the hands it reports.
pub fn parse_response(line: &str) -> HandmouseResult<Vec<HandLandmarks>> {
    let response: DetectorResponse = serde_json::from_str(line.trim())
        .map_err(|e| HandmouseError::detection(format!("malformed detector reply: {e}")))?;

    match response.error {
        Some(message) => Err(HandmouseError::detection(message)),
        None => Ok(response.hands),
    }
}

/// Write one frame request: `width`, `height`, `channels` as LE `u32`, then pixels.
pub fn write_request<W: Write>(
    writer: &mut W,
    width: u32,
    height: u32,
    rgb: &[u8],
) -> std::io::Result<()> {
    writer.write_all(&width.to_le_bytes())?;
    writer.write_all(&height.to_le_bytes())?;
    writer.write_all(&3u32.to_le_bytes())?;
    writer.write_all(rgb)?;
    writer.flush()
}

/// Detector running as a child process.
pub struct SubprocessDetector {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    min_confidence: f32,
    line: String,
}

impl SubprocessDetector {
    /// Spawn the detector and wait for its `READY` line.
    pub fn spawn(config: &DetectorConfig) -> HandmouseResult<Self> {
        tracing::info!(command = %config.command, args = ?config.args, "Starting detector");

        let mut child = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                HandmouseError::detection(format!(
                    "Failed to spawn detector '{}': {e}",
                    config.command
                ))
            })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(HandmouseError::detection("detector pipes unavailable"));
            }
        };

        let mut detector = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            min_confidence: config.min_confidence,
            line: String::new(),
        };
        detector.wait_ready()?;
        Ok(detector)
    }

    fn wait_ready(&mut self) -> HandmouseResult<()> {
        loop {
            self.line.clear();
            let n = self
                .stdout
                .read_line(&mut self.line)
                .map_err(|e| HandmouseError::detection(format!("detector read failed: {e}")))?;
            if n == 0 {
                return Err(HandmouseError::detection(
                    "detector exited before reporting READY",
                ));
            }
            if self.line.trim() == READY_LINE {
                tracing::info!("Detector ready");
                return Ok(());
            }
            tracing::debug!(line = %self.line.trim(), "Detector startup output");
        }
    }
}

impl LandmarkProvider for SubprocessDetector {
    fn detect(&mut self, frame: &Frame) -> HandmouseResult<Vec<HandLandmarks>> {
        let rgb = frame
            .rgb_bytes()
            .ok_or_else(|| HandmouseError::detection("frame has no pixels"))?;

        write_request(&mut self.stdin, frame.width, frame.height, rgb)
            .map_err(|e| HandmouseError::capture(format!("detector input closed: {e}")))?;

        self.line.clear();
        let n = self
            .stdout
            .read_line(&mut self.line)
            .map_err(|e| HandmouseError::capture(format!("detector output failed: {e}")))?;
        if n == 0 {
            return Err(HandmouseError::capture("detector closed its output"));
        }

        let min_confidence = self.min_confidence;
        let hands = parse_response(&self.line)?
            .into_iter()
            .filter(|hand| hand.score >= min_confidence)
            .collect();
        Ok(hands)
    }

    fn name(&self) -> &str {
        "subprocess"
    }
}

impl Drop for SubprocessDetector {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        tracing::debug!("Detector released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_with_hand() {
        let landmarks: Vec<String> = (0..21)
            .map(|i| format!(r#"{{"x":{},"y":0.5,"z":0.0}}"#, i as f64 / 40.0))
            .collect();
        let line = format!(
            r#"{{"hands":[{{"handedness":"Right","score":0.97,"landmarks":[{}]}}],"error":null}}"#,
            landmarks.join(",")
        );

        let hands = parse_response(&line).unwrap();
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].landmarks.len(), 21);
        assert_eq!(hands[0].handedness.as_deref(), Some("Right"));
        assert!((hands[0].score - 0.97).abs() < 1e-6);
    }

    #[test]
    fn test_parse_response_empty() {
        assert!(parse_response(r#"{"hands":[],"error":null}"#)
            .unwrap()
            .is_empty());
        assert!(parse_response("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_response_errors_are_detection_failures() {
        let err = parse_response("not json").unwrap_err();
        assert!(matches!(err, HandmouseError::Detection { .. }));

        let err = parse_response(r#"{"hands":[],"error":"model crashed"}"#).unwrap_err();
        assert!(err.to_string().contains("model crashed"));
    }

    #[test]
    fn test_write_request_layout() {
        let mut buf = Vec::new();
        write_request(&mut buf, 2, 1, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(&buf[0..4], &2u32.to_le_bytes());
        assert_eq!(&buf[4..8], &1u32.to_le_bytes());
        assert_eq!(&buf[8..12], &3u32.to_le_bytes());
        assert_eq!(&buf[12..], &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_spawn_fails_when_detector_exits_early() {
        let config = DetectorConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), "echo loading; exit 0".to_string()],
            min_confidence: 0.5,
        };
        let err = SubprocessDetector::spawn(&config).err().unwrap();
        assert!(matches!(err, HandmouseError::Detection { .. }));
    }

    #[test]
    fn test_spawn_missing_command() {
        let config = DetectorConfig {
            command: "/nonexistent/handmouse-detector".to_string(),
            args: Vec::new(),
            min_confidence: 0.5,
        };
        assert!(SubprocessDetector::spawn(&config).is_err());
    }
}

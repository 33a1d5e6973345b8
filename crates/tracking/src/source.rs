//! Frame sources.
//!
//! The camera is read through an `ffmpeg` child process that decodes the
//! V4L2 device into packed `bgr24` frames on stdout.

use std::io::{ErrorKind, Read};
use std::process::{Child, ChildStdout, Command, Stdio};

use handmouse_common::clock::FrameClock;
use handmouse_common::config::CameraConfig;
use handmouse_common::error::{HandmouseError, HandmouseResult};

use crate::frame::{frame_len, Frame};

/// Produces frames for the tracking loop.
///
/// `Ok(None)` means the stream ended normally; `Err` is a capture failure.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> HandmouseResult<Option<Frame>>;

    fn name(&self) -> &str;
}

/// Reads fixed-size `bgr24` frames from any byte stream.
pub struct RawVideoSource<R: Read + Send> {
    reader: R,
    width: u32,
    height: u32,
    mirror: bool,
    seq: u64,
    clock: FrameClock,
}

impl<R: Read + Send> RawVideoSource<R> {
    pub fn new(reader: R, width: u32, height: u32, mirror: bool) -> Self {
        Self {
            reader,
            width,
            height,
            mirror,
            seq: 0,
            clock: FrameClock::start(),
        }
    }

    /// Fill `buf` completely. Returns `false` on EOF before the first byte.
    fn read_frame(&mut self, buf: &mut [u8]) -> HandmouseResult<bool> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) if filled == 0 => return Ok(false),
                Ok(0) => {
                    return Err(HandmouseError::capture(format!(
                        "stream ended mid-frame ({filled} of {} bytes)",
                        buf.len()
                    )))
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(HandmouseError::capture(format!("read failed: {e}"))),
            }
        }
        Ok(true)
    }
}

impl<R: Read + Send> FrameSource for RawVideoSource<R> {
    fn next_frame(&mut self) -> HandmouseResult<Option<Frame>> {
        let mut buf = vec![0u8; frame_len(self.width, self.height)];
        if !self.read_frame(&mut buf)? {
            return Ok(None);
        }

        let frame = Frame::from_bgr(
            self.seq,
            self.clock.elapsed_ns(),
            self.width,
            self.height,
            buf,
            self.mirror,
        )?;
        self.seq += 1;
        Ok(Some(frame))
    }

    fn name(&self) -> &str {
        "raw-video"
    }
}

/// Webcam capture via an `ffmpeg` subprocess.
///
/// The child is killed and reaped when the camera is dropped.
pub struct FfmpegCamera {
    child: Child,
    source: RawVideoSource<ChildStdout>,
    device: String,
}

impl FfmpegCamera {
    pub fn open(config: &CameraConfig) -> HandmouseResult<Self> {
        let device = format!("/dev/video{}", config.device_index);
        let args = ffmpeg_args(&device, config.width, config.height);

        tracing::info!(
            device = %device,
            width = config.width,
            height = config.height,
            "Opening camera"
        );

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| HandmouseError::capture(format!("Failed to spawn ffmpeg: {e}")))?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(HandmouseError::capture("ffmpeg stdout unavailable"));
            }
        };

        Ok(Self {
            child,
            source: RawVideoSource::new(stdout, config.width, config.height, config.mirror),
            device,
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

impl FrameSource for FfmpegCamera {
    fn next_frame(&mut self) -> HandmouseResult<Option<Frame>> {
        // A live camera never ends on its own.
        match self.source.next_frame()? {
            Some(frame) => Ok(Some(frame)),
            None => Err(HandmouseError::capture(format!(
                "camera stream {} closed",
                self.device
            ))),
        }
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

impl Drop for FfmpegCamera {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        tracing::debug!(device = %self.device, "Camera released");
    }
}

/// `ffmpeg` arguments for reading a V4L2 device as raw `bgr24`.
pub fn ffmpeg_args(device: &str, width: u32, height: u32) -> Vec<String> {
    let size = format!("{width}x{height}");
    [
        "-hide_banner",
        "-loglevel",
        "error",
        "-f",
        "v4l2",
        "-video_size",
        &size,
        "-i",
        device,
        "-f",
        "rawvideo",
        "-pix_fmt",
        "bgr24",
        "-",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

//! Captured camera frames.

use image::RgbImage;

use handmouse_common::error::{HandmouseError, HandmouseResult};

/// One frame handed to the detector and the overlay.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Sequence number, starting at 0.
    pub seq: u64,

    /// Monotonic nanoseconds since the source started.
    pub timestamp_ns: u64,

    pub width: u32,
    pub height: u32,

    /// RGB pixels. `None` for sources that carry no imagery (replays).
    pub image: Option<RgbImage>,
}

impl Frame {
    /// Build a frame from packed `bgr24` bytes, converting to RGB and
    /// optionally mirroring horizontally.
    pub fn from_bgr(
        seq: u64,
        timestamp_ns: u64,
        width: u32,
        height: u32,
        mut bgr: Vec<u8>,
        mirror: bool,
    ) -> HandmouseResult<Self> {
        let expected = frame_len(width, height);
        if bgr.len() != expected {
            return Err(HandmouseError::capture(format!(
                "frame buffer is {} bytes, expected {expected} for {width}x{height}",
                bgr.len()
            )));
        }

        bgr_to_rgb_in_place(&mut bgr);
        let mut image = RgbImage::from_raw(width, height, bgr)
            .ok_or_else(|| HandmouseError::capture("frame buffer does not match dimensions"))?;
        if mirror {
            image::imageops::flip_horizontal_in_place(&mut image);
        }

        Ok(Self {
            seq,
            timestamp_ns,
            width,
            height,
            image: Some(image),
        })
    }

    /// A frame with dimensions only.
    pub fn blank(seq: u64, timestamp_ns: u64, width: u32, height: u32) -> Self {
        Self {
            seq,
            timestamp_ns,
            width,
            height,
            image: None,
        }
    }

    /// Raw RGB bytes, row-major.
    pub fn rgb_bytes(&self) -> Option<&[u8]> {
        self.image.as_ref().map(|img| img.as_raw().as_slice())
    }
}

/// Byte length of a packed 3-channel frame.
pub fn frame_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

/// Swap the first and third channel of every pixel.
pub fn bgr_to_rgb_in_place(buf: &mut [u8]) {
    for px in buf.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgr_conversion() {
        let mut buf = vec![1, 2, 3, 4, 5, 6];
        bgr_to_rgb_in_place(&mut buf);
        assert_eq!(buf, vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_from_bgr_mirrors() {
        // 2x1: left pixel pure blue, right pixel pure red (BGR order).
        let bgr = vec![255, 0, 0, 0, 0, 255];
        let frame = Frame::from_bgr(0, 0, 2, 1, bgr.clone(), false).unwrap();
        let img = frame.image.as_ref().unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [255, 0, 0]);

        let mirrored = Frame::from_bgr(0, 0, 2, 1, bgr, true).unwrap();
        let img = mirrored.image.as_ref().unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 255]);
    }

    #[test]
    fn test_from_bgr_rejects_short_buffer() {
        let err = Frame::from_bgr(0, 0, 4, 4, vec![0; 10], false).unwrap_err();
        assert!(matches!(err, HandmouseError::Capture { .. }));
    }

    #[test]
    fn test_blank_has_no_pixels() {
        let frame = Frame::blank(3, 10, 640, 480);
        assert!(frame.rgb_bytes().is_none());
    }
}

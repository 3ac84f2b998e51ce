use chrono::{DateTime, Utc};
use image::RgbaImage;

/// A single point-in-time snapshot from the capture device.
///
/// Frames are cloned out of the source on grab and owned by the cycle
/// that captured them; they are never retained across cycles.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbaImage,
    captured_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            captured_at: Utc::now(),
        }
    }

    /// Builds a frame from a raw RGBA buffer (row-major, 4 bytes per
    /// pixel). Returns `None` when the buffer does not match the
    /// dimensions.
    pub fn from_raw(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, rgba).map(Self::new)
    }

    /// (width, height) in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_mismatched_buffer() {
        assert!(Frame::from_raw(4, 4, vec![0; 4 * 4 * 4]).is_some());
        assert!(Frame::from_raw(4, 4, vec![0; 7]).is_none());
    }

    #[test]
    fn dimensions_match_image() {
        let frame = Frame::new(RgbaImage::new(8, 6));
        assert_eq!(frame.dimensions(), (8, 6));
    }
}

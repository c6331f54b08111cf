//! Owned RGB frame type.
//!
//! A `Frame` is a single image read from a frame source. It lives for one
//! loop iteration unless the capture workflow persists it as a JPEG.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::RgbImage;

/// One video frame: tightly packed row-major RGB8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Wrap raw RGB8 pixel data. The buffer length must be `width * height * 3`.
    pub fn from_rgb8(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if data.len() != expected {
            return Err(anyhow!(
                "expected {} RGB bytes for {}x{}, received {}",
                expected,
                width,
                height,
                data.len()
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Read-only view of the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Encode this frame as a JPEG at `path`.
    ///
    /// The parent directory must already exist; the workflow does not create
    /// it (the invoking binary does).
    pub fn save_jpeg<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let img = self.to_image();
        img.save(path)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// Convert to an `image::RgbImage` (copies the pixel buffer).
    pub fn to_image(&self) -> RgbImage {
        // Length was validated at construction, from_raw cannot fail here.
        RgbImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }

    /// Deterministic test-pattern frame. Pixel values mix position and a
    /// caller-supplied seed so distinct seeds produce distinct frames.
    pub fn test_pattern(width: u32, height: u32, seed: u64) -> Self {
        let len = (width * height * 3) as usize;
        let mut data = vec![0u8; len];
        for (i, px) in data.iter_mut().enumerate() {
            *px = ((i as u64).wrapping_add(seed) % 256) as u8;
        }
        Self {
            data,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer_length() {
        let err = Frame::from_rgb8(vec![0u8; 10], 2, 2);
        assert!(err.is_err());
    }

    #[test]
    fn accepts_exact_buffer_length() -> Result<()> {
        let frame = Frame::from_rgb8(vec![0u8; 2 * 2 * 3], 2, 2)?;
        assert_eq!(frame.pixels().len(), 12);
        Ok(())
    }

    #[test]
    fn test_pattern_is_deterministic() {
        let a = Frame::test_pattern(8, 8, 7);
        let b = Frame::test_pattern(8, 8, 7);
        let c = Frame::test_pattern(8, 8, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn saves_jpeg_to_disk() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("frame.jpg");
        let frame = Frame::test_pattern(16, 16, 0);
        frame.save_jpeg(&path)?;
        assert!(path.exists());
        Ok(())
    }
}

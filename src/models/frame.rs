use crate::error::{LaserError, Result};
use image::RgbaImage;

/// Bytes per pixel in a camera frame (interleaved RGBA)
pub const FRAME_CHANNELS: usize = 4;

/// Immutable snapshot of a single camera image in interleaved RGBA8
///
/// Produced by the capture side once per tick. The pipeline only ever reads
/// from it; all processing happens on a [`PixelBuffer`](super::PixelBuffer)
/// copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap raw RGBA bytes, checking the length against the dimensions
    ///
    /// Zero-sized frames are accepted here; the pipeline reports them as
    /// "no result" rather than failing construction.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(FRAME_CHANNELS))
            .ok_or(LaserError::BufferSize {
                expected: usize::MAX,
                actual: data.len(),
            })?;
        if data.len() != expected {
            return Err(LaserError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame where every pixel has the same RGBA value
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width * height * FRAME_CHANNELS);
        for _ in 0..width * height {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a frame by evaluating `f(x, y)` for every pixel
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> [u8; 4],
    {
        let mut data = Vec::with_capacity(width * height * FRAME_CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Copy an `image` crate RGBA image into a frame
    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        Self {
            width: img.width() as usize,
            height: img.height() as usize,
            data: img.as_raw().clone(),
        }
    }

    /// Frame width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of `count` consecutive rows starting at `y`
    pub fn rows(&self, y: usize, count: usize) -> &[u8] {
        let stride = self.width * FRAME_CHANNELS;
        let start = (y * stride).min(self.data.len());
        let end = ((y + count) * stride).min(self.data.len());
        &self.data[start..end]
    }

    /// RGBA value at (x, y), `None` outside the frame
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * FRAME_CHANNELS;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }
}

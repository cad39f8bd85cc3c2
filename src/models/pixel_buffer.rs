use super::frame::{FRAME_CHANNELS, Frame};
use crate::error::{LaserError, Result};
use image::RgbaImage;

/// Sample layout of a [`PixelBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Interleaved R, G, B, A (same layout as a camera [`Frame`])
    Rgba8,
    /// Single luminance channel
    Gray8,
}

impl PixelFormat {
    /// Samples per pixel
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Gray8 => 1,
        }
    }

    /// Leading samples per pixel that carry color (alpha excluded)
    pub const fn color_channels(self) -> usize {
        match self {
            PixelFormat::Rgba8 => 3,
            PixelFormat::Gray8 => 1,
        }
    }
}

/// Mutable working image that every pipeline stage operates on
///
/// Always created as a copy of (part of) a [`Frame`] or taken from a
/// [`BufferPool`](crate::utils::memory_pool::BufferPool), so stages can write
/// in place without touching the source frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zero-filled buffer
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            data: vec![0; width * height * format.channels()],
        }
    }

    /// Wrap existing samples, checking the length
    pub fn from_raw(
        width: usize,
        height: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self> {
        let expected = width * height * format.channels();
        if data.len() != expected {
            return Err(LaserError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Copy a whole frame into a new RGBA buffer
    pub fn from_frame(frame: &Frame) -> Self {
        Self::from_frame_rows(frame, 0, frame.height())
    }

    /// Copy `rows` rows of a frame starting at `y` into a new RGBA buffer
    ///
    /// The row range is clipped to the frame.
    pub fn from_frame_rows(frame: &Frame, y: usize, rows: usize) -> Self {
        let mut buffer = Self {
            width: 0,
            height: 0,
            format: PixelFormat::Rgba8,
            data: Vec::new(),
        };
        buffer.copy_frame_rows(frame, y, rows);
        buffer
    }

    /// Overwrite this buffer with a row range of `frame`, reusing the allocation
    pub fn copy_frame_rows(&mut self, frame: &Frame, y: usize, rows: usize) {
        let y = y.min(frame.height());
        let rows = rows.min(frame.height() - y);
        let src = frame.rows(y, rows);
        self.width = frame.width();
        self.height = rows;
        self.format = PixelFormat::Rgba8;
        self.data.clear();
        self.data.extend_from_slice(src);
    }

    /// Change the dimensions, keeping the allocation when it is large enough
    ///
    /// Sample contents after a reshape are unspecified.
    pub fn reshape(&mut self, width: usize, height: usize, format: PixelFormat) {
        self.width = width;
        self.height = height;
        self.format = format;
        self.data.resize(width * height * format.channels(), 0);
    }

    /// Buffer width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Buffer height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel format
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Samples per pixel
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// True when the buffer holds no pixels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Allocated capacity in bytes
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Raw samples
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Raw samples, mutable
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return its samples
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Sample offset of pixel (x, y)
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.format.channels()
    }

    /// Sample `c` of pixel (x, y); 0 outside the buffer
    pub fn get(&self, x: usize, y: usize, c: usize) -> u8 {
        if x >= self.width || y >= self.height || c >= self.channels() {
            return 0;
        }
        self.data[self.index(x, y) + c]
    }

    /// Set sample `c` of pixel (x, y); ignored outside the buffer
    pub fn set(&mut self, x: usize, y: usize, c: usize, value: u8) {
        if x >= self.width || y >= self.height || c >= self.channels() {
            return;
        }
        let idx = self.index(x, y) + c;
        self.data[idx] = value;
    }

    /// Write `value` to every color channel of pixel (x, y), leaving alpha alone
    pub fn set_color(&mut self, x: usize, y: usize, value: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        let colors = self.format.color_channels();
        self.data[idx..idx + colors].fill(value);
    }

    /// True when every color sample is either 0 or 255
    pub fn is_binary(&self) -> bool {
        let channels = self.channels();
        let colors = self.format.color_channels();
        self.data
            .chunks_exact(channels)
            .all(|px| px[..colors].iter().all(|&v| v == 0 || v == 255))
    }

    /// Convert to an `image` crate RGBA image (gray is expanded, alpha 255)
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        let data = match self.format {
            PixelFormat::Rgba8 => self.data.clone(),
            PixelFormat::Gray8 => {
                let mut out = Vec::with_capacity(self.pixel_count() * FRAME_CHANNELS);
                for &v in &self.data {
                    out.extend_from_slice(&[v, v, v, 255]);
                }
                out
            }
        };
        RgbaImage::from_raw(self.width as u32, self.height as u32, data)
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new(0, 0, PixelFormat::Rgba8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_is_independent_of_frame() {
        let frame = Frame::filled(4, 4, [10, 20, 30, 255]);
        let mut buf = PixelBuffer::from_frame(&frame);
        buf.set_color(1, 1, 0);
        assert_eq!(buf.get(1, 1, 0), 0);
        assert_eq!(buf.get(1, 1, 3), 255);
        assert_eq!(frame.pixel(1, 1), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_from_frame_rows_clips() {
        let frame = Frame::from_fn(2, 5, |_, y| [y as u8, 0, 0, 255]);
        let buf = PixelBuffer::from_frame_rows(&frame, 3, 10);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.get(0, 0, 0), 3);
        assert_eq!(buf.get(1, 1, 0), 4);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut buf = PixelBuffer::new(2, 2, PixelFormat::Gray8);
        buf.set(5, 5, 0, 9); // Should not panic
        assert_eq!(buf.get(5, 5, 0), 0);
        assert_eq!(buf.get(0, 0, 3), 0);
    }

    #[test]
    fn test_is_binary() {
        let mut buf = PixelBuffer::from_frame(&Frame::filled(2, 1, [255, 255, 255, 17]));
        assert!(buf.is_binary());
        buf.set(0, 0, 1, 128);
        assert!(!buf.is_binary());
    }

    #[test]
    fn test_reshape_keeps_capacity() {
        let mut buf = PixelBuffer::new(100, 100, PixelFormat::Rgba8);
        let cap = buf.capacity();
        buf.reshape(10, 10, PixelFormat::Gray8);
        assert_eq!(buf.as_bytes().len(), 100);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn test_gray_to_rgba_image() {
        let buf = PixelBuffer::from_raw(2, 1, PixelFormat::Gray8, vec![0, 200]).unwrap();
        let img = buf.to_rgba_image().unwrap();
        assert_eq!(img.get_pixel(1, 0).0, [200, 200, 200, 255]);
        assert!(PixelBuffer::from_raw(2, 2, PixelFormat::Gray8, vec![0; 3]).is_err());
    }
}

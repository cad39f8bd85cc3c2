//! Laser-style scan line extraction
//!
//! A handheld laser scanner reads one thin horizontal sweep. This module
//! cuts several such sweeps out of a frame, around its vertical center.

use crate::models::{Frame, PixelBuffer, ScanRegion};

/// Rows per extracted line
pub const DEFAULT_LINE_HEIGHT: usize = 3;

/// Vertical offsets from the frame center, in extraction order
pub const DEFAULT_OFFSETS: [isize; 7] = [0, -50, 50, -100, 100, -150, 150];

/// Cuts thin full-width strips at fixed offsets from the frame center
pub struct ScanLineExtractor {
    line_height: usize,
    offsets: Vec<isize>,
}

impl ScanLineExtractor {
    /// Extractor with custom line height and center offsets
    pub fn new(line_height: usize, offsets: Vec<isize>) -> Self {
        Self {
            line_height: line_height.max(1),
            offsets,
        }
    }

    /// Rows per extracted strip
    pub fn line_height(&self) -> usize {
        self.line_height
    }

    /// Cut one strip per offset, each clamped into [0, H - line_height]
    ///
    /// Strips are full-width RGBA copies with alpha forced to 255. Frames
    /// shorter than one line (or with no columns) yield nothing.
    pub fn extract_lines(&self, frame: &Frame) -> Vec<ScanRegion> {
        let height = frame.height();
        if frame.width() == 0 || height < self.line_height {
            return Vec::new();
        }

        let center = (height / 2) as isize;
        let max_y = (height - self.line_height) as isize;

        self.offsets
            .iter()
            .map(|&offset| {
                let offset_y = (center + offset).clamp(0, max_y) as usize;
                let mut data = PixelBuffer::from_frame_rows(frame, offset_y, self.line_height);
                for px in data.as_bytes_mut().chunks_exact_mut(4) {
                    px[3] = 255;
                }
                ScanRegion {
                    offset_y,
                    height: self.line_height,
                    data,
                }
            })
            .collect()
    }
}

impl Default for ScanLineExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_HEIGHT, DEFAULT_OFFSETS.to_vec())
    }
}

use super::PixelBuffer;

/// A horizontal slice of a frame, analysed like one sweep of a laser scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRegion {
    /// Top row of the slice in source-frame coordinates
    pub offset_y: usize,
    /// Slice height in rows
    pub height: usize,
    /// Copied pixels of the slice
    pub data: PixelBuffer,
}

/// Global binarization threshold chosen from a histogram
///
/// `threshold` is the first intensity of the bright class. Otsu's method
/// picks the last intensity t of the dark class, so the stored value is
/// t + 1, one above the split point a textbook Otsu loop reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdResult {
    /// Values below this become black, the rest white
    pub threshold: u8,
}

impl ThresholdResult {
    /// Last intensity that binarizes to black (Otsu's t), `None` for a
    /// threshold of 0
    pub const fn dark_class_max(self) -> Option<u8> {
        self.threshold.checked_sub(1)
    }
}

impl ThresholdResult {
    /// Wrap a threshold value
    pub const fn new(threshold: u8) -> Self {
        Self { threshold }
    }
}

/// Where in a frame a 1D barcode most likely sits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionEstimate {
    /// Column at the center of the strongest edge-energy window
    pub center_x: usize,
    /// Window energy normalized to roughly [0, 1]
    pub confidence: f32,
    /// Whether the window energy cleared the detection threshold
    pub has_barcode: bool,
}

impl RegionEstimate {
    /// Estimate used when nothing could be measured
    pub fn none(width: usize) -> Self {
        Self {
            center_x: width / 2,
            confidence: 0.0,
            has_barcode: false,
        }
    }
}

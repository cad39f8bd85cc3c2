//! Error types for frame handling and the enhancement pipeline.

use thiserror::Error;

/// Everything that can stop a frame from being enhanced.
///
/// None of these are fatal. The pipeline's `run` entry point folds them into
/// "no result this tick"; `try_run` exposes the reason.
#[derive(Debug, Error)]
pub enum LaserError {
    /// Frame has a zero width or height.
    #[error("invalid frame: {width}x{height}")]
    InvalidFrame {
        /// Frame width in pixels
        width: usize,
        /// Frame height in pixels
        height: usize,
    },

    /// Pixel data length does not match the declared dimensions.
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize {
        /// Length implied by the dimensions
        expected: usize,
        /// Length supplied
        actual: usize,
    },

    /// The fast-mode strip rounds down to zero rows.
    #[error("frame of height {height} leaves an empty scan strip")]
    EmptyStrip {
        /// Height of the source frame
        height: usize,
    },

    /// Decoding or encoding an image file failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Reading or writing a file failed.
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LaserError>;

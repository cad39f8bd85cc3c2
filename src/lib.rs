//! laser_enhance - laser-scanner style frame conditioning for 1D barcodes
//!
//! Turns a raw RGBA camera frame into a high-contrast black/white buffer
//! that a barcode decoder can read reliably, imitating how a dedicated laser
//! scanner sees bars and spaces.
//!
//! The crate does no capture, decoding or I/O of its own: a scan loop hands
//! in a [`Frame`] and a [`Mode`] once per tick and receives an [`Enhanced`]
//! buffer (or nothing) back.
//!
//! # Example
//! ```
//! use laser_enhance::{Frame, Mode, Pipeline};
//!
//! let mut pipeline = Pipeline::new();
//! let frame = Frame::filled(640, 480, [128, 128, 128, 255]);
//! if let Some(enhanced) = pipeline.run(&frame, Mode::Fast) {
//!     assert_eq!(enhanced.buffer.height(), 144);
//!     pipeline.recycle(enhanced);
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Tunable constants and environment overrides
pub mod config;
/// Region location and scan line extraction
pub mod detector;
/// Error type shared by the crate
pub mod error;
/// Core data structures (Frame, PixelBuffer, ScanRegion, ...)
pub mod models;
/// Stage orchestration for Full and Fast modes
pub mod pipeline;
/// Tick pacing and skip-while-busy wrappers
pub mod scanner;
/// Image-file helpers for the command line tool
pub mod tools;
/// Per-stage image operations (grayscale, contrast, sharpen, ...)
pub mod utils;

pub use config::{PipelineConfig, RegionDetectorConfig, ScanConfig};
pub use detector::region::BarcodeRegionDetector;
pub use detector::scan_lines::ScanLineExtractor;
pub use error::{LaserError, Result};
pub use models::{Frame, PixelBuffer, PixelFormat, RegionEstimate, ScanRegion, ThresholdResult};
pub use pipeline::{Enhanced, Mode, Pipeline, Stage, StageTimings};
pub use scanner::{ScanStats, Scanner, SharedScanner, TickOutcome};

/// Enhance a single frame with default settings
///
/// Builds a throwaway [`Pipeline`]; a scan loop should keep its own pipeline
/// so buffers are reused between ticks.
pub fn enhance(frame: &Frame, mode: Mode) -> Option<Enhanced> {
    Pipeline::new().run(frame, mode)
}

/// Cut the default set of laser scan lines from a frame
pub fn extract_scan_lines(frame: &Frame) -> Vec<ScanRegion> {
    ScanLineExtractor::default().extract_lines(frame)
}

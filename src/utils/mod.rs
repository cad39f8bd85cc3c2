//! Per-stage image operations
//!
//! Each stage works in place on a [`PixelBuffer`](crate::models::PixelBuffer):
//! - Grayscale conversion (luminosity weights)
//! - Contrast stretch around the midpoint
//! - Laplacian sharpening
//! - Binarization (Otsu's method)
//! - Majority-vote cleanup
//! - Memory pools (buffer reuse across ticks)

/// Histogram, Otsu threshold and binarization
pub mod binarization;
pub mod contrast;
pub mod grayscale;
pub mod memory_pool;
pub mod morphology;
pub mod sharpen;

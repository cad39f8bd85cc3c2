/// Immutable RGBA camera frames
pub mod frame;
/// Mutable working buffers (RGBA8 or Gray8)
pub mod pixel_buffer;
/// Result types: scan strips, thresholds, region estimates
pub mod region;

pub use frame::Frame;
pub use pixel_buffer::{PixelBuffer, PixelFormat};
pub use region::{RegionEstimate, ScanRegion, ThresholdResult};

//! 3x3 Laplacian sharpening to crispen bar edges
//!
//! Kernel:
//! ```text
//!  0 -1  0
//! -1  5 -1
//!  0 -1  0
//! ```
//! Only interior pixels are recomputed. The outer 1-pixel border keeps its
//! pre-sharpen value (no wrapping, no edge replication).

use crate::models::PixelBuffer;

/// Sharpen in place, allocating a temporary snapshot
pub fn sharpen(buffer: &mut PixelBuffer) {
    let mut scratch = Vec::new();
    sharpen_with_scratch(buffer, &mut scratch);
}

/// Sharpen in place using a caller-owned snapshot buffer (no allocation once warm)
///
/// Every output pixel reads from the snapshot taken before the pass, never
/// from values already written in this pass. Alpha is untouched.
pub fn sharpen_with_scratch(buffer: &mut PixelBuffer, scratch: &mut Vec<u8>) {
    let width = buffer.width();
    let height = buffer.height();
    if width < 3 || height < 3 {
        return;
    }

    let channels = buffer.channels();
    let colors = buffer.format().color_channels();
    let stride = width * channels;

    scratch.clear();
    scratch.extend_from_slice(buffer.as_bytes());
    let src = scratch.as_slice();
    let dst = buffer.as_bytes_mut();

    for y in 1..height - 1 {
        let row = y * stride;
        for x in 1..width - 1 {
            let idx = row + x * channels;
            for c in 0..colors {
                let center = src[idx + c] as i32;
                let up = src[idx - stride + c] as i32;
                let down = src[idx + stride + c] as i32;
                let left = src[idx - channels + c] as i32;
                let right = src[idx + channels + c] as i32;
                let sum = 5 * center - up - down - left - right;
                dst[idx + c] = sum.clamp(0, 255) as u8;
            }
        }
    }
}

//! Single-pass 3x3 majority-vote denoiser for binarized buffers
//!
//! Not an erosion/dilation opening: each interior pixel simply takes the
//! majority color of its 3x3 window (itself included), counted on a snapshot
//! taken before the pass. Border pixels are left as they are.

use crate::models::PixelBuffer;

/// Black cells needed in the 9-cell window for a pixel to become black
const MAJORITY: usize = 5;

/// Clean in place, allocating a temporary snapshot
pub fn morph_clean(buffer: &mut PixelBuffer) {
    let mut scratch = Vec::new();
    morph_clean_with_scratch(buffer, &mut scratch);
}

/// Clean in place using a caller-owned snapshot buffer
///
/// A cell counts as black when its channel 0 is exactly 0.
pub fn morph_clean_with_scratch(buffer: &mut PixelBuffer, scratch: &mut Vec<u8>) {
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
        for x in 1..width - 1 {
            let mut black_count = 0usize;
            for ny in y - 1..=y + 1 {
                let row = ny * stride;
                for nx in x - 1..=x + 1 {
                    if src[row + nx * channels] == 0 {
                        black_count += 1;
                    }
                }
            }

            let idx = y * stride + x * channels;
            let value = if black_count >= MAJORITY { 0 } else { 255 };
            dst[idx..idx + colors].fill(value);
        }
    }
}

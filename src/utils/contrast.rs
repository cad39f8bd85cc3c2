//! Linear contrast stretch around the 128 midpoint
//!
//! v' = clamp(factor * v + 128 * (1 - factor), 0, 255)

use crate::models::PixelBuffer;

const MIDPOINT: f64 = 128.0;

/// Build the 256-entry lookup table for a contrast factor
///
/// `factor > 1` spreads values away from 128, `0 < factor < 1` pulls them in.
/// Negative or non-finite factors are treated as 0, which flattens every
/// value to the midpoint. The intermediate is computed in `f64` and clamped
/// before narrowing, so even `f32::MAX` cannot wrap.
pub fn contrast_lut(factor: f32) -> [u8; 256] {
    let factor = if factor.is_finite() && factor >= 0.0 {
        factor as f64
    } else {
        0.0
    };
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        // Same line as factor * v + 128 * (1 - factor), anchored at 128
        let stretched = factor * (v as f64 - MIDPOINT) + MIDPOINT;
        *out = stretched.round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Stretch contrast of every color channel in place; alpha is untouched
pub fn enhance_contrast(buffer: &mut PixelBuffer, factor: f32) {
    let lut = contrast_lut(factor);
    let channels = buffer.channels();
    let colors = buffer.format().color_channels();
    for px in buffer.as_bytes_mut().chunks_exact_mut(channels) {
        for v in &mut px[..colors] {
            *v = lut[*v as usize];
        }
    }
}

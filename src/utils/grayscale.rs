//! Luminosity grayscale, in place
//! Y = 0.299*R + 0.587*G + 0.114*B, rounded to nearest
//! Uses integer arithmetic: Y = (299*R + 587*G + 114*B + 500) / 1000
//!
//! The weights sum to exactly 1000, so an already-gray pixel (R = G = B)
//! maps back onto itself.

use crate::models::{PixelBuffer, PixelFormat};
use rayon::prelude::*;

/// Coefficients for grayscale conversion, scaled by 1000
const COEF_R: u32 = 299;
const COEF_G: u32 = 587;
const COEF_B: u32 = 114;
const COEF_SCALE: u32 = 1000;

#[inline]
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32 + COEF_SCALE / 2)
        / COEF_SCALE;
    lum.min(255) as u8
}

/// Convert a buffer to grayscale in place
///
/// The gray value is written to R, G and B; alpha is left untouched.
/// Gray8 buffers are already gray and are left as they are.
pub fn grayscale(buffer: &mut PixelBuffer) {
    if buffer.format() == PixelFormat::Gray8 {
        return;
    }
    grayscale_rgba(buffer.as_bytes_mut());
}

/// Same as [`grayscale`], with rows split across the rayon thread pool
///
/// Meant for batch tooling; a single scan tick should use [`grayscale`].
pub fn grayscale_parallel(buffer: &mut PixelBuffer) {
    if buffer.format() == PixelFormat::Gray8 || buffer.is_empty() {
        return;
    }
    let stride = buffer.width() * buffer.channels();
    buffer
        .as_bytes_mut()
        .par_chunks_mut(stride)
        .for_each(grayscale_rgba);
}

fn grayscale_rgba(data: &mut [u8]) {
    // Process 8 pixels at a time
    let mut blocks = data.chunks_exact_mut(4 * 8);
    for block in &mut blocks {
        for px in block.chunks_exact_mut(4) {
            let lum = luminance(px[0], px[1], px[2]);
            px[..3].fill(lum);
        }
    }

    // Process remaining pixels
    for px in blocks.into_remainder().chunks_exact_mut(4) {
        let lum = luminance(px[0], px[1], px[2]);
        px[..3].fill(lum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frame;

    fn one_pixel(rgba: [u8; 4]) -> PixelBuffer {
        PixelBuffer::from_frame(&Frame::filled(1, 1, rgba))
    }

    #[test]
    fn test_grayscale_primaries() {
        // Pure white
        let mut white = one_pixel([255, 255, 255, 255]);
        grayscale(&mut white);
        assert_eq!(white.as_bytes(), &[255, 255, 255, 255]);

        // Pure black
        let mut black = one_pixel([0, 0, 0, 255]);
        grayscale(&mut black);
        assert_eq!(black.get(0, 0, 0), 0);

        // Pure red: 0.299 * 255 = 76.2
        let mut red = one_pixel([255, 0, 0, 255]);
        grayscale(&mut red);
        assert_eq!(red.get(0, 0, 0), 76);

        // Pure green: 0.587 * 255 = 149.7
        let mut green = one_pixel([0, 255, 0, 255]);
        grayscale(&mut green);
        assert_eq!(green.get(0, 0, 1), 150);
    }

    #[test]
    fn test_gray_input_unchanged() {
        for v in 0..=255u8 {
            let mut px = one_pixel([v, v, v, 255]);
            grayscale(&mut px);
            assert_eq!(px.as_bytes(), &[v, v, v, 255], "value {}", v);
        }
    }

    #[test]
    fn test_alpha_untouched() {
        let mut px = one_pixel([10, 200, 30, 7]);
        grayscale(&mut px);
        assert_eq!(px.get(0, 0, 3), 7);
        assert_eq!(px.get(0, 0, 0), px.get(0, 0, 2));
    }

    #[test]
    fn test_empty_buffer_is_noop() {
        let mut empty = PixelBuffer::default();
        grayscale(&mut empty);
        grayscale_parallel(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let frame = Frame::from_fn(37, 23, |x, y| {
            [(x * 7) as u8, (y * 11) as u8, (x + y) as u8, 255]
        });
        let mut serial = PixelBuffer::from_frame(&frame);
        let mut parallel = serial.clone();
        grayscale(&mut serial);
        grayscale_parallel(&mut parallel);
        assert_eq!(serial, parallel);
    }
}

use crate::models::{PixelBuffer, ThresholdResult};

/// Threshold used when the histogram never splits into two classes
pub const DEFAULT_THRESHOLD: u8 = 128;

/// 256-bin histogram of channel 0
///
/// By the time thresholding runs the buffer is grayscale, so R = G = B and
/// the red channel stands in for intensity.
pub fn histogram(buffer: &PixelBuffer) -> [u32; 256] {
    let mut histogram = [0u32; 256];
    for px in buffer.as_bytes().chunks_exact(buffer.channels()) {
        histogram[px[0] as usize] += 1;
    }
    histogram
}

/// Calculate Otsu's optimal threshold for a grayscale buffer
pub fn otsu_threshold(buffer: &PixelBuffer) -> ThresholdResult {
    otsu_from_histogram(&histogram(buffer))
}

/// Otsu's method over a precomputed histogram
///
/// Walks candidate split points t = 0..=255, where the background class is
/// every intensity <= t. The between-class variance wB * wF * (mB - mF)^2
/// is maximized; on ties the lowest t wins. The returned threshold is t + 1
/// so that [`apply_threshold`]'s `value < threshold` test blackens exactly
/// the background class.
///
/// A single-class histogram (uniform image, or empty) terminates through the
/// `wF == 0` break and yields [`DEFAULT_THRESHOLD`].
pub fn otsu_from_histogram(histogram: &[u32; 256]) -> ThresholdResult {
    let total: f64 = histogram.iter().map(|&c| c as f64).sum();
    let sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut sum_b = 0.0f64;
    let mut w_b = 0.0f64;
    let mut max_variance = 0.0f64;
    let mut threshold = DEFAULT_THRESHOLD;

    for t in 0..256usize {
        let count = histogram[t] as f64;
        w_b += count;
        if w_b == 0.0 {
            continue;
        }

        let w_f = total - w_b;
        if w_f == 0.0 {
            break;
        }

        sum_b += t as f64 * count;
        let mean_b = sum_b / w_b;
        let mean_f = (sum - sum_b) / w_f;

        let variance = w_b * w_f * (mean_b - mean_f) * (mean_b - mean_f);
        if variance > max_variance {
            max_variance = variance;
            // t < 255 here: at t = 255 every pixel is background and w_f == 0
            threshold = (t + 1) as u8;
        }
    }

    ThresholdResult::new(threshold)
}

/// Binarize in place: values below the threshold become 0, others 255
///
/// All color channels are written; alpha is unchanged.
pub fn apply_threshold(buffer: &mut PixelBuffer, result: ThresholdResult) {
    let channels = buffer.channels();
    let colors = buffer.format().color_channels();
    for px in buffer.as_bytes_mut().chunks_exact_mut(channels) {
        let value = if px[0] < result.threshold { 0 } else { 255 };
        px[..colors].fill(value);
    }
}

/// Compute Otsu's threshold and apply it in one step
pub fn otsu_binarize(buffer: &mut PixelBuffer) -> ThresholdResult {
    let result = otsu_threshold(buffer);
    apply_threshold(buffer, result);
    result
}

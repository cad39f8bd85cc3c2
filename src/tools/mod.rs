//! Image-file helpers for the `laserscan` tool
//!
//! Everything that touches the filesystem lives here, outside the pipeline.

use crate::error::{LaserError, Result};
use crate::models::{Frame, PixelBuffer, PixelFormat};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Load an image file as an RGBA frame
pub fn load_frame<P: AsRef<Path>>(path: P) -> Result<Frame> {
    let img = image::open(path)?;
    Ok(Frame::from_rgba_image(&img.to_rgba8()))
}

/// Save a buffer as an image file; the format follows the extension
///
/// # Errors
///
/// [`LaserError::InvalidFrame`] when a dimension does not fit an image
/// header, [`LaserError::BufferSize`] when the samples do not cover the
/// dimensions, plus any encoding or I/O error.
pub fn save_buffer<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> Result<()> {
    let invalid = || LaserError::InvalidFrame {
        width: buffer.width(),
        height: buffer.height(),
    };
    let width = u32::try_from(buffer.width()).map_err(|_| invalid())?;
    let height = u32::try_from(buffer.height()).map_err(|_| invalid())?;
    let size_mismatch = || LaserError::BufferSize {
        expected: buffer.width() * buffer.height() * buffer.channels(),
        actual: buffer.as_bytes().len(),
    };

    match buffer.format() {
        PixelFormat::Gray8 => {
            image::GrayImage::from_raw(width, height, buffer.as_bytes().to_vec())
                .ok_or_else(size_mismatch)?
                .save(path)?;
        }
        PixelFormat::Rgba8 => {
            buffer.to_rgba_image().ok_or_else(size_mismatch)?.save(path)?;
        }
    }
    Ok(())
}

/// Summary statistics for the color samples of a buffer
#[derive(Debug, Clone, Copy)]
pub struct BufferStats {
    /// Minimum channel-0 value
    pub min: u8,
    /// Maximum channel-0 value
    pub max: u8,
    /// Average channel-0 value
    pub avg: u8,
    /// Share of pixels whose channel 0 is exactly 0
    pub black_ratio: f64,
}

/// Compute min/max/avg and black ratio over channel 0
pub fn buffer_stats(buffer: &PixelBuffer) -> BufferStats {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    let mut black = 0usize;
    let mut count = 0usize;
    for px in buffer.as_bytes().chunks_exact(buffer.channels()) {
        let v = px[0];
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
        if v == 0 {
            black += 1;
        }
        count += 1;
    }
    if count == 0 {
        return BufferStats {
            min: 0,
            max: 0,
            avg: 0,
            black_ratio: 0.0,
        };
    }
    BufferStats {
        min,
        max,
        avg: (sum / count as u64) as u8,
        black_ratio: black as f64 / count as f64,
    }
}

/// Default dataset root from `LASER_DATASET_ROOT`
pub fn dataset_root_from_env() -> PathBuf {
    env::var("LASER_DATASET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("benches/images"))
}

/// Image limit from `LASER_BENCH_LIMIT`; `None` (everything) when unset or 0
pub fn bench_limit_from_env() -> Option<usize> {
    match env::var("LASER_BENCH_LIMIT") {
        Ok(value) => value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|v| if v == 0 { None } else { Some(v) }),
        Err(_) => None,
    }
}

/// Sorted image paths under `root`, optionally truncated to `limit`
pub fn dataset_iter<P: AsRef<Path>>(
    root: P,
    limit: Option<usize>,
) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_images(root.as_ref());
    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if ext == "png" || ext == "jpg" || ext == "jpeg" || ext == "gif" || ext == "bmp" {
                    images.push(path);
                }
            }
        }
    }

    images
}

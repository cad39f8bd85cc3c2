//! Tunable constants, with `LASER_*` environment overrides
//!
//! Every value has a compiled-in default matching the tuned scanner. The
//! `from_env` constructors let a deployment adjust them without a rebuild;
//! unparsable values fall back to the default.

use std::time::Duration;

fn parse_env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_f32(name: &str, default: f32) -> f32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

/// Constants for the column edge-energy barcode locator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionDetectorConfig {
    /// Half-width of the sliding window in columns
    pub half_window: usize,
    /// Window energy a region must exceed to count as a barcode.
    /// Empirical; not derived from anything.
    pub energy_threshold: f32,
}

impl RegionDetectorConfig {
    /// Window spans 101 columns
    pub const DEFAULT_HALF_WINDOW: usize = 50;
    /// Mean edge energy a window must exceed
    pub const DEFAULT_ENERGY_THRESHOLD: f32 = 1000.0;

    /// Defaults overridden by `LASER_REGION_HALF_WINDOW` and
    /// `LASER_REGION_ENERGY_THRESHOLD`
    pub fn from_env() -> Self {
        Self {
            half_window: parse_env_usize("LASER_REGION_HALF_WINDOW", Self::DEFAULT_HALF_WINDOW)
                .max(1),
            energy_threshold: parse_env_f32(
                "LASER_REGION_ENERGY_THRESHOLD",
                Self::DEFAULT_ENERGY_THRESHOLD,
            ),
        }
    }
}

impl Default for RegionDetectorConfig {
    fn default() -> Self {
        Self {
            half_window: Self::DEFAULT_HALF_WINDOW,
            energy_threshold: Self::DEFAULT_ENERGY_THRESHOLD,
        }
    }
}

/// Settings for one [`Pipeline`](crate::pipeline::Pipeline)
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Contrast factor for the full-frame path
    pub full_contrast: f32,
    /// Contrast factor for the central-strip path
    pub fast_contrast: f32,
    /// Share of the frame height covered by the fast-mode strip
    pub strip_fraction: f32,
    /// Runs slower than this are logged
    pub slow_frame: Duration,
    /// Attach a region estimate to every result
    pub estimate_region: bool,
    /// Region locator constants
    pub region: RegionDetectorConfig,
}

impl PipelineConfig {
    /// Contrast factor for [`Mode::Full`](crate::pipeline::Mode::Full)
    pub const DEFAULT_FULL_CONTRAST: f32 = 2.0;
    /// Contrast factor for [`Mode::Fast`](crate::pipeline::Mode::Fast)
    pub const DEFAULT_FAST_CONTRAST: f32 = 2.2;
    /// Central 30% of the rows
    pub const DEFAULT_STRIP_FRACTION: f32 = 0.3;
    /// Slow-frame logging cutoff
    pub const DEFAULT_SLOW_FRAME_MS: u64 = 50;

    /// Defaults overridden by `LASER_FULL_CONTRAST`, `LASER_FAST_CONTRAST`,
    /// `LASER_STRIP_FRACTION`, `LASER_SLOW_FRAME_MS`, `LASER_ESTIMATE_REGION`
    /// and the region detector variables
    pub fn from_env() -> Self {
        Self {
            full_contrast: parse_env_f32("LASER_FULL_CONTRAST", Self::DEFAULT_FULL_CONTRAST),
            fast_contrast: parse_env_f32("LASER_FAST_CONTRAST", Self::DEFAULT_FAST_CONTRAST),
            strip_fraction: parse_env_f32("LASER_STRIP_FRACTION", Self::DEFAULT_STRIP_FRACTION)
                .clamp(0.0, 1.0),
            slow_frame: Duration::from_millis(parse_env_u64(
                "LASER_SLOW_FRAME_MS",
                Self::DEFAULT_SLOW_FRAME_MS,
            )),
            estimate_region: parse_env_bool_u8("LASER_ESTIMATE_REGION", true),
            region: RegionDetectorConfig::from_env(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            full_contrast: Self::DEFAULT_FULL_CONTRAST,
            fast_contrast: Self::DEFAULT_FAST_CONTRAST,
            strip_fraction: Self::DEFAULT_STRIP_FRACTION,
            slow_frame: Duration::from_millis(Self::DEFAULT_SLOW_FRAME_MS),
            estimate_region: true,
            region: RegionDetectorConfig::default(),
        }
    }
}

/// Cadence settings for a [`Scanner`](crate::scanner::Scanner)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Minimum spacing between processed ticks
    pub interval: Duration,
    /// Results that took longer than this are discarded as late
    pub latency_ceiling: Option<Duration>,
}

impl ScanConfig {
    /// 10 frames per second
    pub const DEFAULT_INTERVAL_MS: u64 = 100;

    /// Defaults overridden by `LASER_SCAN_INTERVAL_MS` and
    /// `LASER_LATENCY_CEILING_MS` (0 disables the ceiling)
    pub fn from_env() -> Self {
        let ceiling = parse_env_u64("LASER_LATENCY_CEILING_MS", 0);
        Self {
            interval: Duration::from_millis(parse_env_u64(
                "LASER_SCAN_INTERVAL_MS",
                Self::DEFAULT_INTERVAL_MS,
            )),
            latency_ceiling: (ceiling > 0).then(|| Duration::from_millis(ceiling)),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(Self::DEFAULT_INTERVAL_MS),
            latency_ceiling: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.full_contrast, 2.0);
        assert_eq!(config.fast_contrast, 2.2);
        assert_eq!(config.strip_fraction, 0.3);
        assert_eq!(config.slow_frame, Duration::from_millis(50));
        assert!(config.estimate_region);
        assert_eq!(config.region.half_window, 50);
        assert_eq!(config.region.energy_threshold, 1000.0);

        let scan = ScanConfig::default();
        assert_eq!(scan.interval, Duration::from_millis(100));
        assert_eq!(scan.latency_ceiling, None);
    }

    #[test]
    fn test_unset_variable_uses_default() {
        assert_eq!(parse_env_u64("LASER_TEST_SURELY_UNSET_U64", 7), 7);
        assert_eq!(parse_env_f32("LASER_TEST_SURELY_UNSET_F32", 1.5), 1.5);
        assert!(parse_env_bool_u8("LASER_TEST_SURELY_UNSET_BOOL", true));
    }
}

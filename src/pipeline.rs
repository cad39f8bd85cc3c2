//! Stage orchestration for the two scan modes
//!
//! ```text
//! Full: frame copy -> grayscale -> contrast(2.0) -> sharpen -> otsu -> cleanup
//! Fast: center strip -> grayscale -> contrast(2.2) -> otsu
//! ```
//!
//! A [`Pipeline`] is an owned value: the scan loop creates one, calls
//! [`Pipeline::run`] once per tick and keeps it between ticks so its buffer
//! pool stays warm. `run` takes `&mut self`, so at most one run per pipeline
//! can ever be in flight.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, trace};

use crate::config::PipelineConfig;
use crate::detector::region::BarcodeRegionDetector;
use crate::error::{LaserError, Result};
use crate::models::{Frame, PixelBuffer, RegionEstimate, ThresholdResult};
use crate::utils::binarization::{apply_threshold, otsu_threshold};
use crate::utils::contrast::enhance_contrast;
use crate::utils::grayscale::grayscale;
use crate::utils::memory_pool::BufferPool;
use crate::utils::morphology::morph_clean_with_scratch;
use crate::utils::sharpen::sharpen_with_scratch;

/// One step of a mode's stage sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Luminosity grayscale
    Grayscale,
    /// Linear stretch around 128
    Contrast,
    /// 3x3 Laplacian
    Sharpen,
    /// Otsu threshold and binarization
    Threshold,
    /// 3x3 majority vote
    MorphClean,
}

impl Stage {
    /// Number of distinct stages
    pub const COUNT: usize = 5;

    const fn index(self) -> usize {
        match self {
            Stage::Grayscale => 0,
            Stage::Contrast => 1,
            Stage::Sharpen => 2,
            Stage::Threshold => 3,
            Stage::MorphClean => 4,
        }
    }

    /// Short name used in logs
    pub const fn name(self) -> &'static str {
        match self {
            Stage::Grayscale => "grayscale",
            Stage::Contrast => "contrast",
            Stage::Sharpen => "sharpen",
            Stage::Threshold => "threshold",
            Stage::MorphClean => "morph_clean",
        }
    }
}

const FULL_STAGES: [Stage; 5] = [
    Stage::Grayscale,
    Stage::Contrast,
    Stage::Sharpen,
    Stage::Threshold,
    Stage::MorphClean,
];

const FAST_STAGES: [Stage; 3] = [Stage::Grayscale, Stage::Contrast, Stage::Threshold];

/// Processing mode chosen by the caller for each invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Whole frame, every stage
    Full,
    /// Central horizontal strip, no sharpening or cleanup
    Fast,
}

impl Mode {
    /// The stage sequence this mode runs, in order
    pub const fn stages(self) -> &'static [Stage] {
        match self {
            Mode::Full => &FULL_STAGES,
            Mode::Fast => &FAST_STAGES,
        }
    }

    /// Lowercase name, also used by `Display`
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Full => "full",
            Mode::Fast => "fast",
        }
    }

    /// Contrast factor for this mode
    pub fn contrast_factor(self, config: &PipelineConfig) -> f32 {
        match self {
            Mode::Full => config.full_contrast,
            Mode::Fast => config.fast_contrast,
        }
    }

    /// Source rows processed for a frame of `height`, as (offset_y, rows)
    ///
    /// Fast mode takes round(strip_fraction * height) rows, vertically
    /// centered with offset (height - rows) / 2.
    pub fn crop(self, height: usize, strip_fraction: f32) -> (usize, usize) {
        match self {
            Mode::Full => (0, height),
            Mode::Fast => {
                let fraction = strip_fraction.clamp(0.0, 1.0) as f64;
                let rows = ((fraction * height as f64).round() as usize).min(height);
                ((height - rows) / 2, rows)
            }
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wall-clock time spent in each stage of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageTimings {
    durations: [Option<Duration>; Stage::COUNT],
}

impl StageTimings {
    fn record(&mut self, stage: Stage, elapsed: Duration) {
        self.durations[stage.index()] = Some(elapsed);
    }

    /// Time spent in `stage`, `None` if the mode did not run it
    pub fn get(&self, stage: Stage) -> Option<Duration> {
        self.durations[stage.index()]
    }

    /// Sum over all stages that ran
    pub fn total(&self) -> Duration {
        self.durations.iter().flatten().sum()
    }
}

/// Output of one pipeline run, ready for the external decoder
#[derive(Debug, Clone)]
pub struct Enhanced {
    /// Enhanced pixels, same format as the input frame
    pub buffer: PixelBuffer,
    /// Mode that produced this result
    pub mode: Mode,
    /// Source row of the buffer's first row (0 for full frames)
    pub offset_y: usize,
    /// Binarization threshold that was applied
    pub threshold: Option<ThresholdResult>,
    /// Where the barcode most likely sits, when estimation is enabled
    pub region: Option<RegionEstimate>,
    /// Total processing time
    pub elapsed: Duration,
    /// Per-stage processing time
    pub timings: StageTimings,
}

/// Frame enhancement pipeline with its own buffer pool
pub struct Pipeline {
    config: PipelineConfig,
    detector: BarcodeRegionDetector,
    pool: BufferPool,
}

impl Pipeline {
    /// Pipeline with default settings
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Pipeline with explicit settings
    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            detector: BarcodeRegionDetector::new(config.region),
            config,
            pool: BufferPool::new(),
        }
    }

    /// Settings this pipeline was built with
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The scratch-buffer pool reused across runs
    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// Enhance one frame; `None` means "nothing to decode this tick"
    pub fn run(&mut self, frame: &Frame, mode: Mode) -> Option<Enhanced> {
        match self.try_run(frame, mode) {
            Ok(enhanced) => Some(enhanced),
            Err(err) => {
                debug!(%err, mode = mode.name(), "no enhancement this tick");
                None
            }
        }
    }

    /// Enhance one frame, reporting why there is no result
    ///
    /// # Errors
    ///
    /// [`LaserError::InvalidFrame`] for zero-sized frames and
    /// [`LaserError::EmptyStrip`] when the fast strip rounds to zero rows.
    #[instrument(
        level = "debug",
        skip_all,
        fields(mode = mode.name(), width = frame.width(), height = frame.height())
    )]
    pub fn try_run(&mut self, frame: &Frame, mode: Mode) -> Result<Enhanced> {
        let start = Instant::now();

        if frame.is_empty() {
            return Err(LaserError::InvalidFrame {
                width: frame.width(),
                height: frame.height(),
            });
        }

        let (offset_y, rows) = mode.crop(frame.height(), self.config.strip_fraction);
        if rows == 0 {
            return Err(LaserError::EmptyStrip {
                height: frame.height(),
            });
        }

        let mut buffer = self.pool.acquire_frame_rows(frame, offset_y, rows);
        let mut timings = StageTimings::default();
        let mut threshold = None;

        for &stage in mode.stages() {
            let stage_start = Instant::now();
            match stage {
                Stage::Grayscale => grayscale(&mut buffer),
                Stage::Contrast => {
                    enhance_contrast(&mut buffer, mode.contrast_factor(&self.config))
                }
                Stage::Sharpen => sharpen_with_scratch(&mut buffer, self.pool.scratch()),
                Stage::Threshold => {
                    let result = otsu_threshold(&buffer);
                    trace!(threshold = result.threshold, "otsu threshold");
                    apply_threshold(&mut buffer, result);
                    threshold = Some(result);
                }
                Stage::MorphClean => morph_clean_with_scratch(&mut buffer, self.pool.scratch()),
            }
            let elapsed = stage_start.elapsed();
            timings.record(stage, elapsed);
            debug!(stage = stage.name(), elapsed_us = elapsed.as_micros() as u64, "stage done");
        }

        let region = self
            .config
            .estimate_region
            .then(|| self.detector.detect(&buffer));

        let elapsed = start.elapsed();
        if elapsed > self.config.slow_frame {
            info!(
                mode = mode.name(),
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "slow laser processing frame"
            );
        }

        Ok(Enhanced {
            buffer,
            mode,
            offset_y,
            threshold,
            region,
            elapsed,
            timings,
        })
    }

    /// Locate the barcode band in any buffer with this pipeline's settings
    pub fn detect_region(&self, buffer: &PixelBuffer) -> RegionEstimate {
        self.detector.detect(buffer)
    }

    /// Hand a finished result's buffer back for reuse on a later tick
    pub fn recycle(&mut self, enhanced: Enhanced) {
        self.pool.release(enhanced.buffer);
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

//! Tick pacing around a [`Pipeline`]
//!
//! The capture side calls [`Scanner::tick`] as often as it likes. Ticks that
//! arrive before the configured interval has passed are dropped, never
//! queued, so processing self-paces to whatever the device can sustain.
//! Results that exceed the optional latency ceiling are discarded after the
//! fact; a run is never interrupted.

use std::sync::{Arc, Mutex, TryLockError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::ScanConfig;
use crate::models::Frame;
use crate::pipeline::{Enhanced, Mode, Pipeline};

/// What happened to one tick
#[derive(Debug)]
pub enum TickOutcome {
    /// A fresh enhanced buffer for the decoder
    Enhanced(Enhanced),
    /// No frame, or nothing could be enhanced
    NoResult,
    /// Dropped: too soon after the previous tick, or a run is in progress
    Skipped,
    /// Finished, but slower than the latency ceiling; result discarded
    Late(Duration),
}

/// Counters across the scanner's lifetime
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Ticks that produced an enhanced buffer
    pub processed: u64,
    /// Ticks without a frame or without a result
    pub no_result: u64,
    /// Ticks dropped inside the interval
    pub skipped: u64,
    /// Results discarded for exceeding the latency ceiling
    pub late: u64,
}

/// Owns a pipeline and decides which ticks reach it
pub struct Scanner {
    pipeline: Pipeline,
    config: ScanConfig,
    last_tick: Option<Instant>,
    stats: ScanStats,
}

impl Scanner {
    /// Wrap a pipeline with tick pacing
    pub fn new(pipeline: Pipeline, config: ScanConfig) -> Self {
        Self {
            pipeline,
            config,
            last_tick: None,
            stats: ScanStats::default(),
        }
    }

    /// Offer a tick at time `now`
    ///
    /// `frame` is `None` when the camera had nothing ready; that counts as a
    /// tick with no result.
    pub fn tick(&mut self, frame: Option<&Frame>, mode: Mode, now: Instant) -> TickOutcome {
        if let Some(last) = self.last_tick {
            if now.saturating_duration_since(last) < self.config.interval {
                self.stats.skipped += 1;
                return TickOutcome::Skipped;
            }
        }
        self.last_tick = Some(now);

        let Some(frame) = frame else {
            self.stats.no_result += 1;
            return TickOutcome::NoResult;
        };

        match self.pipeline.run(frame, mode) {
            None => {
                self.stats.no_result += 1;
                TickOutcome::NoResult
            }
            Some(enhanced) => match self.config.latency_ceiling {
                Some(ceiling) if enhanced.elapsed > ceiling => {
                    let elapsed = enhanced.elapsed;
                    debug!(?elapsed, ?ceiling, "discarding late result");
                    self.pipeline.recycle(enhanced);
                    self.stats.late += 1;
                    TickOutcome::Late(elapsed)
                }
                _ => {
                    self.stats.processed += 1;
                    TickOutcome::Enhanced(enhanced)
                }
            },
        }
    }

    /// Return a consumed result's buffer to the pipeline pool
    pub fn recycle(&mut self, enhanced: Enhanced) {
        self.pipeline.recycle(enhanced);
    }

    /// The wrapped pipeline
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Pacing settings
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Counters since creation
    pub fn stats(&self) -> ScanStats {
        self.stats
    }
}

/// A [`Scanner`] that several threads may tick
///
/// A tick that finds the scanner busy is skipped instead of waiting, which
/// keeps the at-most-one-in-flight rule without building a backlog.
#[derive(Clone)]
pub struct SharedScanner {
    inner: Arc<Mutex<Scanner>>,
}

impl SharedScanner {
    /// Share a scanner between threads
    pub fn new(scanner: Scanner) -> Self {
        Self {
            inner: Arc::new(Mutex::new(scanner)),
        }
    }

    /// Run the tick if nobody else is, otherwise report [`TickOutcome::Skipped`]
    pub fn try_tick(&self, frame: Option<&Frame>, mode: Mode, now: Instant) -> TickOutcome {
        match self.inner.try_lock() {
            Ok(mut scanner) => scanner.tick(frame, mode, now),
            Err(TryLockError::WouldBlock) => {
                debug!("scanner busy, dropping tick");
                TickOutcome::Skipped
            }
            // A panicked run leaves no partial state worth protecting
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().tick(frame, mode, now),
        }
    }

    /// Snapshot of the scanner's counters (waits for a running tick)
    pub fn stats(&self) -> ScanStats {
        match self.inner.lock() {
            Ok(scanner) => scanner.stats(),
            Err(poisoned) => poisoned.into_inner().stats(),
        }
    }
}

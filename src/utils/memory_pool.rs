//! Buffer pool for reducing per-frame allocation
//!
//! A scan loop processes frames of the same size tick after tick. The pool
//! keeps:
//! - Working [`PixelBuffer`]s, matched by (width, height, format)
//! - One scratch snapshot vector shared by the sharpen and cleanup passes
//!
//! A pool belongs to exactly one pipeline; nothing here is shared.

use crate::models::{Frame, PixelBuffer, PixelFormat};

/// Default number of idle buffers kept around
const DEFAULT_MAX_IDLE: usize = 4;

/// Pool of reusable working buffers plus a scratch snapshot
pub struct BufferPool {
    idle: Vec<PixelBuffer>,
    max_idle: usize,
    scratch: Vec<u8>,
    stats: AllocationStats,
}

impl BufferPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::with_max_idle(DEFAULT_MAX_IDLE)
    }

    /// Create a pool that keeps at most `max_idle` returned buffers
    pub fn with_max_idle(max_idle: usize) -> Self {
        Self {
            idle: Vec::with_capacity(max_idle),
            max_idle,
            scratch: Vec::new(),
            stats: AllocationStats::new(),
        }
    }

    /// Take a buffer of the given shape (contents unspecified)
    ///
    /// Prefers an idle buffer with the exact shape, then any idle buffer
    /// whose allocation is large enough, and only then allocates.
    pub fn acquire(&mut self, width: usize, height: usize, format: PixelFormat) -> PixelBuffer {
        let bytes = width * height * format.channels();

        let exact = self.idle.iter().position(|b| {
            b.width() == width && b.height() == height && b.format() == format
        });
        let slot = exact.or_else(|| self.idle.iter().position(|b| b.capacity() >= bytes));

        match slot {
            Some(i) => {
                let mut buffer = self.idle.swap_remove(i);
                buffer.reshape(width, height, format);
                self.stats.record_reuse(bytes);
                buffer
            }
            None => {
                self.stats.record_allocation();
                PixelBuffer::new(width, height, format)
            }
        }
    }

    /// Take a buffer holding a copy of `rows` rows of `frame` starting at `y`
    pub fn acquire_frame_rows(&mut self, frame: &Frame, y: usize, rows: usize) -> PixelBuffer {
        let mut buffer = self.acquire(frame.width(), rows, PixelFormat::Rgba8);
        buffer.copy_frame_rows(frame, y, rows);
        buffer
    }

    /// Give a buffer back for later reuse; dropped when the pool is full
    pub fn release(&mut self, buffer: PixelBuffer) {
        if self.idle.len() < self.max_idle {
            self.idle.push(buffer);
        }
    }

    /// Scratch vector for snapshot-based passes
    pub fn scratch(&mut self) -> &mut Vec<u8> {
        &mut self.scratch
    }

    /// Number of idle buffers currently held
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// Allocation counters since creation
    pub fn stats(&self) -> &AllocationStats {
        &self.stats
    }

    /// Drop every idle buffer and the scratch allocation
    pub fn clear(&mut self) {
        self.idle.clear();
        self.scratch = Vec::new();
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for monitoring allocation patterns
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AllocationStats {
    /// Acquisitions served from an idle buffer
    pub reuses: usize,
    /// Acquisitions that had to allocate
    pub allocations: usize,
    /// Bytes handed out from reused buffers
    pub total_bytes_reused: usize,
}

impl AllocationStats {
    /// All counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one reuse of `bytes` bytes
    pub fn record_reuse(&mut self, bytes: usize) {
        self.reuses += 1;
        self.total_bytes_reused += bytes;
    }

    /// Count one fresh allocation
    pub fn record_allocation(&mut self) {
        self.allocations += 1;
    }
}

//! # FPS Counter
//!
//! Counts presented frames and reports the average rate once per interval
//! of clock time. Elapsed time uses wrapping tick subtraction, so a report
//! straddling the 2^32 ms wrap is still correct.

use tracing::info;

use super::clock::ticks_since;

/// Interval between reports, in milliseconds.
pub const FPS_INTERVAL_MS: u32 = 3000;

/// Rolling frames-per-second meter.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    interval: u32,
    window_start: u32,
    frames: u32,
    reports: u64,
}

impl FpsCounter {
    /// Starts the first window at `now` with the default interval.
    #[must_use]
    pub fn new(now: u32) -> Self {
        Self::with_interval(now, FPS_INTERVAL_MS)
    }

    /// Starts the first window at `now`, reporting every `interval` ms.
    #[must_use]
    pub fn with_interval(now: u32, interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            window_start: now,
            frames: 0,
            reports: 0,
        }
    }

    /// Counts one frame presented at `now`.
    ///
    /// Once the window is full, logs and returns the rate over it and starts
    /// the next window.
    #[allow(clippy::cast_precision_loss)]
    pub fn record(&mut self, now: u32) -> Option<f32> {
        self.frames += 1;
        let elapsed = ticks_since(now, self.window_start);
        if elapsed < self.interval {
            return None;
        }

        let fps = self.frames as f32 / (elapsed as f32 / 1000.0);
        info!(fps, frames = self.frames, elapsed_ms = elapsed, "FPS: {fps}");

        self.window_start = now;
        self.frames = 0;
        self.reports += 1;
        Some(fps)
    }

    /// Reports emitted so far.
    #[must_use]
    pub fn reports(&self) -> u64 {
        self.reports
    }
}

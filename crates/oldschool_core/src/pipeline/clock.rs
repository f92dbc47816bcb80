//! # Millisecond Clocks
//!
//! Ticks are `u32` milliseconds and wrap after 2^32 ms (about 49.7 days).
//! Always measure elapsed time with [`ticks_since`]; comparing two absolute
//! tick values is wrong across a wrap.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// Monotonic millisecond source.
pub trait Clock: Sync {
    /// Current tick.
    fn now_millis(&self) -> u32;
}

/// Milliseconds from `earlier` to `now`, correct across one wrap.
#[inline]
#[must_use]
pub const fn ticks_since(now: u32, earlier: u32) -> u32 {
    now.wrapping_sub(earlier)
}

/// Wall clock: milliseconds since construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Starts counting from zero now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_millis(&self) -> u32 {
        // keep the low 32 bits: the tick counter wraps
        self.origin.elapsed().as_millis() as u32
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    ticks: AtomicU32,
}

impl ManualClock {
    /// Starts at `ticks`.
    #[must_use]
    pub const fn starting_at(ticks: u32) -> Self {
        Self {
            ticks: AtomicU32::new(ticks),
        }
    }

    /// Jumps to `ticks`.
    pub fn set(&self, ticks: u32) {
        self.ticks.store(ticks, Ordering::Release);
    }

    /// Moves forward by `delta`, wrapping.
    pub fn advance(&self, delta: u32) {
        self.ticks.fetch_add(delta, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }
}

/// Clock that advances by a fixed step on every read.
///
/// Gives every produced frame a distinct tick without sleeping.
#[derive(Debug)]
pub struct CountingClock {
    next: AtomicU32,
    step: u32,
}

impl CountingClock {
    /// First read returns `start`, each later read `step` more.
    #[must_use]
    pub const fn new(start: u32, step: u32) -> Self {
        Self {
            next: AtomicU32::new(start),
            step,
        }
    }
}

impl Clock for CountingClock {
    fn now_millis(&self) -> u32 {
        self.next.fetch_add(self.step, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_across_wrap() {
        let before = u32::MAX - 5;
        let after = 10u32;
        assert_eq!(ticks_since(after, before), 16);
        // the absolute comparison gets it backwards
        assert!(after < before);
    }

    #[test]
    fn test_delta_without_wrap() {
        assert_eq!(ticks_since(3_000, 1_000), 2_000);
        assert_eq!(ticks_since(7, 7), 0);
    }

    #[test]
    fn test_manual_clock_wraps() {
        let clock = ManualClock::starting_at(u32::MAX - 1);
        clock.advance(3);
        assert_eq!(clock.now_millis(), 1);
        clock.set(500);
        assert_eq!(clock.now_millis(), 500);
    }

    #[test]
    fn test_counting_clock_steps() {
        let clock = CountingClock::new(10, 4);
        assert_eq!(clock.now_millis(), 10);
        assert_eq!(clock.now_millis(), 14);
        assert_eq!(clock.now_millis(), 18);
    }

    #[test]
    fn test_monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let first = clock.now_millis();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = clock.now_millis();
        assert!(ticks_since(second, first) >= 2);
    }
}

//! Cooperative cancellation shared by both loops.

use std::sync::atomic::{AtomicBool, Ordering};

/// One-way "please stop" flag.
///
/// Raised by whichever loop sees the end of the run (termination request,
/// presenter failure); checked by both loops once per cycle.
#[derive(Debug, Default)]
pub struct StopSignal {
    requested: AtomicBool,
}

impl StopSignal {
    /// A signal that has not been raised.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
        }
    }

    /// Raises the signal. Idempotent.
    #[inline]
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// Whether the signal has been raised.
    #[inline]
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Raises the signal when the returned guard is dropped, including
    /// during unwinding.
    #[must_use]
    pub fn raise_on_drop(&self) -> StopGuard<'_> {
        StopGuard { signal: self }
    }
}

/// Raises its [`StopSignal`] on drop.
#[derive(Debug)]
pub struct StopGuard<'a> {
    signal: &'a StopSignal,
}

impl Drop for StopGuard<'_> {
    fn drop(&mut self) {
        self.signal.request();
    }
}

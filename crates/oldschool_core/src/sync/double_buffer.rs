//! # Single-Owner Double Buffer
//!
//! The cooperative scheduling model: one control flow owns both frames, so
//! no locks are needed.
//!
//! ```text
//! cycle N:    produce -> frames[back]      (front = frames[back ^ 1])
//!             present    frames[back]
//!             swap       back ^= 1
//! ```

use crate::frame::{Frame, Geometry};

/// Two frames with alternating back/front designation.
#[derive(Debug, Clone)]
pub struct DoubleBuffer {
    frames: [Frame; 2],
    /// Index of the frame written next (0 or 1).
    /// The front frame is always `back ^ 1`.
    back: usize,
    swap_count: u64,
}

impl DoubleBuffer {
    /// Allocates both frames for `geometry`.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            frames: [Frame::new(geometry), Frame::new(geometry)],
            back: 0,
            swap_count: 0,
        }
    }

    /// Index of the current back frame.
    #[inline]
    #[must_use]
    pub fn back_index(&self) -> usize {
        self.back
    }

    /// Number of swaps performed so far.
    #[inline]
    #[must_use]
    pub fn swap_count(&self) -> u64 {
        self.swap_count
    }

    /// The most recently completed frame.
    #[inline]
    #[must_use]
    pub fn front(&self) -> &Frame {
        &self.frames[self.back ^ 1]
    }

    /// The frame being written this cycle.
    #[inline]
    #[must_use]
    pub fn back(&self) -> &Frame {
        &self.frames[self.back]
    }

    /// Front (read-only) and back (writable) at the same time.
    #[inline]
    pub fn split(&mut self) -> (&Frame, &mut Frame) {
        let [first, second] = &mut self.frames;
        if self.back == 0 {
            (second, first)
        } else {
            (first, second)
        }
    }

    /// Exchanges the back and front designations.
    #[inline]
    pub fn swap(&mut self) {
        self.back ^= 1;
        self.swap_count += 1;
    }
}

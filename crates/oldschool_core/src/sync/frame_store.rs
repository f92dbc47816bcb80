//! # Per-Slot Locked Frame Store
//!
//! The free-running dual-thread protocol:
//!
//! ```text
//!   simulation (cursor 0,1,0,..)         presentation (cursor 1,0,1,..)
//!   lock slot[c] -> write -> unlock      lock slot[c] -> copy out -> unlock
//!   c ^= 1                               present copy (no lock held)
//!                                        c ^= 1
//! ```
//!
//! Each slot has its own mutex. The locks only keep the two threads out of
//! the *same* slot at the same time. They do not order the threads and do not
//! match their rates:
//!
//! - a fast producer overwrites a slot the consumer never saw (lost frame)
//! - a fast consumer copies a slot that has not changed (duplicate frame)
//!
//! Both are part of the protocol, not failures.

use std::ops::{Deref, DerefMut};

use parking_lot::{Mutex, MutexGuard};

use crate::frame::{Frame, Geometry};

/// Number of slots in the store.
pub const SLOT_COUNT: usize = 2;

/// Alternating slot index owned by one side of the handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCursor {
    current: usize,
}

impl SlotCursor {
    /// Cursor for the simulation side; starts at slot 0.
    #[must_use]
    pub const fn producer() -> Self {
        Self { current: 0 }
    }

    /// Cursor for the presentation side; starts at slot 1.
    #[must_use]
    pub const fn consumer() -> Self {
        Self { current: 1 }
    }

    /// Slot targeted this cycle.
    #[inline]
    #[must_use]
    pub const fn current(self) -> usize {
        self.current
    }

    /// The slot not targeted this cycle.
    #[inline]
    #[must_use]
    pub const fn other(self) -> usize {
        self.current ^ 1
    }

    /// Moves to the other slot.
    #[inline]
    pub fn advance(&mut self) {
        self.current ^= 1;
    }
}

/// Two frames, each behind its own lock.
pub struct FrameStore {
    geometry: Geometry,
    slots: [Mutex<Frame>; SLOT_COUNT],
}

impl FrameStore {
    /// Allocates both slots for `geometry`.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            slots: [Mutex::new(Frame::new(geometry)), Mutex::new(Frame::new(geometry))],
        }
    }

    /// Geometry of every slot.
    #[inline]
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Locks `slot`, waiting as long as the other side holds it.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= SLOT_COUNT`.
    #[must_use]
    pub fn acquire(&self, slot: usize) -> SlotGuard<'_> {
        SlotGuard {
            index: slot,
            frame: self.slots[slot].lock(),
        }
    }

    /// Locks `slot` if nobody holds it right now.
    #[must_use]
    pub fn try_acquire(&self, slot: usize) -> Option<SlotGuard<'_>> {
        self.slots[slot].try_lock().map(|frame| SlotGuard { index: slot, frame })
    }

    /// Whether `slot` is currently held.
    #[must_use]
    pub fn is_held(&self, slot: usize) -> bool {
        self.slots[slot].is_locked()
    }
}

impl std::fmt::Debug for FrameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameStore")
            .field("geometry", &self.geometry)
            .field("held", &[self.is_held(0), self.is_held(1)])
            .finish()
    }
}

/// Exclusive access to one slot. Dropping it releases the slot.
pub struct SlotGuard<'a> {
    index: usize,
    frame: MutexGuard<'a, Frame>,
}

impl SlotGuard<'_> {
    /// Index of the held slot.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Releases the slot.
    #[inline]
    pub fn release(self) {
        drop(self);
    }
}

impl Deref for SlotGuard<'_> {
    type Target = Frame;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.frame
    }
}

impl DerefMut for SlotGuard<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.frame
    }
}

//! # Synchronization Between Simulation and Presentation
//!
//! ## The Problem
//!
//! ```text
//! Simulation:    WRITE a full frame (milliseconds)
//! Presentation:  READ a full frame, then block on vsync
//!
//! One shared buffer:  tearing, or production stalls on vsync
//! ```
//!
//! ## The Solutions
//!
//! - [`DoubleBuffer`]: one thread owns both frames; produce, present, swap.
//! - [`FrameStore`]: two frames, one lock each, two free-running cursors.
//!   Frames can be lost or repeated.
//! - [`frame_channel`]: frames change owner through a channel, with an
//!   explicit [`HandoffPolicy`].
//!
//! [`StopSignal`] ends both threaded loops cooperatively.

mod double_buffer;
mod frame_store;
mod handoff;
mod stop;

pub use double_buffer::DoubleBuffer;
pub use frame_store::{FrameStore, SlotCursor, SlotGuard, SLOT_COUNT};
pub use handoff::{frame_channel, Delivery, FrameReceiver, FrameSender, HandoffPolicy};
pub use stop::{StopGuard, StopSignal};

//! # Production Loops (simulation thread)
//!
//! ```text
//! slot locks:  lock slot[c] -> ticks = now -> produce -> unlock -> c ^= 1
//! channel:     acquire frame -> ticks = now -> produce -> publish
//! ```
//!
//! Both loops run until the [`StopSignal`] is raised or the consumer side
//! disappears. The previous frame handed to [`Effect::produce`] is a
//! producer-owned copy, kept up to date only when the effect reads it, so
//! the producer never touches a slot it does not hold.

use tracing::debug;

use crate::effects::Effect;
use crate::frame::FrameBuffer;
use crate::sync::{FrameSender, FrameStore, SlotCursor, StopSignal, SLOT_COUNT};

use super::clock::Clock;

/// What the simulation thread did during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductionStats {
    /// Frames produced.
    pub cycles: u64,
    /// Frames written into each slot (slot-lock protocol only).
    pub per_slot: [u64; SLOT_COUNT],
    /// Frames discarded before the consumer saw them (channel only).
    pub dropped: u64,
}

/// Free-running producer over the per-slot locks.
///
/// Never waits on the consumer beyond the slot lock itself, so it may
/// overwrite a slot that was never presented.
pub fn run_slot_production<C>(
    effect: &dyn Effect,
    store: &FrameStore,
    clock: &C,
    stop: &StopSignal,
) -> ProductionStats
where
    C: Clock + ?Sized,
{
    let reads_front = effect.reads_front();
    let mut previous = FrameBuffer::new(store.geometry());
    let mut prev_ticks = 0;
    let mut cursor = SlotCursor::producer();
    let mut stats = ProductionStats::default();

    while !stop.is_requested() {
        let mut slot = store.acquire(cursor.current());
        let ticks = clock.now_millis();
        let frame = &mut *slot;
        frame.ticks = ticks;
        effect.produce(&previous, &mut frame.buffer, ticks, prev_ticks);
        if reads_front {
            previous.copy_from(&frame.buffer);
        }
        slot.release();

        stats.cycles += 1;
        stats.per_slot[cursor.current()] += 1;
        prev_ticks = ticks;
        cursor.advance();
    }

    debug!(cycles = stats.cycles, per_slot = ?stats.per_slot, "slot production stopped");
    stats
}

/// Producer over the frame channel.
///
/// Takes the sender by value: it is dropped on return, which tells the
/// consumer no more frames are coming.
pub fn run_channel_production<C>(
    effect: &dyn Effect,
    mut sender: FrameSender,
    clock: &C,
    stop: &StopSignal,
) -> ProductionStats
where
    C: Clock + ?Sized,
{
    let reads_front = effect.reads_front();
    let mut previous: Option<FrameBuffer> = None;
    let mut prev_ticks = 0;
    let mut stats = ProductionStats::default();

    while !stop.is_requested() {
        let Some(mut frame) = sender.acquire() else {
            break;
        };
        let ticks = clock.now_millis();
        frame.ticks = ticks;

        let front = previous.get_or_insert_with(|| FrameBuffer::new(frame.buffer.geometry()));
        effect.produce(front, &mut frame.buffer, ticks, prev_ticks);
        if reads_front {
            front.copy_from(&frame.buffer);
        }

        if !sender.publish(frame) {
            break;
        }
        stats.cycles += 1;
        prev_ticks = ticks;
    }

    stats.dropped = sender.dropped();
    debug!(
        cycles = stats.cycles,
        dropped = stats.dropped,
        policy = %sender.policy(),
        "channel production stopped"
    );
    stats
}

//! # Presentation Loops (the thread driving the presenter)
//!
//! ```text
//! slot locks:  poll input -> lock slot[c] -> copy to staging -> unlock
//!              -> present staging -> c ^= 1
//! channel:     poll input -> refresh (or wait for the first frame)
//!              -> present current
//! ```
//!
//! Input polling and `present` always happen with no slot locked. Both loops
//! also end once the [`StopSignal`] is raised, which the simulation thread
//! does when it exits for any reason.

use tracing::debug;

use crate::error::EngineResult;
use crate::frame::FrameBuffer;
use crate::sync::{Delivery, FrameReceiver, FrameStore, SlotCursor, StopSignal};

use super::clock::Clock;
use super::fps::FpsCounter;
use super::presenter::Presenter;

/// What the presentation side did during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentationStats {
    /// Calls to [`Presenter::present`] that succeeded.
    pub presented: u64,
    /// Presents of a frame that had already been shown.
    pub duplicates: u64,
}

impl PresentationStats {
    /// Presents that showed a frame for the first time.
    #[must_use]
    pub fn fresh(&self) -> u64 {
        self.presented - self.duplicates
    }
}

/// Free-running consumer over the per-slot locks.
///
/// A slot whose tick has not changed since this loop last showed it is
/// presented again and counted as a duplicate.
///
/// # Errors
///
/// Returns the first presenter error.
pub fn run_slot_presentation<P, C>(
    store: &FrameStore,
    presenter: &mut P,
    clock: &C,
    stop: &StopSignal,
    mut fps: Option<&mut FpsCounter>,
) -> EngineResult<PresentationStats>
where
    P: Presenter + ?Sized,
    C: Clock + ?Sized,
{
    let mut staging = FrameBuffer::new(store.geometry());
    let mut last_shown: [Option<u32>; 2] = [None; 2];
    let mut cursor = SlotCursor::consumer();
    let mut stats = PresentationStats::default();

    while !stop.is_requested() && !presenter.termination_requested() {
        let index = cursor.current();
        let ticks = {
            let slot = store.acquire(index);
            staging.copy_from(&slot.buffer);
            slot.ticks
        };

        if last_shown[index] == Some(ticks) {
            stats.duplicates += 1;
        }
        last_shown[index] = Some(ticks);

        presenter.present(&staging)?;
        stats.presented += 1;
        if let Some(fps) = fps.as_deref_mut() {
            fps.record(clock.now_millis());
        }
        cursor.advance();
    }

    debug!(
        presented = stats.presented,
        duplicates = stats.duplicates,
        "slot presentation stopped"
    );
    Ok(stats)
}

/// Consumer over the frame channel.
///
/// Waits only for the very first frame; afterwards the current frame is
/// shown again whenever nothing new has arrived. Ends on a termination
/// request, a raised `stop` or once the producer is gone. The receiver is dropped on return,
/// which releases a producer blocked on the channel.
///
/// # Errors
///
/// Returns the first presenter error.
pub fn run_channel_presentation<P, C>(
    mut receiver: FrameReceiver,
    presenter: &mut P,
    clock: &C,
    stop: &StopSignal,
    mut fps: Option<&mut FpsCounter>,
) -> EngineResult<PresentationStats>
where
    P: Presenter + ?Sized,
    C: Clock + ?Sized,
{
    let mut stats = PresentationStats::default();

    while !stop.is_requested() && !presenter.termination_requested() {
        match receiver.refresh() {
            Delivery::Fresh => {}
            Delivery::Repeat => stats.duplicates += 1,
            Delivery::Pending => {
                if !receiver.wait() {
                    break;
                }
            }
            Delivery::Closed => break,
        }
        let Some(frame) = receiver.current() else {
            break;
        };

        presenter.present(&frame.buffer)?;
        stats.presented += 1;
        if let Some(fps) = fps.as_deref_mut() {
            fps.record(clock.now_millis());
        }
    }

    debug!(
        presented = stats.presented,
        duplicates = stats.duplicates,
        received = receiver.fresh(),
        "channel presentation stopped"
    );
    Ok(stats)
}

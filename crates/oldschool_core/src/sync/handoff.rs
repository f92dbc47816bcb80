//! # Frame Handoff Channel
//!
//! Single-producer/single-consumer transfer of whole [`Frame`]s. Ownership of
//! a frame moves with each message, so no frame is ever touched by two
//! threads at once and no lock is held while presenting.
//!
//! ```text
//!            ┌──────── filled (capacity 1) ────────┐
//!            │                                     ▼
//!   ┌────────┴────┐                         ┌─────────────┐
//!   │  producer   │                         │  consumer   │
//!   │ (simulation)│                         │(presentation)│
//!   └────────▲────┘                         └──────┬──────┘
//!            │                                     │
//!            └──────── free (recycled frames) ─────┘
//! ```
//!
//! ## Policies
//!
//! | Policy            | Frames | Producer waits for consumer | Frames dropped |
//! |-------------------|--------|-----------------------------|----------------|
//! | `DropOldest`      | 3      | never                       | yes, oldest unconsumed |
//! | `BlockProducer`   | 2      | yes                         | never          |
//!
//! Under both policies the consumer re-presents its current frame when
//! nothing new has arrived.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Weak};

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};

use crate::error::EngineError;
use crate::frame::{Frame, Geometry};

/// What the producer does when the previous frame has not been taken yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HandoffPolicy {
    /// Reclaim the unconsumed frame and publish the new one in its place.
    #[default]
    DropOldest,
    /// Wait until the consumer takes the previous frame.
    BlockProducer,
}

impl HandoffPolicy {
    /// Number of frames circulating under this policy.
    #[must_use]
    pub const fn frame_count(self) -> usize {
        match self {
            Self::DropOldest => 3,
            Self::BlockProducer => 2,
        }
    }

    /// Command-line name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DropOldest => "drop-oldest",
            Self::BlockProducer => "block",
        }
    }
}

impl fmt::Display for HandoffPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandoffPolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drop-oldest" | "drop" => Ok(Self::DropOldest),
            "block" | "block-producer" => Ok(Self::BlockProducer),
            other => Err(EngineError::InvalidConfig(format!(
                "unknown handoff policy '{other}' (expected 'drop-oldest' or 'block')"
            ))),
        }
    }
}

/// Creates a connected producer/consumer pair with all frames allocated.
#[must_use]
pub fn frame_channel(geometry: Geometry, policy: HandoffPolicy) -> (FrameSender, FrameReceiver) {
    let count = policy.frame_count();
    let (filled_tx, filled_rx) = bounded(1);
    let (free_tx, free_rx) = bounded(count);

    for _ in 0..count {
        // capacity == count, cannot fail
        let _ = free_tx.try_send(Frame::new(geometry));
    }

    let liveness = Arc::new(());
    let reclaim = match policy {
        HandoffPolicy::DropOldest => Some(filled_rx.clone()),
        HandoffPolicy::BlockProducer => None,
    };

    let sender = FrameSender {
        policy,
        filled: filled_tx,
        reclaim,
        free: free_rx,
        spare: None,
        consumer: Arc::downgrade(&liveness),
        published: 0,
        dropped: 0,
    };
    let receiver = FrameReceiver {
        filled: filled_rx,
        free: free_tx,
        current: None,
        _liveness: liveness,
        fresh: 0,
        repeated: 0,
    };
    (sender, receiver)
}

/// Producer end of the handoff.
pub struct FrameSender {
    policy: HandoffPolicy,
    filled: Sender<Frame>,
    /// Second receiver on `filled`, used to take back an unconsumed frame.
    reclaim: Option<Receiver<Frame>>,
    free: Receiver<Frame>,
    /// Frame reclaimed by the last publish, reused before waiting on `free`.
    spare: Option<Frame>,
    /// Dead once the [`FrameReceiver`] is dropped. The reclaim receiver
    /// keeps `filled` connected, so disconnection alone cannot tell.
    consumer: Weak<()>,
    published: u64,
    dropped: u64,
}

impl FrameSender {
    /// Policy this channel was built with.
    #[must_use]
    pub fn policy(&self) -> HandoffPolicy {
        self.policy
    }

    /// Takes a frame to write into.
    ///
    /// Returns `None` once the consumer is gone.
    pub fn acquire(&mut self) -> Option<Frame> {
        if let Some(frame) = self.spare.take() {
            return Some(frame);
        }
        self.free.recv().ok()
    }

    /// Hands a finished frame to the consumer.
    ///
    /// Returns `false` once the consumer is gone.
    pub fn publish(&mut self, frame: Frame) -> bool {
        let delivered = match &self.reclaim {
            None => self.filled.send(frame).is_ok(),
            Some(_) if self.consumer.strong_count() == 0 => false,
            Some(reclaim) => {
                let mut pending = frame;
                loop {
                    match self.filled.try_send(pending) {
                        Ok(()) => break true,
                        Err(TrySendError::Full(back)) => {
                            pending = back;
                            // the consumer may take it first; then the retry succeeds
                            if let Ok(stale) = reclaim.try_recv() {
                                self.dropped += 1;
                                self.spare = Some(stale);
                            }
                        }
                        Err(TrySendError::Disconnected(_)) => break false,
                    }
                }
            }
        };
        if delivered {
            self.published += 1;
        }
        delivered
    }

    /// Frames handed over so far.
    #[must_use]
    pub fn published(&self) -> u64 {
        self.published
    }

    /// Published frames reclaimed before the consumer saw them.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Result of [`FrameReceiver::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// A new frame replaced the current one.
    Fresh,
    /// Nothing new; the current frame is shown again.
    Repeat,
    /// No frame has ever been received.
    Pending,
    /// The producer is gone and nothing is left to receive.
    Closed,
}

/// Consumer end of the handoff.
pub struct FrameReceiver {
    filled: Receiver<Frame>,
    free: Sender<Frame>,
    current: Option<Frame>,
    _liveness: Arc<()>,
    fresh: u64,
    repeated: u64,
}

impl FrameReceiver {
    /// Swaps in the newest published frame, if any, without waiting.
    pub fn refresh(&mut self) -> Delivery {
        match self.filled.try_recv() {
            Ok(frame) => {
                self.install(frame);
                Delivery::Fresh
            }
            Err(TryRecvError::Empty) if self.current.is_some() => {
                self.repeated += 1;
                Delivery::Repeat
            }
            Err(TryRecvError::Empty) => Delivery::Pending,
            Err(TryRecvError::Disconnected) => Delivery::Closed,
        }
    }

    /// Waits for the next published frame.
    ///
    /// Returns `false` if the producer is gone.
    pub fn wait(&mut self) -> bool {
        match self.filled.recv() {
            Ok(frame) => {
                self.install(frame);
                true
            }
            Err(_) => false,
        }
    }

    /// The frame to present, once one has arrived.
    #[must_use]
    pub fn current(&self) -> Option<&Frame> {
        self.current.as_ref()
    }

    /// Frames received so far.
    #[must_use]
    pub fn fresh(&self) -> u64 {
        self.fresh
    }

    /// Refreshes that found nothing new.
    #[must_use]
    pub fn repeated(&self) -> u64 {
        self.repeated
    }

    fn install(&mut self, frame: Frame) {
        self.fresh += 1;
        if let Some(old) = self.current.replace(frame) {
            // the producer may already be gone; the frame is simply dropped then
            let _ = self.free.send(old);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn geometry() -> Geometry {
        Geometry::new(4, 4).unwrap()
    }

    #[test]
    fn test_policy_names() {
        assert_eq!("drop-oldest".parse::<HandoffPolicy>().unwrap(), HandoffPolicy::DropOldest);
        assert_eq!("block".parse::<HandoffPolicy>().unwrap(), HandoffPolicy::BlockProducer);
        assert!("fifo".parse::<HandoffPolicy>().is_err());
        assert_eq!(HandoffPolicy::default(), HandoffPolicy::DropOldest);
    }

    #[test]
    fn test_pending_before_first_frame() {
        let (_tx, mut rx) = frame_channel(geometry(), HandoffPolicy::DropOldest);
        assert_eq!(rx.refresh(), Delivery::Pending);
        assert!(rx.current().is_none());
    }

    #[test]
    fn test_fresh_then_repeat() {
        let (mut tx, mut rx) = frame_channel(geometry(), HandoffPolicy::DropOldest);
        let mut frame = tx.acquire().unwrap();
        frame.ticks = 5;
        assert!(tx.publish(frame));

        assert_eq!(rx.refresh(), Delivery::Fresh);
        assert_eq!(rx.current().unwrap().ticks, 5);
        assert_eq!(rx.refresh(), Delivery::Repeat);
        assert_eq!(rx.current().unwrap().ticks, 5);
        assert_eq!((rx.fresh(), rx.repeated()), (1, 1));
    }

    #[test]
    fn test_drop_oldest_never_waits() {
        let (mut tx, mut rx) = frame_channel(geometry(), HandoffPolicy::DropOldest);

        // nobody is consuming; the producer keeps going anyway
        for ticks in 1..=10 {
            let mut frame = tx.acquire().unwrap();
            frame.ticks = ticks;
            assert!(tx.publish(frame));
        }
        assert_eq!(tx.published(), 10);
        assert_eq!(tx.dropped(), 9);

        // only the newest survives
        assert_eq!(rx.refresh(), Delivery::Fresh);
        assert_eq!(rx.current().unwrap().ticks, 10);
    }

    #[test]
    fn test_drop_oldest_recycles_consumed_frames() {
        let (mut tx, mut rx) = frame_channel(geometry(), HandoffPolicy::DropOldest);
        for ticks in 1..=50 {
            let mut frame = tx.acquire().unwrap();
            frame.ticks = ticks;
            assert!(tx.publish(frame));
            assert_eq!(rx.refresh(), Delivery::Fresh);
            assert_eq!(rx.current().unwrap().ticks, ticks);
        }
        assert_eq!(tx.dropped(), 0);
    }

    #[test]
    fn test_block_producer_delivers_every_frame() {
        const FRAMES: u32 = 200;
        let (mut tx, mut rx) = frame_channel(geometry(), HandoffPolicy::BlockProducer);

        let seen = thread::scope(|scope| {
            scope.spawn(move || {
                for ticks in 1..=FRAMES {
                    let mut frame = tx.acquire().unwrap();
                    frame.ticks = ticks;
                    assert!(tx.publish(frame));
                }
                assert_eq!(tx.dropped(), 0);
            });

            let mut seen = Vec::new();
            while rx.wait() {
                seen.push(rx.current().unwrap().ticks);
                // a slow presenter must not cost frames
                if seen.len() % 50 == 0 {
                    thread::sleep(Duration::from_millis(2));
                }
            }
            seen
        });

        assert_eq!(seen, (1..=FRAMES).collect::<Vec<_>>());
    }

    #[test]
    fn test_block_producer_waits_for_consumer() {
        let (mut tx, mut rx) = frame_channel(geometry(), HandoffPolicy::BlockProducer);

        let handle = thread::spawn(move || {
            for ticks in 1..=2 {
                let mut frame = tx.acquire().unwrap();
                frame.ticks = ticks;
                assert!(tx.publish(frame));
            }
            tx
        });

        // the second publish sits behind the unconsumed first frame
        thread::sleep(Duration::from_millis(20));
        assert!(!handle.is_finished());

        assert_eq!(rx.refresh(), Delivery::Fresh);
        let tx = handle.join().unwrap();
        assert_eq!((tx.published(), tx.dropped()), (2, 0));

        assert_eq!(rx.refresh(), Delivery::Fresh);
        assert_eq!(rx.current().unwrap().ticks, 2);
    }

    #[test]
    fn test_consumer_gone_unblocks_producer() {
        let (mut tx, rx) = frame_channel(geometry(), HandoffPolicy::BlockProducer);
        let frame = tx.acquire().unwrap();
        assert!(tx.publish(frame));
        let frame = tx.acquire().unwrap();

        let handle = thread::spawn(move || tx.publish(frame));
        thread::sleep(Duration::from_millis(10));
        drop(rx);

        assert!(!handle.join().unwrap());
    }

    #[test]
    fn test_consumer_gone_stops_drop_oldest_producer() {
        let (mut tx, rx) = frame_channel(geometry(), HandoffPolicy::DropOldest);
        let frame = tx.acquire().unwrap();
        assert!(tx.publish(frame));
        drop(rx);

        let frame = tx.acquire().unwrap();
        assert!(!tx.publish(frame));
        assert_eq!(tx.published(), 1);
    }

    #[test]
    fn test_producer_gone_closes_consumer() {
        let (tx, mut rx) = frame_channel(geometry(), HandoffPolicy::BlockProducer);
        drop(tx);
        assert_eq!(rx.refresh(), Delivery::Closed);
        assert!(!rx.wait());
    }
}

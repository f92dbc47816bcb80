//! # Presenters
//!
//! The only way out of the core. A presenter receives each finished buffer
//! read-only and may block inside [`Presenter::present`] (vertical sync,
//! slow display); the loops never hold a slot lock across that call.

use std::thread;
use std::time::Duration;

use crate::error::{EngineError, EngineResult};
use crate::frame::FrameBuffer;

/// Displays finished frames and reports when the user wants out.
///
/// Presenters are driven from the thread that calls [`crate::Engine::run`]
/// and need not be `Send`.
pub trait Presenter {
    /// Shows `buffer`. May block.
    ///
    /// # Errors
    ///
    /// Any error ends the run and is returned from [`crate::Engine::run`].
    fn present(&mut self, buffer: &FrameBuffer) -> EngineResult<()>;

    /// Processes pending input and returns whether the run should stop.
    ///
    /// Called once per presentation cycle, never while a slot is locked.
    fn termination_requested(&mut self) -> bool;
}

/// Presenter without a display.
///
/// Requests termination after a fixed number of presents and keeps a copy of
/// the last buffer it was given.
#[derive(Debug, Clone)]
pub struct HeadlessPresenter {
    limit: u64,
    presented: u64,
    delay: Option<Duration>,
    fail_at: Option<u64>,
    last: Option<FrameBuffer>,
}

impl HeadlessPresenter {
    /// Stops the run after `limit` presents.
    #[must_use]
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            presented: 0,
            delay: None,
            fail_at: None,
            last: None,
        }
    }

    /// Sleeps for `delay` inside every present, like a vsync wait.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes present number `n` (1-based) fail.
    #[must_use]
    pub fn failing_at(mut self, n: u64) -> Self {
        self.fail_at = Some(n);
        self
    }

    /// Successful presents so far.
    #[must_use]
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// The most recently presented buffer.
    #[must_use]
    pub fn last(&self) -> Option<&FrameBuffer> {
        self.last.as_ref()
    }
}

impl Presenter for HeadlessPresenter {
    fn present(&mut self, buffer: &FrameBuffer) -> EngineResult<()> {
        if self.fail_at == Some(self.presented + 1) {
            return Err(EngineError::Presenter(format!(
                "headless present {} failed",
                self.presented + 1
            )));
        }
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        match &mut self.last {
            Some(last) if last.geometry() == buffer.geometry() => last.copy_from(buffer),
            slot => *slot = Some(buffer.clone()),
        }
        self.presented += 1;
        Ok(())
    }

    fn termination_requested(&mut self) -> bool {
        self.presented >= self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Geometry, Pixel};

    #[test]
    fn test_stops_after_limit() {
        let buffer = FrameBuffer::new(Geometry::new(2, 2).unwrap());
        let mut presenter = HeadlessPresenter::new(2);

        assert!(!presenter.termination_requested());
        presenter.present(&buffer).unwrap();
        assert!(!presenter.termination_requested());
        presenter.present(&buffer).unwrap();
        assert!(presenter.termination_requested());
        assert_eq!(presenter.presented(), 2);
    }

    #[test]
    fn test_keeps_last_buffer() {
        let mut buffer = FrameBuffer::new(Geometry::new(2, 1).unwrap());
        let mut presenter = HeadlessPresenter::new(10);
        assert!(presenter.last().is_none());

        presenter.present(&buffer).unwrap();
        buffer.pixels_mut()[1] = Pixel::opaque(1, 2, 3);
        presenter.present(&buffer).unwrap();

        assert_eq!(presenter.last().unwrap().pixel(1, 0), Pixel::opaque(1, 2, 3));
    }

    #[test]
    fn test_injected_failure() {
        let buffer = FrameBuffer::new(Geometry::new(1, 1).unwrap());
        let mut presenter = HeadlessPresenter::new(10).failing_at(2);

        presenter.present(&buffer).unwrap();
        let err = presenter.present(&buffer).unwrap_err();
        assert!(matches!(err, EngineError::Presenter(_)));
        assert_eq!(presenter.presented(), 1);
    }
}

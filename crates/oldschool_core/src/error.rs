//! # Engine Error Types
//!
//! Every error in this crate is fatal: it is detected at start-up or at the
//! presenter boundary, logged by the caller, and ends the process. The
//! per-frame production path has no error channel.

use thiserror::Error;

/// Errors that can occur while building or running the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Screen geometry with a zero dimension.
    #[error("invalid screen geometry: {width}x{height} (both dimensions must be non-zero)")]
    InvalidGeometry {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// A configuration value could not be understood.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The operating system refused to start a worker thread.
    #[error("could not create the {name} thread")]
    ThreadSpawn {
        /// Name of the thread that failed to start.
        name: &'static str,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The presenter failed to display a frame or to set itself up.
    #[error("presenter failure: {0}")]
    Presenter(String),

    /// A loop panicked instead of returning.
    #[error("the {0} loop panicked")]
    LoopPanicked(&'static str),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

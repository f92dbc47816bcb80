//! # OLDSCHOOL Core Engine
//!
//! Software-rendered demo effects with a double-buffered handoff between a
//! simulation thread and a presentation thread:
//! - Per-pixel effects computed from tables built once per geometry
//! - Packed RGBA frames, uploaded without conversion
//! - Single-threaded, slot-lock and channel handoffs behind one [`Engine`]
//!
//! ## Architecture Rules
//!
//! 1. **Tables are immutable** - Built by the effect constructor, shared by reference
//! 2. **No lock across `present`** - A slow display never stalls production
//! 3. **Joined shutdown** - `Engine::run` returns only after the simulation thread is gone
//!
//! ## Example
//!
//! ```rust,ignore
//! use oldschool_core::{DemoConfig, Engine, HeadlessPresenter, MonotonicClock};
//!
//! let engine = Engine::new(DemoConfig::default())?;
//! let report = engine.run(&mut HeadlessPresenter::new(600), &MonotonicClock::new())?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod effects;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod sync;

pub use config::{DemoConfig, Handoff, Scheduling, FULLSCREEN_SIZE, WINDOWED_SIZE};
pub use effects::{Effect, EffectKind, Tunnel, XorPattern};
pub use error::{EngineError, EngineResult};
pub use frame::{Frame, FrameBuffer, Geometry, Pixel};
pub use pipeline::{
    ticks_since, Clock, CountingClock, Engine, FpsCounter, HeadlessPresenter, ManualClock,
    MonotonicClock, Presenter, RunReport,
};
pub use sync::{HandoffPolicy, StopSignal};

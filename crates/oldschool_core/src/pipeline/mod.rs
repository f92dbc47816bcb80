//! # Frame Pipeline
//!
//! Everything between the effect and the display:
//!
//! - [`Clock`]: wrapping millisecond ticks
//! - [`Presenter`]: where finished frames go
//! - production and presentation loops for each handoff
//! - [`FpsCounter`]
//! - [`Engine`]: picks and drives the loops

mod clock;
mod engine;
mod fps;
mod presentation;
mod presenter;
mod production;

pub use clock::{ticks_since, Clock, CountingClock, ManualClock, MonotonicClock};
pub use engine::{Engine, RunReport, SIMULATION_THREAD};
pub use fps::{FpsCounter, FPS_INTERVAL_MS};
pub use presentation::{run_channel_presentation, run_slot_presentation, PresentationStats};
pub use presenter::{HeadlessPresenter, Presenter};
pub use production::{run_channel_production, run_slot_production, ProductionStats};

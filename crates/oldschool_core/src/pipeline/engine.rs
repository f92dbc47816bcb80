//! # Engine
//!
//! Owns the effect (and with it every lookup table) for one validated
//! geometry, and drives the loops selected by [`Scheduling`].
//!
//! ```text
//! single-threaded   caller thread: poll -> produce back -> present back -> swap
//!
//! dual-threaded     "simulation" (scoped)        caller thread
//!                   production loop  ──frames──▶ presentation loop
//!                          ▲                           │
//!                          └──── StopSignal ◀──────────┘ termination / error
//!                   exit / panic ──▶ StopSignal ──▶ presentation ends
//! ```
//!
//! The presentation loop runs on the calling thread, because windowing
//! handles usually must stay on the thread that created them. The simulation
//! thread is scoped: `run` never returns while it is still alive.

use std::thread;

use tracing::{debug, info};

use crate::config::{DemoConfig, Handoff, Scheduling};
use crate::effects::Effect;
use crate::error::{EngineError, EngineResult};
use crate::frame::Geometry;
use crate::sync::{frame_channel, DoubleBuffer, FrameStore, HandoffPolicy, StopSignal};

use super::clock::Clock;
use super::fps::FpsCounter;
use super::presentation::{run_channel_presentation, run_slot_presentation, PresentationStats};
use super::presenter::Presenter;
use super::production::{run_channel_production, run_slot_production, ProductionStats};

/// Name of the worker thread that produces frames.
pub const SIMULATION_THREAD: &str = "simulation";

/// Outcome of [`Engine::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Threading model the run used.
    pub scheduling: Scheduling,
    /// Frames the effect produced.
    pub produced: u64,
    /// Frames handed to the presenter.
    pub presented: u64,
    /// Presents that repeated an already shown frame.
    pub duplicates: u64,
    /// Produced frames that were never presented.
    pub lost: u64,
}

impl RunReport {
    fn combine(scheduling: Scheduling, production: ProductionStats, presentation: PresentationStats) -> Self {
        let lost = match scheduling {
            Scheduling::DualThreaded(Handoff::Channel(_)) => production.dropped,
            _ => production.cycles.saturating_sub(presentation.fresh()),
        };
        Self {
            scheduling,
            produced: production.cycles,
            presented: presentation.presented,
            duplicates: presentation.duplicates,
            lost,
        }
    }
}

/// Effect plus settings for one session.
pub struct Engine {
    config: DemoConfig,
    geometry: Geometry,
    effect: Box<dyn Effect>,
}

impl Engine {
    /// Validates the geometry and builds the configured effect.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidGeometry`] before anything is allocated
    /// if either dimension is zero.
    pub fn new(config: DemoConfig) -> EngineResult<Self> {
        let geometry = config.geometry()?;
        let effect = config.effect.build(geometry);
        Ok(Self::assemble(config, geometry, effect))
    }

    /// Like [`Engine::new`] but with a caller-supplied effect, built by
    /// `build` for the validated geometry. `config.effect` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidGeometry`] if either dimension is zero.
    pub fn with_effect<F>(config: DemoConfig, build: F) -> EngineResult<Self>
    where
        F: FnOnce(Geometry) -> Box<dyn Effect>,
    {
        let geometry = config.geometry()?;
        let effect = build(geometry);
        Ok(Self::assemble(config, geometry, effect))
    }

    fn assemble(config: DemoConfig, geometry: Geometry, effect: Box<dyn Effect>) -> Self {
        info!(
            width = geometry.width(),
            height = geometry.height(),
            effect = effect.name(),
            scheduling = %config.scheduling,
            "engine ready"
        );
        Self {
            config,
            geometry,
            effect,
        }
    }

    /// Settings this engine was built with.
    #[must_use]
    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// Screen geometry shared by every buffer and table.
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The effect producing the frames.
    #[must_use]
    pub fn effect(&self) -> &dyn Effect {
        self.effect.as_ref()
    }

    /// Runs until the presenter asks to stop or fails.
    ///
    /// In the dual-threaded modes the simulation thread is told to stop and
    /// joined before this returns, on success and on error alike.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ThreadSpawn`] if the simulation thread cannot start
    /// - any error returned by the presenter
    /// - [`EngineError::LoopPanicked`] if the simulation thread panicked
    pub fn run<P, C>(&self, presenter: &mut P, clock: &C) -> EngineResult<RunReport>
    where
        P: Presenter + ?Sized,
        C: Clock + ?Sized,
    {
        let scheduling = self.config.scheduling;
        info!(%scheduling, effect = self.effect.name(), "starting run");

        let report = match scheduling {
            Scheduling::SingleThreaded => self.run_single(presenter, clock)?,
            Scheduling::DualThreaded(Handoff::SlotLocks) => self.run_slot_locks(presenter, clock)?,
            Scheduling::DualThreaded(Handoff::Channel(policy)) => {
                self.run_channel(policy, presenter, clock)?
            }
        };

        info!(
            produced = report.produced,
            presented = report.presented,
            "run finished"
        );
        debug!(
            duplicates = report.duplicates,
            lost = report.lost,
            "frame pacing"
        );
        Ok(report)
    }

    fn fps_counter<C: Clock + ?Sized>(&self, clock: &C) -> Option<FpsCounter> {
        self.config
            .emit_fps
            .then(|| FpsCounter::new(clock.now_millis()))
    }

    fn run_single<P, C>(&self, presenter: &mut P, clock: &C) -> EngineResult<RunReport>
    where
        P: Presenter + ?Sized,
        C: Clock + ?Sized,
    {
        let mut buffers = DoubleBuffer::new(self.geometry);
        let mut fps = self.fps_counter(clock);
        let mut production = ProductionStats::default();
        let mut presentation = PresentationStats::default();

        while !presenter.termination_requested() {
            let ticks = clock.now_millis();
            let (front, back) = buffers.split();
            back.ticks = ticks;
            self.effect.produce(&front.buffer, &mut back.buffer, ticks, front.ticks);
            production.cycles += 1;
            production.per_slot[buffers.back_index()] += 1;

            presenter.present(&buffers.back().buffer)?;
            presentation.presented += 1;
            if let Some(fps) = fps.as_mut() {
                fps.record(clock.now_millis());
            }
            buffers.swap();
        }

        Ok(RunReport::combine(Scheduling::SingleThreaded, production, presentation))
    }

    fn run_slot_locks<P, C>(&self, presenter: &mut P, clock: &C) -> EngineResult<RunReport>
    where
        P: Presenter + ?Sized,
        C: Clock + ?Sized,
    {
        let store = FrameStore::new(self.geometry);
        let stop = StopSignal::new();
        let effect = self.effect.as_ref();
        let mut fps = self.fps_counter(clock);

        let (production, presentation) = thread::scope(|scope| {
            let simulation = thread::Builder::new()
                .name(SIMULATION_THREAD.into())
                .spawn_scoped(scope, || {
                    let _stop = stop.raise_on_drop();
                    run_slot_production(effect, &store, clock, &stop)
                })
                .map_err(|source| EngineError::ThreadSpawn {
                    name: SIMULATION_THREAD,
                    source,
                })?;

            let presentation = {
                let _stop = stop.raise_on_drop();
                run_slot_presentation(&store, presenter, clock, &stop, fps.as_mut())
            };
            let production = simulation
                .join()
                .map_err(|_| EngineError::LoopPanicked(SIMULATION_THREAD))?;
            Ok::<_, EngineError>((production, presentation))
        })?;

        Ok(RunReport::combine(
            Scheduling::DualThreaded(Handoff::SlotLocks),
            production,
            presentation?,
        ))
    }

    fn run_channel<P, C>(
        &self,
        policy: HandoffPolicy,
        presenter: &mut P,
        clock: &C,
    ) -> EngineResult<RunReport>
    where
        P: Presenter + ?Sized,
        C: Clock + ?Sized,
    {
        let (sender, receiver) = frame_channel(self.geometry, policy);
        let stop = StopSignal::new();
        let effect = self.effect.as_ref();
        let mut fps = self.fps_counter(clock);

        let (production, presentation) = thread::scope(|scope| {
            let stop = &stop;
            let simulation = thread::Builder::new()
                .name(SIMULATION_THREAD.into())
                .spawn_scoped(scope, move || {
                    let _stop = stop.raise_on_drop();
                    run_channel_production(effect, sender, clock, stop)
                })
                .map_err(|source| EngineError::ThreadSpawn {
                    name: SIMULATION_THREAD,
                    source,
                })?;

            // the receiver is dropped when presentation returns, which wakes
            // a producer blocked on the channel
            let presentation = {
                let _stop = stop.raise_on_drop();
                run_channel_presentation(receiver, presenter, clock, stop, fps.as_mut())
            };
            let production = simulation
                .join()
                .map_err(|_| EngineError::LoopPanicked(SIMULATION_THREAD))?;
            Ok::<_, EngineError>((production, presentation))
        })?;

        Ok(RunReport::combine(
            Scheduling::DualThreaded(Handoff::Channel(policy)),
            production,
            presentation?,
        ))
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("geometry", &self.geometry)
            .field("effect", &self.effect.name())
            .field("scheduling", &self.config.scheduling)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectKind;
    use crate::frame::{FrameBuffer, Pixel};
    use crate::pipeline::clock::{CountingClock, ManualClock};
    use crate::pipeline::presenter::HeadlessPresenter;

    fn config(scheduling: Scheduling) -> DemoConfig {
        DemoConfig {
            width: 4,
            height: 4,
            effect: EffectKind::Xor,
            scheduling,
            ..DemoConfig::default()
        }
    }

    #[test]
    fn test_invalid_geometry_fails_before_run() {
        let err = Engine::new(DemoConfig {
            width: 0,
            ..DemoConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidGeometry { width: 0, .. }));
    }

    #[test]
    fn test_single_threaded_run() {
        let engine = Engine::new(config(Scheduling::SingleThreaded)).unwrap();
        let mut presenter = HeadlessPresenter::new(5);

        let report = engine.run(&mut presenter, &ManualClock::default()).unwrap();

        assert_eq!(report.produced, 5);
        assert_eq!(report.presented, 5);
        assert_eq!((report.duplicates, report.lost), (0, 0));
        assert_eq!(presenter.last().unwrap().pixel(3, 2), Pixel::new(1, 128, 127, 255));
    }

    #[test]
    fn test_single_threaded_passes_previous_ticks() {
        struct PrevTicks;
        impl Effect for PrevTicks {
            fn name(&self) -> &'static str {
                "prev-ticks"
            }
            #[allow(clippy::cast_possible_truncation)]
            fn produce(&self, front: &FrameBuffer, back: &mut FrameBuffer, ticks: u32, prev: u32) {
                back.pixels_mut()[0] = Pixel::new(ticks as u8, prev as u8, front.pixels()[0].r, 255);
            }
        }

        let engine = Engine::with_effect(config(Scheduling::SingleThreaded), |_| Box::new(PrevTicks)).unwrap();
        let mut presenter = HeadlessPresenter::new(3);

        engine.run(&mut presenter, &CountingClock::new(10, 10)).unwrap();

        // third frame: ticks 30, previous 20, previous frame's red channel 20
        assert_eq!(presenter.last().unwrap().pixel(0, 0), Pixel::new(30, 20, 20, 255));
    }

    #[test]
    fn test_every_threaded_mode_stops_and_joins() {
        for handoff in [
            Handoff::SlotLocks,
            Handoff::Channel(HandoffPolicy::DropOldest),
            Handoff::Channel(HandoffPolicy::BlockProducer),
        ] {
            let engine = Engine::new(config(Scheduling::DualThreaded(handoff))).unwrap();
            let mut presenter = HeadlessPresenter::new(20);

            let report = engine.run(&mut presenter, &CountingClock::new(1, 1)).unwrap();

            assert_eq!(report.presented, 20, "{handoff}");
            if let Handoff::Channel(_) = handoff {
                // the channel consumer waits for the first frame; the slot
                // consumer may run ahead of the producer and show blank slots
                assert!(report.produced >= 1, "{handoff}");
                assert_eq!(presenter.last().unwrap().pixel(3, 2), Pixel::new(1, 128, 127, 255));
            }
        }
    }

    #[test]
    fn test_presenter_error_stops_producer() {
        for handoff in [Handoff::SlotLocks, Handoff::Channel(HandoffPolicy::BlockProducer)] {
            let engine = Engine::new(config(Scheduling::DualThreaded(handoff))).unwrap();
            let mut presenter = HeadlessPresenter::new(100).failing_at(4);

            let err = engine.run(&mut presenter, &CountingClock::new(1, 1)).unwrap_err();

            assert!(matches!(err, EngineError::Presenter(_)), "{handoff}");
            assert_eq!(presenter.presented(), 3);
        }
    }
}

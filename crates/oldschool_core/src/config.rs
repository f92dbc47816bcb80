//! # Demo Configuration
//!
//! Settings arrive here already resolved: the binary parses the command
//! line, the core only validates. The one derived value is the screen size,
//! which depends on whether the demo runs fullscreen.

use std::fmt;
use std::str::FromStr;

use crate::effects::EffectKind;
use crate::error::{EngineError, EngineResult};
use crate::frame::Geometry;
use crate::sync::HandoffPolicy;

/// Window size when nothing else is requested.
pub const WINDOWED_SIZE: (u32, u32) = (640, 480);

/// Screen size for fullscreen mode without an explicit size.
pub const FULLSCREEN_SIZE: (u32, u32) = (1920, 1080);

/// How the simulation and presentation threads exchange frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handoff {
    /// Two slots with one lock each; free running, frames may be lost or
    /// repeated.
    SlotLocks,
    /// Ownership transfer over a channel with an explicit policy.
    Channel(HandoffPolicy),
}

impl Default for Handoff {
    fn default() -> Self {
        Self::Channel(HandoffPolicy::default())
    }
}

impl fmt::Display for Handoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlotLocks => f.write_str("locks"),
            Self::Channel(policy) => fmt::Display::fmt(policy, f),
        }
    }
}

impl FromStr for Handoff {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "locks" | "slot-locks" => Ok(Self::SlotLocks),
            other => other.parse().map(Self::Channel).map_err(|_| {
                EngineError::InvalidConfig(format!(
                    "unknown handoff '{other}' (expected 'locks', 'drop-oldest' or 'block')"
                ))
            }),
        }
    }
}

/// Threading model of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheduling {
    /// One control flow: poll, produce, present, swap.
    SingleThreaded,
    /// A simulation thread and a presentation thread.
    DualThreaded(Handoff),
}

impl Scheduling {
    /// Builds the scheduling for a thread count given on the command line.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] for anything but 1 or 2.
    pub fn from_threads(threads: u32, handoff: Handoff) -> EngineResult<Self> {
        match threads {
            1 => Ok(Self::SingleThreaded),
            2 => Ok(Self::DualThreaded(handoff)),
            n => Err(EngineError::InvalidConfig(format!(
                "unsupported thread count {n} (expected 1 or 2)"
            ))),
        }
    }
}

impl Default for Scheduling {
    fn default() -> Self {
        Self::DualThreaded(Handoff::default())
    }
}

impl fmt::Display for Scheduling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleThreaded => f.write_str("single-threaded"),
            Self::DualThreaded(handoff) => write!(f, "dual-threaded ({handoff})"),
        }
    }
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Screen width in pixels.
    pub width: u32,
    /// Screen height in pixels.
    pub height: u32,
    /// Borderless window covering the screen.
    pub fullscreen: bool,
    /// Cap presentation at the display rate.
    pub vsync: bool,
    /// Log the frame rate every few seconds.
    pub emit_fps: bool,
    /// Which effect to run.
    pub effect: EffectKind,
    /// Threading model.
    pub scheduling: Scheduling,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: WINDOWED_SIZE.0,
            height: WINDOWED_SIZE.1,
            fullscreen: false,
            vsync: false,
            emit_fps: false,
            effect: EffectKind::default(),
            scheduling: Scheduling::default(),
        }
    }
}

impl DemoConfig {
    /// Picks the screen size: explicit values win, otherwise the fullscreen
    /// or windowed default.
    #[must_use]
    pub fn resolve_size(fullscreen: bool, width: Option<u32>, height: Option<u32>) -> (u32, u32) {
        let (default_width, default_height) = if fullscreen {
            FULLSCREEN_SIZE
        } else {
            WINDOWED_SIZE
        };
        (width.unwrap_or(default_width), height.unwrap_or(default_height))
    }

    /// Validated geometry for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidGeometry`] if either dimension is zero.
    pub fn geometry(&self) -> EngineResult<Geometry> {
        Geometry::new(self.width, self.height)
    }

    /// Replaces the requested size with the drawable size a window
    /// reported, which may differ from what was asked for.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if a dimension does not fit a
    /// `u32` and [`EngineError::InvalidGeometry`] if either is zero.
    pub fn with_drawable_size(mut self, width: usize, height: usize) -> EngineResult<Self> {
        let dimension = |value: usize| {
            u32::try_from(value)
                .map_err(|_| EngineError::InvalidConfig(format!("drawable size {width}x{height} out of range")))
        };
        self.width = dimension(width)?;
        self.height = dimension(height)?;
        self.geometry()?;
        Ok(self)
    }
}

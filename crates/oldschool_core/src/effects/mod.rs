//! # Procedural Effects
//!
//! An effect is a pure function from `(pixel position, ticks, tables)` to a
//! full output buffer. Tables are built once by the effect's constructor and
//! never change afterwards, so one effect can be shared by reference between
//! the simulation and presentation threads.
//!
//! | Effect       | Tables                        | Time-dependent |
//! |--------------|-------------------------------|----------------|
//! | [`XorPattern`] | [`XorTexture`]              | no             |
//! | [`Tunnel`]     | [`XorTexture`] + [`DistortionTable`] | yes     |

mod tables;
mod tunnel;
mod xor;

use std::fmt;
use std::str::FromStr;

pub use tables::{
    DistortionTable, Polar, TexCoord, XorTexture, ANGULAR_REPEATS, CORRECTION, TEXTURE_MASK,
    TEXTURE_SIZE,
};
pub use tunnel::Tunnel;
pub use xor::XorPattern;

use crate::error::EngineError;
use crate::frame::{FrameBuffer, Geometry};

/// Computes one frame.
pub trait Effect: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Writes every pixel of `back`.
    ///
    /// `front` is the previously produced frame and `prev_ticks` the tick it
    /// was produced at. Effects that ignore `front` may receive a stand-in
    /// buffer of the right size; see [`Effect::reads_front`].
    fn produce(&self, front: &FrameBuffer, back: &mut FrameBuffer, ticks: u32, prev_ticks: u32);

    /// Whether [`Effect::produce`] looks at the contents of `front`.
    ///
    /// When false the threaded producers skip keeping a copy of the last
    /// frame.
    fn reads_front(&self) -> bool {
        false
    }
}

/// Selects one of the built-in effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EffectKind {
    /// Static XOR bit pattern with a vertical green/blue ramp.
    Xor,
    /// Scrolling XOR texture mapped onto a tunnel.
    #[default]
    Tunnel,
}

impl EffectKind {
    /// Builds the effect and its tables for `geometry`.
    #[must_use]
    pub fn build(self, geometry: Geometry) -> Box<dyn Effect> {
        match self {
            Self::Xor => Box::new(XorPattern::new(geometry)),
            Self::Tunnel => Box::new(Tunnel::new(geometry)),
        }
    }

    /// Command-line name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xor => "xor",
            Self::Tunnel => "tunnel",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xor" => Ok(Self::Xor),
            "tunnel" => Ok(Self::Tunnel),
            other => Err(EngineError::InvalidConfig(format!(
                "unknown effect '{other}' (expected 'xor' or 'tunnel')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_kind_round_trip_names() {
        for kind in [EffectKind::Xor, EffectKind::Tunnel] {
            assert_eq!(kind.as_str().parse::<EffectKind>().unwrap(), kind);
        }
        assert_eq!("TUNNEL".parse::<EffectKind>().unwrap(), EffectKind::Tunnel);
    }

    #[test]
    fn test_unknown_effect_is_config_error() {
        let err = "plasma".parse::<EffectKind>().unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
        assert!(err.to_string().contains("plasma"));
    }

    #[test]
    fn test_build_names() {
        let geometry = Geometry::new(8, 8).unwrap();
        assert_eq!(EffectKind::Xor.build(geometry).name(), "xor");
        assert_eq!(EffectKind::Tunnel.build(geometry).name(), "tunnel");
    }
}

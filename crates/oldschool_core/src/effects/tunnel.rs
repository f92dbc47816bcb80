//! Tunnel effect.
//!
//! Each frame is a table lookup: the precomputed [`TexCoord`] of a pixel is
//! scrolled by the tick count and used to sample the XOR texture. `u`
//! scrolls twice as fast as `v`, so the rings recede while the wall turns.

use super::tables::{DistortionTable, TexCoord, XorTexture};
use super::Effect;
use crate::frame::{FrameBuffer, Geometry, Pixel};

/// XOR texture projected onto a cylinder seen from inside.
#[derive(Debug, Clone)]
pub struct Tunnel {
    texture: XorTexture,
    table: DistortionTable,
}

impl Tunnel {
    /// Builds both tables for `geometry`.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            texture: XorTexture::new(),
            table: DistortionTable::new(geometry),
        }
    }

    /// The per-pixel projection table.
    #[must_use]
    pub fn table(&self) -> &DistortionTable {
        &self.table
    }

    /// Color of a pixel whose table entry is `coord`, at `ticks`.
    #[inline]
    #[must_use]
    pub fn shade(&self, coord: TexCoord, ticks: u32) -> Pixel {
        let TexCoord { u, v } = coord.scrolled(ticks);
        Pixel::opaque(0, 0, self.texture.sample(u, v))
    }
}

impl Effect for Tunnel {
    fn name(&self) -> &'static str {
        "tunnel"
    }

    fn produce(&self, _front: &FrameBuffer, back: &mut FrameBuffer, ticks: u32, _prev_ticks: u32) {
        debug_assert_eq!(back.geometry(), self.table.geometry());
        for (px, &coord) in back.pixels_mut().iter_mut().zip(self.table.coords()) {
            *px = self.shade(coord, ticks);
        }
    }
}

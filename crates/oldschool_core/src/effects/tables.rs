//! # Lookup Tables
//!
//! Both tables are computed once from the screen geometry and are immutable
//! afterwards.
//!
//! ## Tunnel projection
//!
//! ```text
//! scale      = max(width - 1, height - 1)
//! (cx, cy)   = ((x - width/2) / scale, (y - height/2) / scale)
//! dist       = |(cx, cy)|            angle = atan2(cy, cx) in (-pi, pi]
//! projected  = (dist - 1) / dist     edge -> 0, center -> -infinity
//! (u, v)     = (6 / 2pi) * 255 * (projected, angle), truncated
//! ```
//!
//! The exact center (`dist == 0`) has no projection; it is pinned to
//! [`TexCoord::VANISHING_POINT`].

use std::f64::consts::PI;

use crate::frame::Geometry;

/// Side length of the XOR texture.
pub const TEXTURE_SIZE: usize = 256;

/// Bit mask equivalent to `mod TEXTURE_SIZE` for any `i32`, negative included.
pub const TEXTURE_MASK: i32 = 0xFF;

/// Number of times the texture repeats around the tunnel wall.
pub const ANGULAR_REPEATS: f64 = 6.0;

/// Angular correction factor, `ANGULAR_REPEATS / 2pi`.
pub const CORRECTION: f64 = ANGULAR_REPEATS / (2.0 * PI);

/// 256x256 texture with `texel(x, y) == x ^ y`.
#[derive(Clone)]
pub struct XorTexture {
    texels: Box<[u8]>,
}

impl XorTexture {
    /// Generates the texture.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new() -> Self {
        let mut texels = vec![0u8; TEXTURE_SIZE * TEXTURE_SIZE].into_boxed_slice();
        for (y, row) in texels.chunks_exact_mut(TEXTURE_SIZE).enumerate() {
            for (x, texel) in row.iter_mut().enumerate() {
                *texel = (x ^ y) as u8;
            }
        }
        Self { texels }
    }

    /// Texel at `(x mod 256, y mod 256)`.
    #[inline]
    #[must_use]
    pub fn texel(&self, x: usize, y: usize) -> u8 {
        self.texels[(y % TEXTURE_SIZE) * TEXTURE_SIZE + x % TEXTURE_SIZE]
    }

    /// Texel at `(u & 0xFF, v & 0xFF)`.
    ///
    /// Masking keeps the low 8 bits of the two's complement value, so
    /// `-1` samples column 255.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn sample(&self, u: i32, v: i32) -> u8 {
        let column = (u & TEXTURE_MASK) as usize;
        let row = (v & TEXTURE_MASK) as usize;
        self.texels[row * TEXTURE_SIZE + column]
    }
}

impl Default for XorTexture {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for XorTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XorTexture").field("size", &TEXTURE_SIZE).finish()
    }
}

/// Polar decomposition of a centered, normalized screen position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    /// Distance from the screen center.
    pub dist: f64,
    /// Angle in `(-pi, pi]`.
    pub angle: f64,
    /// Projective radial remap `(dist - 1) / dist`.
    pub projected: f64,
}

impl Polar {
    /// Decomposes the centered coordinates `(cx, cy)`.
    ///
    /// At the exact center `projected` is negative infinity.
    #[must_use]
    pub fn from_centered(cx: f64, cy: f64) -> Self {
        let dist = cx.hypot(cy);
        Self {
            dist,
            angle: cy.atan2(cx),
            projected: (dist - 1.0) / dist,
        }
    }

    /// True for the singular screen center.
    #[inline]
    #[must_use]
    pub fn is_center(&self) -> bool {
        self.dist == 0.0
    }
}

/// Integer texture coordinate of one screen pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TexCoord {
    /// Depth coordinate (along the tunnel).
    pub u: i32,
    /// Angular coordinate (around the tunnel).
    pub v: i32,
}

impl TexCoord {
    /// Coordinate assigned to the exact screen center.
    pub const VANISHING_POINT: Self = Self { u: 0, v: 0 };

    /// Maps a polar position onto the cylinder.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_polar(polar: Polar) -> Self {
        if polar.is_center() {
            return Self::VANISHING_POINT;
        }
        let texel_span = (TEXTURE_SIZE - 1) as f64;
        Self {
            u: (CORRECTION * texel_span * polar.projected) as i32,
            v: (CORRECTION * texel_span * polar.angle) as i32,
        }
    }

    /// Coordinate after `ticks` of scrolling.
    ///
    /// `u` advances one texel per tick and `v` one texel per two ticks.
    /// Arithmetic wraps; only the low 8 bits are ever sampled.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn scrolled(self, ticks: u32) -> Self {
        Self {
            u: self.u.wrapping_add(ticks as i32),
            v: self.v.wrapping_add((ticks / 2) as i32),
        }
    }
}

/// Per-pixel tunnel texture coordinates, row-major.
#[derive(Clone)]
pub struct DistortionTable {
    geometry: Geometry,
    coords: Box<[TexCoord]>,
}

impl DistortionTable {
    /// Projects every pixel of `geometry` onto the tunnel.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        let mut coords = Vec::with_capacity(geometry.pixel_count());
        for y in 0..geometry.height() {
            for x in 0..geometry.width() {
                coords.push(TexCoord::from_polar(Self::polar(geometry, x, y)));
            }
        }
        Self {
            geometry,
            coords: coords.into_boxed_slice(),
        }
    }

    /// Polar decomposition of pixel `(x, y)` for `geometry`.
    ///
    /// A 1x1 screen has a zero scale; it is clamped to 1 so the single
    /// pixel lands on the center.
    #[must_use]
    pub fn polar(geometry: Geometry, x: u32, y: u32) -> Polar {
        let scale = f64::from(geometry.width().max(geometry.height()) - 1).max(1.0);
        let cx = f64::from(signed_offset(x, geometry.width() >> 1)) / scale;
        let cy = f64::from(signed_offset(y, geometry.height() >> 1)) / scale;
        Polar::from_centered(cx, cy)
    }

    /// Geometry the table was built for.
    #[inline]
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Number of entries (`width * height`).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Always false; geometry is never empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Entry for pixel `(x, y)`.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> TexCoord {
        self.coords[self.geometry.index(x, y)]
    }

    /// All entries, row-major.
    #[inline]
    #[must_use]
    pub fn coords(&self) -> &[TexCoord] {
        &self.coords
    }
}

impl std::fmt::Debug for DistortionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistortionTable")
            .field("geometry", &self.geometry)
            .field("len", &self.coords.len())
            .finish()
    }
}

/// `a - b` for screen coordinates, exact in `i32` for any `u32` pair that
/// fits a screen.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn signed_offset(a: u32, b: u32) -> i32 {
    (i64::from(a) - i64::from(b)) as i32
}

//! # Frame Data Model
//!
//! ```text
//! Pixel       = [r, g, b, a]            4 bytes, no padding
//! FrameBuffer = width * height Pixels   row-major, origin top-left
//! Frame       = FrameBuffer + ticks     one slot of the double buffer
//! ```
//!
//! Buffers are sized once from a validated [`Geometry`] and never resized.

use bytemuck::{Pod, Zeroable};

use crate::error::{EngineError, EngineResult};

/// One RGBA pixel, tightly packed.
///
/// The layout matches an `RGBA8` texture upload byte for byte.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Pixel {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

const _: () = assert!(std::mem::size_of::<Pixel>() == 4);
const _: () = assert!(std::mem::align_of::<Pixel>() == 1);

impl Pixel {
    /// Fully transparent black.
    pub const CLEAR: Self = Self::new(0, 0, 0, 0);

    /// Creates a pixel from its four channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque pixel.
    #[inline]
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Packs the color channels as `0x00RRGGBB` (alpha is dropped).
    #[inline]
    #[must_use]
    pub const fn to_0rgb(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Validated screen dimensions.
///
/// Both dimensions are non-zero; every table and buffer in the engine is
/// sized from one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    width: u32,
    height: u32,
}

impl Geometry {
    /// Validates and creates a geometry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidGeometry`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> EngineResult<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidGeometry { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(self) -> u32 {
        self.height
    }

    /// Total number of pixels.
    #[inline]
    #[must_use]
    pub const fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major index of `(x, y)`.
    #[inline]
    #[must_use]
    pub const fn index(self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// A full-screen pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    geometry: Geometry,
    pixels: Vec<Pixel>,
}

impl FrameBuffer {
    /// Allocates a cleared buffer for `geometry`.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            pixels: vec![Pixel::CLEAR; geometry.pixel_count()],
        }
    }

    /// Geometry this buffer was allocated for.
    #[inline]
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.geometry.width()
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.geometry.height()
    }

    /// All pixels, row-major.
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// All pixels, row-major, writable.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// The buffer as raw `RGBA8` bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer.
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        assert!(x < self.width() && y < self.height(), "pixel ({x}, {y}) out of bounds");
        self.pixels[self.geometry.index(x, y)]
    }

    /// Iterates over the rows, top to bottom.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [Pixel]> {
        self.pixels.chunks_exact_mut(self.geometry.width() as usize)
    }

    /// Overwrites this buffer with the contents of `other`.
    ///
    /// # Panics
    ///
    /// Panics if the geometries differ.
    pub fn copy_from(&mut self, other: &FrameBuffer) {
        assert_eq!(self.geometry, other.geometry, "frame geometry mismatch");
        self.pixels.copy_from_slice(&other.pixels);
    }
}

/// One slot of the double buffer: pixels plus the tick they were written at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The pixels.
    pub buffer: FrameBuffer,
    /// Clock value when `buffer` was last produced.
    pub ticks: u32,
}

impl Frame {
    /// Allocates a cleared frame at tick 0.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            buffer: FrameBuffer::new(geometry),
            ticks: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_is_packed() {
        let pixels = [Pixel::new(1, 2, 3, 4), Pixel::new(5, 6, 7, 8)];
        let bytes: &[u8] = bytemuck::cast_slice(&pixels);
        assert_eq!(bytes, &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_pixel_to_0rgb() {
        assert_eq!(Pixel::opaque(0x12, 0x34, 0x56).to_0rgb(), 0x0012_3456);
    }

    #[test]
    fn test_geometry_rejects_zero() {
        assert!(matches!(
            Geometry::new(0, 10),
            Err(EngineError::InvalidGeometry { width: 0, height: 10 })
        ));
        assert!(Geometry::new(10, 0).is_err());
        assert!(Geometry::new(1, 1).is_ok());
    }

    #[test]
    fn test_buffer_is_row_major() {
        let geometry = Geometry::new(3, 2).unwrap();
        let mut buffer = FrameBuffer::new(geometry);
        assert_eq!(buffer.pixels().len(), 6);

        for (y, row) in buffer.rows_mut().enumerate() {
            for (x, px) in row.iter_mut().enumerate() {
                *px = Pixel::opaque(x as u8, y as u8, 0);
            }
        }

        assert_eq!(buffer.pixel(2, 1), Pixel::opaque(2, 1, 0));
        assert_eq!(buffer.pixels()[geometry.index(2, 1)], Pixel::opaque(2, 1, 0));
        assert_eq!(buffer.as_bytes().len(), 24);
    }

    #[test]
    #[should_panic(expected = "frame geometry mismatch")]
    fn test_copy_from_requires_same_geometry() {
        let mut a = FrameBuffer::new(Geometry::new(2, 2).unwrap());
        let b = FrameBuffer::new(Geometry::new(3, 2).unwrap());
        a.copy_from(&b);
    }
}

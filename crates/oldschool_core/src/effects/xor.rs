//! XOR bit pattern.
//!
//! The minimal effect: a time-invariant function of `(x, y, height)`.

use super::tables::XorTexture;
use super::Effect;
use crate::frame::{FrameBuffer, Geometry, Pixel};

/// Static XOR pattern with a green-to-blue vertical ramp.
///
/// ```text
/// r = texture[y mod 256][x mod 256]
/// g = round(255 * y / height)
/// b = 255 - g
/// a = 255
/// ```
#[derive(Debug, Clone)]
pub struct XorPattern {
    texture: XorTexture,
    height: f64,
}

impl XorPattern {
    /// Builds the texture for `geometry`.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            texture: XorTexture::new(),
            height: f64::from(geometry.height()),
        }
    }

    /// Vertical ramp value for row `y`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn ramp(&self, y: usize) -> u8 {
        (255.0 * y as f64 / self.height).round() as u8
    }
}

impl Effect for XorPattern {
    fn name(&self) -> &'static str {
        "xor"
    }

    fn produce(&self, _front: &FrameBuffer, back: &mut FrameBuffer, _ticks: u32, _prev_ticks: u32) {
        for (y, row) in back.rows_mut().enumerate() {
            let ramp = self.ramp(y);
            for (x, px) in row.iter_mut().enumerate() {
                *px = Pixel::opaque(self.texture.texel(x, y), ramp, 255 - ramp);
            }
        }
    }
}

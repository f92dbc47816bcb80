//! Integration tests for the effects through the public API.

use std::f64::consts::PI;

use oldschool_core::effects::{DistortionTable, TexCoord, XorTexture, TEXTURE_SIZE};
use oldschool_core::{Effect, EffectKind, FrameBuffer, Geometry, Pixel, Tunnel, XorPattern};

fn render(effect: &dyn Effect, geometry: Geometry, ticks: u32) -> FrameBuffer {
    let front = FrameBuffer::new(geometry);
    let mut back = FrameBuffer::new(geometry);
    effect.produce(&front, &mut back, ticks, 0);
    back
}

#[test]
fn test_texture_is_x_xor_y() {
    let texture = XorTexture::new();
    for y in 0..TEXTURE_SIZE {
        for x in 0..TEXTURE_SIZE {
            assert_eq!(usize::from(texture.texel(x, y)), x ^ y);
        }
    }
}

#[test]
fn test_xor_end_to_end_4x4() {
    let geometry = Geometry::new(4, 4).unwrap();
    let frame = render(&XorPattern::new(geometry), geometry, 0);
    assert_eq!(frame.pixel(3, 2), Pixel::new(1, 128, 127, 255));
}

#[test]
fn test_xor_ignores_front_and_ticks() {
    let geometry = Geometry::new(37, 23).unwrap();
    let effect = EffectKind::Xor.build(geometry);
    let reference = render(effect.as_ref(), geometry, 0);

    let mut noisy_front = FrameBuffer::new(geometry);
    for (i, px) in noisy_front.pixels_mut().iter_mut().enumerate() {
        *px = Pixel::opaque((i * 7) as u8, (i * 13) as u8, (i * 31) as u8);
    }
    for ticks in [1, 999, u32::MAX] {
        let mut back = FrameBuffer::new(geometry);
        effect.produce(&noisy_front, &mut back, ticks, ticks.wrapping_sub(16));
        assert_eq!(back, reference, "ticks {ticks}");
    }
}

#[test]
fn test_tunnel_table_shape() {
    let geometry = Geometry::new(40, 30).unwrap();
    let table = DistortionTable::new(geometry);
    assert_eq!(table.len(), 40 * 30);

    for y in 0..30 {
        for x in 0..40 {
            let polar = DistortionTable::polar(geometry, x, y);
            assert!(polar.angle > -PI && polar.angle <= PI, "({x}, {y})");
        }
    }
}

#[test]
fn test_tunnel_center_is_deterministic() {
    let geometry = Geometry::new(4, 4).unwrap();
    let tunnel = Tunnel::new(geometry);
    assert_eq!(tunnel.table().get(2, 2), TexCoord::VANISHING_POINT);

    // the center samples texel (ticks, ticks / 2)
    assert_eq!(render(&tunnel, geometry, 0).pixel(2, 2), Pixel::opaque(0, 0, 0));
    assert_eq!(render(&tunnel, geometry, 100).pixel(2, 2), Pixel::opaque(0, 0, 100 ^ 50));
}

#[test]
fn test_tunnel_scroll_rates() {
    let table = DistortionTable::new(Geometry::new(16, 16).unwrap());
    let coord = table.get(5, 11);
    for (ticks, delta) in [(0, 7), (1000, 8), (41, 1)] {
        let before = coord.scrolled(ticks);
        let after = coord.scrolled(ticks + delta);
        assert_eq!(after.u - before.u, delta as i32);
        assert_eq!(after.v - before.v, ((ticks + delta) / 2 - ticks / 2) as i32);
    }
}

#[test]
fn test_tunnel_scrolls_smoothly_across_tick_wrap() {
    let table = DistortionTable::new(Geometry::new(8, 8).unwrap());
    let coord = table.get(1, 6);
    let before = coord.scrolled(u32::MAX - 2);
    let after = coord.scrolled((u32::MAX - 2).wrapping_add(5));

    assert_eq!(after.u.wrapping_sub(before.u) & 0xFF, 5);
    // v steps by at most one texel per two ticks, modulo the texture
    let v_step = after.v.wrapping_sub(before.v) & 0xFF;
    assert!(v_step <= 3, "v jumped by {v_step}");
}

#[test]
fn test_tunnel_frames_change_over_time() {
    let geometry = Geometry::new(32, 24).unwrap();
    let tunnel = EffectKind::Tunnel.build(geometry);
    assert_ne!(render(tunnel.as_ref(), geometry, 0), render(tunnel.as_ref(), geometry, 37));
}

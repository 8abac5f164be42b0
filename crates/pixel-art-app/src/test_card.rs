use glam::Vec4;
use pixel_art_core::Image;

/// Procedural image shown when no input file is given: a hue sweep across,
/// a brightness ramp down, and a checkerboard in the lower band so both
/// block snapping and colour banding are visible.
pub fn test_card(width: u32, height: u32) -> Image {
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    Image::from_fn(width, height, |x, y| {
        let u = (x as f32 + 0.5) / w;
        let v = (y as f32 + 0.5) / h;
        if v > 0.8 {
            let check = ((x / 16) + (y / 16)) % 2 == 0;
            return if check { Vec4::ONE } else { Vec4::new(0.0, 0.0, 0.0, 1.0) };
        }
        let rgb = hue(u) * (1.0 - v);
        rgb.extend(1.0)
    })
}

fn hue(t: f32) -> glam::Vec3 {
    let k = glam::Vec3::new(0.0, 2.0 / 3.0, 1.0 / 3.0);
    let p = ((glam::Vec3::splat(t) + k).fract() * 6.0 - 3.0).abs();
    (p - 1.0).clamp(glam::Vec3::ZERO, glam::Vec3::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_requested_size() {
        let card = test_card(64, 48);
        assert_eq!((card.width(), card.height()), (64, 48));
        assert_eq!(card.pixels().len(), 64 * 48);
    }

    #[test]
    fn is_opaque_and_in_range() {
        let card = test_card(40, 30);
        for p in card.pixels() {
            assert_eq!(p.w, 1.0);
            assert!(p.cmpge(Vec4::ZERO).all() && p.cmple(Vec4::ONE).all(), "{p:?}");
        }
    }

    #[test]
    fn is_not_flat() {
        let card = test_card(32, 32);
        assert_ne!(card.texel(0, 0), card.texel(31, 0));
        assert_ne!(card.texel(0, 0), card.texel(0, 20));
    }

    #[test]
    fn empty_card() {
        assert!(test_card(0, 0).is_empty());
    }
}

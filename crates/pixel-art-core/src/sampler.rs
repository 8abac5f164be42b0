use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::{Image, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Nearest,
    Linear,
}

/// What happens to coordinates outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AddressMode {
    #[default]
    #[serde(rename = "clamp")]
    ClampToEdge,
    #[serde(rename = "repeat")]
    Repeat,
    #[serde(rename = "mirror")]
    MirrorRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sampler {
    pub filter: FilterMode,
    pub address_mode: AddressMode,
}

impl Sampler {
    pub fn sample(&self, image: &Image, uv: Vec2) -> Vec4 {
        if image.is_empty() {
            return Vec4::ZERO;
        }
        let (w, h) = (image.width() as i64, image.height() as i64);
        let texel = |x: i64, y: i64| {
            let x = self.address_mode.resolve(x, w);
            let y = self.address_mode.resolve(y, h);
            image.texel(x, y)
        };

        let pos = uv * Vec2::new(w as f32, h as f32);
        match self.filter {
            FilterMode::Nearest => texel(pos.x.floor() as i64, pos.y.floor() as i64),
            FilterMode::Linear => {
                let p = pos - 0.5;
                let base = p.floor();
                let t = p - base;
                let (x0, y0) = (base.x as i64, base.y as i64);
                let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));
                let top = texel(x0, y0).lerp(texel(x1, y0), t.x);
                let bottom = texel(x0, y1).lerp(texel(x1, y1), t.x);
                top.lerp(bottom, t.y)
            }
        }
    }
}

impl AddressMode {
    /// Map a possibly out-of-range texel index into `[0, size)`.
    fn resolve(self, i: i64, size: i64) -> u32 {
        let i = match self {
            AddressMode::ClampToEdge => i.clamp(0, size - 1),
            AddressMode::Repeat => i.rem_euclid(size),
            AddressMode::MirrorRepeat => {
                let period = i.rem_euclid(2 * size);
                if period < size {
                    period
                } else {
                    2 * size - 1 - period
                }
            }
        };
        i as u32
    }
}

// ---------------------------------------------------------------------------
// SampledImage: texture + sampler pair
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct SampledImage<'a> {
    pub image: &'a Image,
    pub sampler: Sampler,
}

impl<'a> SampledImage<'a> {
    pub fn new(image: &'a Image, sampler: Sampler) -> Self {
        Self { image, sampler }
    }
}

impl Source for SampledImage<'_> {
    fn sample(&self, uv: Vec2) -> Vec4 {
        self.sampler.sample(self.image, uv)
    }
}

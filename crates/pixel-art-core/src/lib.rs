pub mod filter;
pub mod image;
pub mod presets;
pub mod sampler;
pub mod state;

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use filter::{downsample, quantize, PixelArtFilter};
pub use image::{Image, ImageError};
pub use sampler::{AddressMode, FilterMode, SampledImage, Sampler};

/// Default grid resolution: cells across the unit square.
pub const DEFAULT_BLOCK_SCALE: f32 = 128.0;
/// Default number of discrete levels per colour channel.
pub const DEFAULT_COLOR_LEVELS: f32 = 128.0;

// ---------------------------------------------------------------------------
// Settings: the only knobs of the effect
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelArtSettings {
    /// Number of downsampling cells across each axis of the unit square.
    pub block_scale: f32,
    /// Number of quantization levels per colour channel.
    pub color_levels: f32,
    /// Widen the horizontal cell count by the viewport aspect ratio so that
    /// blocks come out square on non-square targets.
    pub aspect_correct: bool,
    /// When false the filter passes the sample through (alpha still forced).
    pub enabled: bool,
}

impl Default for PixelArtSettings {
    fn default() -> Self {
        Self {
            block_scale: DEFAULT_BLOCK_SCALE,
            color_levels: DEFAULT_COLOR_LEVELS,
            aspect_correct: false,
            enabled: true,
        }
    }
}

impl PixelArtSettings {
    /// Both parameters driven by one value.
    pub fn coupled(scale: f32) -> Self {
        Self {
            block_scale: scale,
            color_levels: scale,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.block_scale.is_finite() || self.block_scale <= 0.0 {
            return Err(SettingsError::InvalidBlockScale(self.block_scale));
        }
        if !self.color_levels.is_finite() || self.color_levels < 1.0 {
            return Err(SettingsError::InvalidColorLevels(self.color_levels));
        }
        Ok(())
    }

    /// Effective per-axis cell count for a target of `viewport` pixels.
    ///
    /// Without aspect correction (or without a usable viewport) the grid is
    /// square: `block_scale` cells on both axes.
    pub fn grid(&self, viewport: Option<(u32, u32)>) -> Vec2 {
        match viewport {
            Some((width, height)) if self.aspect_correct && width > 0 && height > 0 => Vec2::new(
                self.block_scale * width as f32 / height as f32,
                self.block_scale,
            ),
            _ => Vec2::splat(self.block_scale),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("block scale must be a positive finite number, got {0}")]
    InvalidBlockScale(f32),

    #[error("colour levels must be a finite number >= 1, got {0}")]
    InvalidColorLevels(f32),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Anything that can be sampled at a normalized coordinate: a texture bound
/// together with its sampler.
pub trait Source: Sync {
    fn sample(&self, uv: Vec2) -> Vec4;
}

impl<F> Source for F
where
    F: Fn(Vec2) -> Vec4 + Sync,
{
    fn sample(&self, uv: Vec2) -> Vec4 {
        self(uv)
    }
}

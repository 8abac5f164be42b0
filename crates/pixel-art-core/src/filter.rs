use glam::{Vec2, Vec4};
use rayon::prelude::*;

use crate::{Image, PixelArtSettings, SampledImage, Sampler, SettingsError, Source};

/// Snap `uv` to the lower-left corner of its cell on a `grid.x × grid.y`
/// lattice spanning the unit square. Every coordinate inside one cell maps
/// to the same point.
#[inline]
pub fn downsample(uv: Vec2, grid: Vec2) -> Vec2 {
    (uv * grid).floor() / grid
}

/// Reduce every channel (alpha included) to `levels` evenly spaced steps.
#[inline]
pub fn quantize(color: Vec4, levels: f32) -> Vec4 {
    (color * levels).floor() / levels
}

// ---------------------------------------------------------------------------
// PixelArtFilter
// ---------------------------------------------------------------------------

/// The pixel-art transform with validated settings and a resolved grid.
///
/// Construction is the only fallible step; `render` is a pure function of
/// its inputs and can be called from any number of threads at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelArtFilter {
    settings: PixelArtSettings,
    grid: Vec2,
}

impl PixelArtFilter {
    pub fn new(settings: PixelArtSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            grid: settings.grid(None),
            settings,
        })
    }

    /// Resolve the aspect-corrected grid for a `width × height` target.
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.grid = self.settings.grid(Some((width, height)));
        self
    }

    pub fn settings(&self) -> &PixelArtSettings {
        &self.settings
    }

    pub fn grid(&self) -> Vec2 {
        self.grid
    }

    /// Colour of one output pixel whose fullscreen-pass coordinate is `uv`.
    pub fn render<S: Source + ?Sized>(&self, source: &S, uv: Vec2) -> Vec4 {
        if !self.settings.enabled {
            return source.sample(uv).truncate().extend(1.0);
        }
        let snapped = downsample(uv, self.grid);
        let color = quantize(source.sample(snapped), self.settings.color_levels);
        color.truncate().extend(1.0)
    }

    /// Run the filter over every pixel of `image`, sampling at pixel centres.
    /// The output has the same dimensions as the input, which is also the
    /// viewport the grid is resolved against.
    pub fn apply(&self, image: &Image, sampler: Sampler) -> Image {
        let (width, height) = (image.width(), image.height());
        let filter = self.with_viewport(width, height);
        let source = SampledImage::new(image, sampler);
        let size = Vec2::new(width as f32, height as f32);

        let mut pixels = vec![Vec4::ZERO; image.pixels().len()];
        if width > 0 {
            pixels
                .par_chunks_mut(width as usize)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, out) in row.iter_mut().enumerate() {
                        let uv = (Vec2::new(x as f32, y as f32) + 0.5) / size;
                        *out = filter.render(&source, uv);
                    }
                });
        }

        log::debug!(
            "applied pixel-art filter to {}x{} image (grid {:?}, {} levels)",
            width,
            height,
            filter.grid,
            filter.settings.color_levels
        );
        Image::from_pixels(width, height, pixels)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

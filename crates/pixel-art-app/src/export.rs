use std::path::Path;

use anyhow::{anyhow, Context};
use pixel_art_core::{Image, PixelArtFilter};
use pixel_art_gpu::{GpuContext, HeadlessRenderer};

use crate::config::Config;

/// Decode any supported image file into RGBA.
pub fn load_image(path: &Path) -> anyhow::Result<Image> {
    let decoded = image::open(path)
        .with_context(|| format!("failed to open image {}", path.display()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    log::info!("Loaded {} ({}x{})", path.display(), width, height);
    Ok(Image::from_rgba8(width, height, decoded.as_raw())?)
}

/// Encode `image` to `path`; the format follows the file extension.
pub fn save_image(path: &Path, image: &Image) -> anyhow::Result<()> {
    let buffer = image::RgbaImage::from_raw(image.width(), image.height(), image.to_rgba8())
        .ok_or_else(|| anyhow!("pixel buffer does not match {}x{}", image.width(), image.height()))?;
    buffer
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Filter `image` once and write the result to `out`.
pub fn run(image: &Image, config: &Config, out: &Path, gpu: bool) -> anyhow::Result<()> {
    let filtered = if gpu {
        let ctx = pollster::block_on(GpuContext::new_headless())
            .context("failed to initialise headless GPU")?;
        let renderer = HeadlessRenderer::new(ctx, config.sampler);
        renderer.render(image, &config.filter)?
    } else {
        PixelArtFilter::new(config.filter)?.apply(image, config.sampler)
    };
    save_image(out, &filtered)?;
    log::info!(
        "Exported {}x{} image to {} ({})",
        filtered.width(),
        filtered.height(),
        out.display(),
        if gpu { "gpu" } else { "cpu" }
    );
    Ok(())
}

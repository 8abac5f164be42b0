use pixel_art_core::{Image, PixelArtFilter, PixelArtSettings, Sampler};

use crate::context::{GpuContext, Uniforms};
use crate::pixel_art_pipeline::PixelArtPass;
use crate::source_texture::{check_texture_size, SourceTexture, COLOR_FORMAT};
use crate::GpuError;

/// Runs the pixel-art pass without a window: upload, draw into an
/// offscreen texture of the same size, read the pixels back.
pub struct HeadlessRenderer {
    ctx: GpuContext,
    pass: PixelArtPass,
}

impl HeadlessRenderer {
    pub fn new(ctx: GpuContext, sampler: Sampler) -> Self {
        let pass = PixelArtPass::new(&ctx.device, COLOR_FORMAT, sampler);
        Self { ctx, pass }
    }

    pub fn render(&self, image: &Image, settings: &PixelArtSettings) -> Result<Image, GpuError> {
        let filter = PixelArtFilter::new(*settings)?;
        if image.is_empty() {
            return Ok(image.clone());
        }
        let device = &self.ctx.device;
        let queue = &self.ctx.queue;
        let (width, height) = (image.width(), image.height());
        check_texture_size(&device.limits(), width, height)?;

        let source = SourceTexture::from_image(device, queue, image);
        let filter = filter.with_viewport(width, height);
        self.pass.write_uniforms(queue, &Uniforms::from_filter(&filter));

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("pixel_art_offscreen"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let target_view = target.create_view(&Default::default());

        // Rows in a texture→buffer copy must be padded to 256 bytes.
        let unpadded_row = 4 * width;
        let padded_row = padded_bytes_per_row(width);
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pixel_art_readback"),
            size: padded_row as u64 * height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("headless-encoder"),
        });
        self.pass
            .draw(device, &mut encoder, &source.view, &target_view);
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &readback,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            size,
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device.poll(wgpu::Maintain::Wait);
        rx.recv().map_err(|_| GpuError::MapCancelled)??;

        let mapped = slice.get_mapped_range();
        let bytes = strip_row_padding(&mapped, unpadded_row, padded_row, height);
        drop(mapped);
        readback.unmap();

        log::debug!("read back {}x{} frame", width, height);
        Ok(Image::from_rgba8(width, height, &bytes)?)
    }
}

pub fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (4 * width).div_ceil(align) * align
}

fn strip_row_padding(data: &[u8], unpadded_row: u32, padded_row: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((unpadded_row * height) as usize);
    for row in data.chunks(padded_row as usize).take(height as usize) {
        bytes.extend_from_slice(&row[..unpadded_row as usize]);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_pad_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(1), 256);
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
    }

    #[test]
    fn padding_is_stripped_per_row() {
        // 2 rows of 3 payload bytes padded to 5.
        let data = [1, 2, 3, 0, 0, 4, 5, 6, 0, 0];
        assert_eq!(strip_row_padding(&data, 3, 5, 2), vec![1, 2, 3, 4, 5, 6]);
    }

    /// Bytes chosen so that `v / 255 * levels` never lands near an integer
    /// and the grid never lands on a texel edge; GPU and CPU must then
    /// agree to within one unit of rounding.
    fn gradient() -> Image {
        let mut bytes = Vec::new();
        for y in 0..8u8 {
            for x in 0..16u8 {
                bytes.extend_from_slice(&[x * 16 + 5, y * 32 + 10, 200, 100]);
            }
        }
        Image::from_rgba8(16, 8, &bytes).unwrap()
    }

    #[test]
    fn gpu_matches_cpu_filter() {
        let ctx = match pollster::block_on(GpuContext::new_headless()) {
            Ok(ctx) => ctx,
            Err(e) => {
                eprintln!("skipping GPU parity test: {e}");
                return;
            }
        };
        let sampler = Sampler::default();
        let renderer = HeadlessRenderer::new(ctx, sampler);
        let settings = PixelArtSettings {
            block_scale: 3.0,
            color_levels: 4.0,
            ..Default::default()
        };
        let image = gradient();

        let gpu = renderer.render(&image, &settings).unwrap().to_rgba8();
        let cpu = pixel_art_core::PixelArtFilter::new(settings)
            .unwrap()
            .apply(&image, sampler)
            .to_rgba8();

        assert_eq!(gpu.len(), cpu.len());
        for (i, (g, c)) in gpu.iter().zip(&cpu).enumerate() {
            assert!(g.abs_diff(*c) <= 1, "byte {i}: gpu {g} vs cpu {c}");
        }
        assert!(gpu.chunks(4).all(|p| p[3] == 255));
    }

    #[test]
    fn oversized_image_is_an_error_not_a_panic() {
        let Ok(ctx) = pollster::block_on(GpuContext::new_headless()) else {
            return;
        };
        let max = ctx.device.limits().max_texture_dimension_2d;
        let renderer = HeadlessRenderer::new(ctx, Sampler::default());
        let wide = Image::from_rgba8(max + 1, 1, &vec![0; 4 * (max as usize + 1)]).unwrap();
        assert!(matches!(
            renderer.render(&wide, &PixelArtSettings::default()),
            Err(GpuError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn rejects_invalid_settings_before_touching_gpu() {
        let Ok(ctx) = pollster::block_on(GpuContext::new_headless()) else {
            return;
        };
        let renderer = HeadlessRenderer::new(ctx, Sampler::default());
        let settings = PixelArtSettings {
            color_levels: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            renderer.render(&gradient(), &settings),
            Err(GpuError::Settings(_))
        ));
    }
}

use pixel_art_core::Image;
use wgpu::{Device, Queue, Texture, TextureView};

use crate::GpuError;

/// Colour format for both the uploaded source and the offscreen target.
/// Linear (non-sRGB) so that stored bytes are exactly the values the
/// shader sees, matching the CPU filter.
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// An `Image` uploaded to a sampled GPU texture.
pub struct SourceTexture {
    pub texture: Texture,
    pub view: TextureView,
    pub width: u32,
    pub height: u32,
}

impl SourceTexture {
    pub fn from_image(device: &Device, queue: &Queue, image: &Image) -> Self {
        let (width, height, bytes) = upload_data(image);

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("pixel_art_source"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &bytes,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&Default::default());
        log::debug!("uploaded {}x{} source texture", width, height);

        Self {
            texture,
            view,
            width,
            height,
        }
    }
}

/// Reject images the device cannot hold in one 2D texture.
pub fn check_texture_size(limits: &wgpu::Limits, width: u32, height: u32) -> Result<(), GpuError> {
    let max = limits.max_texture_dimension_2d;
    if width > max || height > max {
        return Err(GpuError::ImageTooLarge { width, height, max });
    }
    Ok(())
}

/// Texture size and RGBA8 payload for `image`. Zero-sized textures are
/// invalid, so any empty image (including `0 x h` and `w x 0`) becomes
/// 1x1 opaque black.
pub fn upload_data(image: &Image) -> (u32, u32, Vec<u8>) {
    if image.is_empty() {
        (1, 1, vec![0, 0, 0, 255])
    } else {
        (image.width(), image.height(), image.to_rgba8())
    }
}

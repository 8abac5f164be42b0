use pixel_art_core::PixelArtFilter;
use wgpu::{Adapter, Device, Instance, Queue};

use crate::GpuError;

pub struct GpuContext {
    pub instance: Instance,
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
}

impl GpuContext {
    /// Create a headless GPU context (no surface). Used for offline export
    /// and testing. The windowed app creates its own surface-aware device.
    pub async fn new_headless() -> Result<Self, GpuError> {
        let instance = Instance::default();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        log::info!("GPU adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("pixel-art-gpu device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }
}

/// Effect parameters uploaded to the GPU as a single uniform buffer.
/// Must match the `PixelArtSettings` struct in `shaders/pixel_art.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    pub grid: [f32; 2],
    pub color_levels: f32,
    pub enabled: f32,
}

impl Uniforms {
    /// Uniforms for a filter whose grid is already resolved for the target.
    pub fn from_filter(filter: &PixelArtFilter) -> Self {
        let settings = filter.settings();
        Self {
            grid: filter.grid().to_array(),
            color_levels: settings.color_levels,
            enabled: if settings.enabled { 1.0 } else { 0.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixel_art_core::PixelArtSettings;

    fn uniforms(settings: PixelArtSettings, width: u32, height: u32) -> Uniforms {
        let filter = PixelArtFilter::new(settings).unwrap().with_viewport(width, height);
        Uniforms::from_filter(&filter)
    }

    #[test]
    fn uniforms_are_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 16);
    }

    #[test]
    fn default_settings_upload_default_constants() {
        let u = uniforms(PixelArtSettings::default(), 1920, 1080);
        assert_eq!(
            u,
            Uniforms {
                grid: [128.0, 128.0],
                color_levels: 128.0,
                enabled: 1.0,
            }
        );
    }

    #[test]
    fn aspect_correct_settings_widen_grid() {
        let settings = PixelArtSettings {
            block_scale: 100.0,
            aspect_correct: true,
            enabled: false,
            ..Default::default()
        };
        let u = uniforms(settings, 400, 200);
        assert_eq!(u.grid, [200.0, 100.0]);
        assert_eq!(u.enabled, 0.0);
    }

    #[test]
    fn byte_layout_is_field_order() {
        let u = Uniforms {
            grid: [1.0, 2.0],
            color_levels: 3.0,
            enabled: 4.0,
        };
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&u));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0]);
    }
}

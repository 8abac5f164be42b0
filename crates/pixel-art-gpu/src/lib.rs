pub mod context;
pub mod headless;
pub mod pixel_art_pipeline;
pub mod renderer;
pub mod source_texture;

use thiserror::Error;

pub use context::{GpuContext, Uniforms};
pub use headless::HeadlessRenderer;
pub use pixel_art_pipeline::PixelArtPass;
pub use source_texture::{check_texture_size, SourceTexture};

#[derive(Error, Debug)]
pub enum GpuError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to map readback buffer: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("readback buffer mapping was dropped before completing")]
    MapCancelled,

    #[error("{width}x{height} image exceeds the device texture limit of {max} pixels per side")]
    ImageTooLarge { width: u32, height: u32, max: u32 },

    #[error(transparent)]
    Settings(#[from] pixel_art_core::SettingsError),

    #[error(transparent)]
    Image(#[from] pixel_art_core::ImageError),
}

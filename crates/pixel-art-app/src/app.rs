use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context};
use pixel_art_core::presets::Preset;
use pixel_art_core::state::EffectState;
use pixel_art_core::{Image, PixelArtSettings, Sampler};
use pixel_art_gpu::{check_texture_size, PixelArtPass, SourceTexture, Uniforms};
use winit::window::Window;

use crate::input::{step_block_scale, step_color_levels, InputAction, InputState, Key};

// ---------------------------------------------------------------------------
// Simple FPS counter: logs to console once per second
// ---------------------------------------------------------------------------

struct FpsCounter {
    frames: u32,
    last_report: Instant,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frames: 0,
            last_report: Instant::now(),
        }
    }

    /// Returns the FPS value once a full second has elapsed since the last report.
    fn tick(&mut self) -> Option<f32> {
        self.frames += 1;
        let elapsed = self.last_report.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            let fps = self.frames as f32 / elapsed;
            self.frames = 0;
            self.last_report = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// App: one source image shown through the pixel-art pass
// ---------------------------------------------------------------------------

pub struct App {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,

    source: SourceTexture,
    pass: PixelArtPass,

    effect: EffectState,
    /// Settings `R` returns to (config plus command-line overrides).
    base_settings: PixelArtSettings,
    current_preset_idx: usize,

    input: InputState,
    fps: FpsCounter,
}

impl App {
    /// Initialise wgpu for a given window.  The window is wrapped in `Arc` so
    /// that the surface can safely hold a `'static` reference to it.
    pub fn new(
        window: Arc<Window>,
        settings: PixelArtSettings,
        sampler: Sampler,
        image: &Image,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        // ---- Instance -------------------------------------------------------
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // ---- Surface --------------------------------------------------------
        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create wgpu surface")?;

        // ---- Adapter --------------------------------------------------------
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter found"))?;

        log::info!("GPU adapter: {}", adapter.get_info().name);

        // ---- Device & Queue -------------------------------------------------
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("pixel-art-app device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create GPU device")?;

        // ---- Surface configuration ------------------------------------------
        let surface_caps = surface.get_capabilities(&adapter);

        // A linear target keeps on-screen values identical to the CPU filter.
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("surface reports no supported formats"))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);
        log::info!(
            "Surface configured: {}×{} {:?} Fifo",
            surface_config.width,
            surface_config.height,
            format
        );

        // ---- Source image + pass --------------------------------------------
        check_texture_size(&device.limits(), image.width(), image.height())?;
        let source = SourceTexture::from_image(&device, &queue, image);
        let pass = PixelArtPass::new(&device, format, sampler);

        let current_preset_idx = Preset::ALL
            .iter()
            .position(|p| p.settings() == settings)
            .unwrap_or(0);

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            source,
            pass,
            effect: EffectState::new(settings, width, height),
            base_settings: settings,
            current_preset_idx,
            input: InputState::new(),
            fps: FpsCounter::new(),
        })
    }

    // -------------------------------------------------------------------------
    // Resize
    // -------------------------------------------------------------------------

    /// Reconfigure the surface. The grid follows the new viewport on the
    /// next frame.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width == 0 || new_height == 0 {
            return;
        }
        self.surface_config.width = new_width;
        self.surface_config.height = new_height;
        self.surface.configure(&self.device, &self.surface_config);
        self.effect.set_viewport(new_width, new_height);

        match self.effect.filter() {
            Ok(filter) => log::debug!(
                "Surface resized to {}×{}, grid {:?}",
                new_width,
                new_height,
                filter.grid()
            ),
            Err(e) => log::warn!("Surface resized with invalid settings: {e}"),
        }
    }

    // -------------------------------------------------------------------------
    // Input: called by main.rs window_event handler
    // -------------------------------------------------------------------------

    /// Translate a key press and return the resulting action, if any.
    pub fn on_key_pressed(&self, key: Key) -> Option<InputAction> {
        self.input.on_key(key)
    }

    /// Apply an action to the app state.
    ///
    /// Returns `true` if the app should exit (i.e. action was `Quit`).
    pub fn handle_action(&mut self, action: InputAction) -> bool {
        let mut next = self.effect.settings;
        match action {
            InputAction::LoadPreset(preset) => {
                log::info!("Loading preset: {}", preset.name());
                if let Some(idx) = Preset::ALL.iter().position(|&p| p == preset) {
                    self.current_preset_idx = idx;
                }
                next = PixelArtSettings {
                    enabled: next.enabled,
                    ..preset.settings()
                };
            }

            InputAction::CycleNextPreset => {
                self.current_preset_idx = (self.current_preset_idx + 1) % Preset::ALL.len();
                let preset = Preset::ALL[self.current_preset_idx];
                log::info!("Cycling to preset: {}", preset.name());
                next = PixelArtSettings {
                    enabled: next.enabled,
                    ..preset.settings()
                };
            }

            InputAction::BlockScaleUp | InputAction::BlockScaleDown => {
                next.block_scale =
                    step_block_scale(next.block_scale, action == InputAction::BlockScaleUp);
                log::debug!("block_scale → {}", next.block_scale);
            }

            InputAction::ColorLevelsUp | InputAction::ColorLevelsDown => {
                next.color_levels =
                    step_color_levels(next.color_levels, action == InputAction::ColorLevelsUp);
                log::debug!("color_levels → {}", next.color_levels);
            }

            InputAction::ToggleAspectCorrect => {
                next.aspect_correct = !next.aspect_correct;
                log::debug!("aspect_correct → {}", next.aspect_correct);
            }

            InputAction::ToggleEffect => {
                next.enabled = !next.enabled;
                log::info!("Effect {}", if next.enabled { "on" } else { "off" });
            }

            InputAction::Reset => {
                log::info!("Reset to configured settings");
                next = self.base_settings;
            }

            InputAction::Quit => return true,
        }

        if let Err(e) = self.effect.set_settings(next) {
            log::warn!("Ignoring invalid settings: {e}");
        }
        false
    }

    // -------------------------------------------------------------------------
    // Render
    // -------------------------------------------------------------------------

    /// Draw one frame: refresh uniforms if needed, run the pass into the
    /// swapchain image, present.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if let Some(fps) = self.fps.tick() {
            let settings = &self.effect.settings;
            log::debug!(
                "FPS: {:.1}  preset: {}  block_scale: {}  levels: {}",
                fps,
                Preset::ALL[self.current_preset_idx].name(),
                settings.block_scale,
                settings.color_levels,
            );
        }

        if self.effect.uniforms_dirty() {
            // Settings only reach `effect` through `set_settings`, which validates.
            if let Ok(filter) = self.effect.filter() {
                self.pass.write_uniforms(&self.queue, &Uniforms::from_filter(&filter));
            }
        }

        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });
        self.pass
            .draw(&self.device, &mut encoder, &self.source.view, &surface_view);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

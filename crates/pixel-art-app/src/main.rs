use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pixel_art_core::Image;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

mod app;
mod cli;
mod config;
mod export;
mod input;
mod test_card;

use app::App;
use cli::Cli;
use config::Config;
use input::Key;

// ---------------------------------------------------------------------------
// Key mapping: winit KeyCode → windowing-independent Key
// ---------------------------------------------------------------------------

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Digit1 => Some(Key::Digit1),
        KeyCode::Digit2 => Some(Key::Digit2),
        KeyCode::Digit3 => Some(Key::Digit3),
        KeyCode::Digit4 => Some(Key::Digit4),
        KeyCode::Digit5 => Some(Key::Digit5),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Equal | KeyCode::NumpadAdd => Some(Key::Equal),
        KeyCode::Minus | KeyCode::NumpadSubtract => Some(Key::Minus),
        KeyCode::BracketRight => Some(Key::BracketRight),
        KeyCode::BracketLeft => Some(Key::BracketLeft),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyR => Some(Key::R),
        KeyCode::KeyQ => Some(Key::Q),
        KeyCode::Escape => Some(Key::Escape),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Handler: winit ApplicationHandler
// ---------------------------------------------------------------------------

struct Handler {
    config: Config,
    image: Image,
    window: Option<Arc<Window>>,
    app: Option<App>,
}

impl ApplicationHandler for Handler {
    /// Called once on desktop when the event loop starts.
    /// Creates the window then initialises the wgpu surface.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let win = &self.config.window;
        let window_attrs = Window::default_attributes()
            .with_title(win.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(win.width, win.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        log::info!("Window created ({}×{})", win.width, win.height);

        match App::new(
            Arc::clone(&window),
            self.config.filter,
            self.config.sampler,
            &self.image,
        ) {
            Ok(app) => {
                self.window = Some(window);
                self.app = Some(app);
            }
            Err(e) => {
                log::error!("failed to initialise renderer: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            // ----------------------------------------------------------------
            // Exit
            // ----------------------------------------------------------------
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let Some(app) = &mut self.app else { return };
                let Some(key) = map_key(code) else { return };
                if let Some(action) = app.on_key_pressed(key) {
                    if app.handle_action(action) {
                        log::info!("Quit requested, exiting");
                        event_loop.exit();
                    }
                }
            }

            // ----------------------------------------------------------------
            // Resize: reconfigure the wgpu surface
            // ----------------------------------------------------------------
            WindowEvent::Resized(new_size) => {
                if let Some(app) = &mut self.app {
                    app.resize(new_size.width, new_size.height);
                }
            }

            // ----------------------------------------------------------------
            // Redraw
            // ----------------------------------------------------------------
            WindowEvent::RedrawRequested => {
                if let Some(app) = &mut self.app {
                    match app.render() {
                        Ok(()) => {}
                        // Surface lost / outdated: reconfigure and try again next frame.
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            if let Some(window) = &self.window {
                                let size = window.inner_size();
                                app.resize(size.width, size.height);
                            }
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory, exiting");
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("render error: {e:?}"),
                    }
                }
            }

            _ => {}
        }
    }

    /// Drive continuous redraws (game-loop style).
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref());
    cli.apply_overrides(&mut config)?;

    let image = match &cli.image {
        Some(path) => export::load_image(path)?,
        None => {
            let win = &config.window;
            log::info!("No image given, using {}x{} test card", win.width, win.height);
            test_card::test_card(win.width, win.height)
        }
    };

    if let Some(out) = &cli.export {
        return export::run(&image, &config, out, cli.gpu);
    }

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = Handler {
        config,
        image,
        window: None,
        app: None,
    };
    event_loop.run_app(&mut handler).context("event loop error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bound_key_maps() {
        let codes = [
            KeyCode::Digit1,
            KeyCode::Digit5,
            KeyCode::Tab,
            KeyCode::Space,
            KeyCode::Equal,
            KeyCode::Minus,
            KeyCode::BracketLeft,
            KeyCode::BracketRight,
            KeyCode::KeyA,
            KeyCode::KeyR,
            KeyCode::KeyQ,
            KeyCode::Escape,
        ];
        for code in codes {
            assert!(map_key(code).is_some(), "{code:?} unmapped");
        }
    }

    #[test]
    fn numpad_aliases_step_block_scale() {
        assert_eq!(map_key(KeyCode::NumpadAdd), Some(Key::Equal));
        assert_eq!(map_key(KeyCode::NumpadSubtract), Some(Key::Minus));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(map_key(KeyCode::KeyZ), None);
        assert_eq!(map_key(KeyCode::F1), None);
    }
}

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;
use pixel_art_core::presets::Preset;

use crate::config::Config;

/// Pixel-art post-process viewer and exporter
#[derive(Parser, Debug)]
#[command(name = "pixel-art", version, about)]
pub struct Cli {
    /// Image to show (a generated test card when omitted)
    pub image: Option<PathBuf>,

    /// Config file (defaults to ~/.config/pixel-art/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the filtered image to this PNG and exit instead of opening a window
    #[arg(long, value_name = "OUT.png")]
    pub export: Option<PathBuf>,

    /// Render the export on the GPU instead of the CPU
    #[arg(long, requires = "export")]
    pub gpu: bool,

    /// Grid cells along the vertical axis (and the horizontal one unless
    /// aspect correction widens it)
    #[arg(long)]
    pub block_scale: Option<f32>,

    /// Colour steps per channel
    #[arg(long)]
    pub color_levels: Option<f32>,

    /// Start from a named preset (classic, chunky, handheld, arcade, fine)
    #[arg(long)]
    pub preset: Option<String>,

    /// Keep blocks square on non-square targets
    #[arg(long)]
    pub aspect_correct: bool,
}

impl Cli {
    /// Layer command-line values over `config`: preset first, then the
    /// individual knobs.
    pub fn apply_overrides(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(name) = &self.preset {
            let preset = Preset::from_name(name).ok_or_else(|| {
                let known: Vec<_> = Preset::ALL.iter().map(|p| p.name()).collect();
                anyhow!("unknown preset {:?} (expected one of {})", name, known.join(", "))
            })?;
            log::info!("Using preset {}", preset.name());
            config.filter = preset.settings();
        }
        if let Some(block_scale) = self.block_scale {
            config.filter.block_scale = block_scale;
        }
        if let Some(color_levels) = self.color_levels {
            config.filter.color_levels = color_levels;
        }
        if self.aspect_correct {
            config.filter.aspect_correct = true;
        }
        config
            .filter
            .validate()
            .context("invalid command-line filter settings")?;
        Ok(())
    }
}

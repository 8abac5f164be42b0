use crate::{PixelArtFilter, PixelArtSettings, SettingsError};

/// Live effect settings plus the viewport they are rendered at.
///
/// Remembers what was last handed to the GPU so the uniform buffer is only
/// rewritten when something actually changed.
#[derive(Debug, Clone)]
pub struct EffectState {
    pub settings: PixelArtSettings,
    pub viewport: (u32, u32),
    last_uploaded: Option<(PixelArtSettings, (u32, u32))>,
}

impl EffectState {
    pub fn new(settings: PixelArtSettings, width: u32, height: u32) -> Self {
        Self {
            settings,
            viewport: (width, height),
            last_uploaded: None,
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// Replace the settings, keeping the old ones if the new set is invalid.
    pub fn set_settings(&mut self, settings: PixelArtSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Filter resolved for the current viewport.
    pub fn filter(&self) -> Result<PixelArtFilter, SettingsError> {
        let (width, height) = self.viewport;
        Ok(PixelArtFilter::new(self.settings)?.with_viewport(width, height))
    }

    /// Returns true if settings or viewport changed since the last call,
    /// i.e. the uniforms must be re-uploaded.
    pub fn uniforms_dirty(&mut self) -> bool {
        let current = (self.settings, self.viewport);
        let dirty = self.last_uploaded != Some(current);
        if dirty {
            self.last_uploaded = Some(current);
        }
        dirty
    }
}

use crate::PixelArtSettings;

/// Named looks. `Classic` is the default 128 x 128 look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Classic,
    Chunky,
    Handheld,
    Arcade,
    Fine,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Classic,
        Preset::Chunky,
        Preset::Handheld,
        Preset::Arcade,
        Preset::Fine,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Classic => "Classic",
            Preset::Chunky => "Chunky",
            Preset::Handheld => "Handheld",
            Preset::Arcade => "Arcade",
            Preset::Fine => "Fine",
        }
    }

    /// Case-insensitive lookup by `name()`.
    pub fn from_name(name: &str) -> Option<Preset> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    pub fn settings(self) -> PixelArtSettings {
        match self {
            Preset::Classic => PixelArtSettings::default(),
            Preset::Chunky => PixelArtSettings {
                block_scale: 32.0,
                color_levels: 16.0,
                ..Default::default()
            },
            Preset::Handheld => PixelArtSettings {
                block_scale: 144.0,
                color_levels: 4.0,
                aspect_correct: true,
                ..Default::default()
            },
            Preset::Arcade => PixelArtSettings {
                block_scale: 224.0,
                color_levels: 8.0,
                aspect_correct: true,
                ..Default::default()
            },
            Preset::Fine => PixelArtSettings::coupled(256.0),
        }
    }
}

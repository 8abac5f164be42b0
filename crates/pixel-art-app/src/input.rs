use pixel_art_core::presets::Preset;

// ---------------------------------------------------------------------------
// Key: windowing-library-independent key representation
// ---------------------------------------------------------------------------

/// A keyboard key, independent of any windowing library.
///
/// `main.rs` maps `winit::keyboard::KeyCode` → `Key`; everything else
/// in the input pipeline works purely with this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Tab,
    Space,
    Equal, // = / + (same physical key; Shift state ignored)
    Minus, // - / _
    BracketRight,
    BracketLeft,
    A,
    R,
    Q,
    Escape,
}

// ---------------------------------------------------------------------------
// InputAction: what the app does in response to input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    LoadPreset(Preset),
    CycleNextPreset,
    BlockScaleUp,
    BlockScaleDown,
    ColorLevelsUp,
    ColorLevelsDown,
    ToggleAspectCorrect,
    ToggleEffect,
    Reset,
    Quit,
}

pub struct InputState;

impl InputState {
    pub fn new() -> Self {
        Self
    }

    /// Translate a `Key` press into an `InputAction`, if the key is mapped.
    pub fn on_key(&self, key: Key) -> Option<InputAction> {
        match key {
            Key::Digit1 => Some(InputAction::LoadPreset(Preset::Classic)),
            Key::Digit2 => Some(InputAction::LoadPreset(Preset::Chunky)),
            Key::Digit3 => Some(InputAction::LoadPreset(Preset::Handheld)),
            Key::Digit4 => Some(InputAction::LoadPreset(Preset::Arcade)),
            Key::Digit5 => Some(InputAction::LoadPreset(Preset::Fine)),
            Key::Tab => Some(InputAction::CycleNextPreset),
            Key::Space => Some(InputAction::ToggleEffect),
            Key::Equal => Some(InputAction::BlockScaleUp),
            Key::Minus => Some(InputAction::BlockScaleDown),
            Key::BracketRight => Some(InputAction::ColorLevelsUp),
            Key::BracketLeft => Some(InputAction::ColorLevelsDown),
            Key::A => Some(InputAction::ToggleAspectCorrect),
            Key::R => Some(InputAction::Reset),
            Key::Q | Key::Escape => Some(InputAction::Quit),
        }
    }
}

// ---------------------------------------------------------------------------
// Parameter stepping (pure, testable)
// ---------------------------------------------------------------------------

pub const MIN_BLOCK_SCALE: f32 = 1.0;
pub const MAX_BLOCK_SCALE: f32 = 4096.0;
pub const MIN_COLOR_LEVELS: f32 = 2.0;
pub const MAX_COLOR_LEVELS: f32 = 256.0;

/// Double or halve the block scale, clamped to \[1, 4096\].
pub fn step_block_scale(current: f32, up: bool) -> f32 {
    step(current, up, MIN_BLOCK_SCALE, MAX_BLOCK_SCALE)
}

/// Double or halve the colour level count, clamped to \[2, 256\].
pub fn step_color_levels(current: f32, up: bool) -> f32 {
    step(current, up, MIN_COLOR_LEVELS, MAX_COLOR_LEVELS)
}

/// A step never moves against its direction: values already outside
/// `[min, max]` (allowed by config) stay put rather than jump to the bound.
fn step(current: f32, up: bool, min: f32, max: f32) -> f32 {
    if up {
        (current * 2.0).min(max).max(current)
    } else {
        (current * 0.5).max(min).min(current)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> InputState {
        InputState::new()
    }

    #[test]
    fn digit_keys_load_presets_in_order() {
        let keys = [Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4, Key::Digit5];
        for (key, preset) in keys.into_iter().zip(Preset::ALL) {
            assert_eq!(input().on_key(key), Some(InputAction::LoadPreset(preset)));
        }
    }

    #[test]
    fn tab_cycles_presets() {
        assert_eq!(input().on_key(Key::Tab), Some(InputAction::CycleNextPreset));
    }

    #[test]
    fn space_toggles_effect() {
        assert_eq!(input().on_key(Key::Space), Some(InputAction::ToggleEffect));
    }

    #[test]
    fn equal_and_minus_step_block_scale() {
        assert_eq!(input().on_key(Key::Equal), Some(InputAction::BlockScaleUp));
        assert_eq!(input().on_key(Key::Minus), Some(InputAction::BlockScaleDown));
    }

    #[test]
    fn brackets_step_color_levels() {
        assert_eq!(
            input().on_key(Key::BracketRight),
            Some(InputAction::ColorLevelsUp)
        );
        assert_eq!(
            input().on_key(Key::BracketLeft),
            Some(InputAction::ColorLevelsDown)
        );
    }

    #[test]
    fn a_toggles_aspect_correction() {
        assert_eq!(
            input().on_key(Key::A),
            Some(InputAction::ToggleAspectCorrect)
        );
    }

    #[test]
    fn r_resets() {
        assert_eq!(input().on_key(Key::R), Some(InputAction::Reset));
    }

    #[test]
    fn q_and_escape_quit() {
        assert_eq!(input().on_key(Key::Q), Some(InputAction::Quit));
        assert_eq!(input().on_key(Key::Escape), Some(InputAction::Quit));
    }

    // --- Stepping ---------------------------------------------------------------

    #[test]
    fn block_scale_doubles_and_halves() {
        assert_eq!(step_block_scale(128.0, true), 256.0);
        assert_eq!(step_block_scale(128.0, false), 64.0);
    }

    #[test]
    fn block_scale_is_clamped() {
        assert_eq!(step_block_scale(1.0, false), 1.0);
        assert_eq!(step_block_scale(4096.0, true), 4096.0);
        assert_eq!(step_block_scale(3000.0, true), 4096.0);
    }

    #[test]
    fn down_step_never_raises_value() {
        assert_eq!(step_color_levels(1.0, false), 1.0);
        assert_eq!(step_block_scale(0.5, false), 0.5);
        assert_eq!(step_color_levels(1.0, true), 2.0);
    }

    #[test]
    fn up_step_never_lowers_value() {
        assert_eq!(step_block_scale(5000.0, true), 5000.0);
        assert_eq!(step_color_levels(300.0, true), 300.0);
        assert_eq!(step_block_scale(5000.0, false), 2500.0);
    }

    #[test]
    fn color_levels_are_clamped() {
        assert_eq!(step_color_levels(2.0, false), 2.0);
        assert_eq!(step_color_levels(3.0, false), 2.0);
        assert_eq!(step_color_levels(256.0, true), 256.0);
        assert_eq!(step_color_levels(128.0, true), 256.0);
        assert_eq!(step_color_levels(128.0, false), 64.0);
    }
}

//! Control-panel settings
//!
//! Everything the player can tweak live: speeds, pursuer size, colors and
//! music volume. Persisted separately from the best time in LocalStorage.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_KEY;
use crate::persistence::{KeyValueStore, StorageError};

/// Slider ranges
pub const AVATAR_SPEED_RANGE: RangeInclusive<f32> = 5.0..=100.0;
pub const PURSUER_SPEED_RANGE: RangeInclusive<f32> = 0.5..=10.0;
pub const PURSUER_SIZE_RANGE: RangeInclusive<f32> = 20.0..=200.0;
pub const VOLUME_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// 24-bit RGB color, written as `#rrggbb` in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (as produced by `<input type="color">`)
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s).ok_or_else(|| format!("invalid color {:?}", s))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// A single control-panel change
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlChange {
    AvatarSpeed(f32),
    PursuerSpeed(f32),
    PursuerSize(f32),
    AvatarColor(Color),
    PursuerColor(Color),
    BackgroundColor(Color),
    Volume(f32),
}

/// Live control values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Avatar moves a fifth of this per key press
    pub avatar_speed: f32,
    /// Pursuer moves this much per axis per frame
    pub pursuer_speed: f32,
    /// Side length of the pursuer square (px)
    pub pursuer_size: f32,

    // === Colors ===
    pub avatar_color: Color,
    pub pursuer_color: Color,
    pub background_color: Color,

    // === Audio ===
    /// Music volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            avatar_speed: 50.0,
            pursuer_speed: 2.0,
            pursuer_size: 50.0,

            avatar_color: Color::rgb(0x00, 0xff, 0xcc),
            pursuer_color: Color::rgb(0xff, 0x00, 0x66),
            background_color: Color::rgb(0x11, 0x11, 0x22),

            volume: 0.5,
        }
    }
}

impl Settings {
    /// Apply a control change, clamping numeric values to their slider range
    pub fn apply(&mut self, change: ControlChange) {
        match change {
            ControlChange::AvatarSpeed(v) => self.avatar_speed = clamp(v, AVATAR_SPEED_RANGE),
            ControlChange::PursuerSpeed(v) => self.pursuer_speed = clamp(v, PURSUER_SPEED_RANGE),
            ControlChange::PursuerSize(v) => self.pursuer_size = clamp(v, PURSUER_SIZE_RANGE),
            ControlChange::AvatarColor(c) => self.avatar_color = c,
            ControlChange::PursuerColor(c) => self.pursuer_color = c,
            ControlChange::BackgroundColor(c) => self.background_color = c,
            ControlChange::Volume(v) => self.volume = clamp(v, VOLUME_RANGE),
        }
    }

    /// Clamp every numeric field into range (used after loading)
    pub fn sanitized(mut self) -> Self {
        self.avatar_speed = clamp(self.avatar_speed, AVATAR_SPEED_RANGE);
        self.pursuer_speed = clamp(self.pursuer_speed, PURSUER_SPEED_RANGE);
        self.pursuer_size = clamp(self.pursuer_size, PURSUER_SIZE_RANGE);
        self.volume = clamp(self.volume, VOLUME_RANGE);
        self
    }

    /// Load settings from the store, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        if let Some(json) = store.get_item(SETTINGS_KEY) {
            match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings.sanitized();
                }
                Err(e) => log::warn!("Discarding corrupt settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set_item(SETTINGS_KEY, &json)?;
        log::debug!("Settings saved");
        Ok(())
    }
}

/// Clamp into `range`; NaN falls back to the range minimum
fn clamp(v: f32, range: RangeInclusive<f32>) -> f32 {
    if v.is_nan() {
        *range.start()
    } else {
        v.clamp(*range.start(), *range.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_color_hex_parsing() {
        assert_eq!(Color::from_hex("#ff0066"), Some(Color::rgb(255, 0, 102)));
        assert_eq!(Color::from_hex("#00FFcc"), Some(Color::rgb(0, 255, 204)));
        assert_eq!(Color::from_hex("ff0066"), None);
        assert_eq!(Color::from_hex("#ff006"), None);
        assert_eq!(Color::from_hex("#gg0066"), None);
        assert_eq!(Color::rgb(1, 2, 255).to_string(), "#0102ff");
    }

    #[test]
    fn test_apply_clamps_to_slider_ranges() {
        let mut settings = Settings::default();
        settings.apply(ControlChange::AvatarSpeed(1000.0));
        assert_eq!(settings.avatar_speed, 100.0);
        settings.apply(ControlChange::PursuerSpeed(-3.0));
        assert_eq!(settings.pursuer_speed, 0.5);
        settings.apply(ControlChange::PursuerSize(75.0));
        assert_eq!(settings.pursuer_size, 75.0);
        settings.apply(ControlChange::Volume(f32::NAN));
        assert_eq!(settings.volume, 0.0);
        settings.apply(ControlChange::BackgroundColor(Color::rgb(1, 2, 3)));
        assert_eq!(settings.background_color, Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.apply(ControlChange::PursuerSpeed(4.5));
        settings.apply(ControlChange::AvatarColor(Color::rgb(0xab, 0xcd, 0xef)));
        settings.save(&mut store).unwrap();

        let json = store.get_item(SETTINGS_KEY).unwrap();
        assert!(json.contains("\"#abcdef\""));
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_load_falls_back_on_corrupt_json() {
        let mut store = MemoryStore::new();
        store.set_item(SETTINGS_KEY, "{not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());

        store
            .set_item(SETTINGS_KEY, r##"{"avatar_color":"#zzzzzz"}"##)
            .unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_load_fills_missing_fields_and_clamps() {
        let mut store = MemoryStore::new();
        store
            .set_item(SETTINGS_KEY, r#"{"pursuer_speed":99.0}"#)
            .unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.pursuer_speed, 10.0);
        assert_eq!(settings.avatar_speed, Settings::default().avatar_speed);
    }
}

//! Escapa - a browser chase minigame
//!
//! Core modules:
//! - `sim`: Pure gameplay logic (collision, pursuit, timer, input, state)
//! - `game`: Orchestrates frames, rounds, best time and live controls
//! - `platform`: Frame scheduling (requestAnimationFrame on web, frame queue on native)
//! - `persistence`: Key/value storage (LocalStorage on web)
//! - `renderer`: Presentation adapter
//! - `settings`: Live control-panel values

pub mod audio;
pub mod best_time;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use best_time::BestTime;
pub use game::{Game, RoundSummary};
pub use settings::{Color, ControlChange, Settings};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Where the avatar starts every round
    pub const AVATAR_START: Vec2 = Vec2::new(100.0, 100.0);
    /// Where the pursuer starts every round
    pub const PURSUER_START: Vec2 = Vec2::new(300.0, 300.0);

    /// Avatar is a fixed 50x50 square
    pub const AVATAR_SIZE: f32 = 50.0;

    /// One key press moves the avatar `avatar_speed / STEP_DIVISOR`
    pub const STEP_DIVISOR: f32 = 5.0;

    /// Play area used before the surface has been measured
    pub const DEFAULT_PLAY_AREA: Vec2 = Vec2::new(800.0, 600.0);

    /// LocalStorage key for the best time (seconds, stored as a float string)
    pub const BEST_TIME_KEY: &str = "escapa_best_time";
    /// LocalStorage key for control-panel settings (JSON)
    pub const SETTINGS_KEY: &str = "escapa_settings";
}

/// Format seconds with one decimal, as shown in the HUD
pub fn format_seconds(secs: f64) -> String {
    format!("{:.1}", secs)
}

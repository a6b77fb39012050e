//! Game state and core simulation types

use glam::Vec2;

use super::collision::Rect;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Pursuer is chasing, input is live
    #[default]
    Playing,
    /// Pursuer caught the avatar; only an explicit reset leaves this phase
    GameOver,
}

/// Everything that changes during a round
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Avatar top-left corner
    pub avatar: Vec2,
    /// Pursuer top-left corner
    pub pursuer: Vec2,
    pub phase: GamePhase,
    /// Avatar moves `avatar_speed / STEP_DIVISOR` per key press
    pub avatar_speed: f32,
    /// Pursuer moves this much per axis per frame
    pub pursuer_speed: f32,
    pub avatar_size: f32,
    pub pursuer_size: f32,
    /// Width/height of the bounded area the avatar lives in
    pub play_area: Vec2,
}

impl GameState {
    /// Fresh round using the current control values
    pub fn new(settings: &Settings, play_area: Vec2) -> Self {
        let mut state = Self {
            avatar: AVATAR_START,
            pursuer: PURSUER_START,
            phase: GamePhase::Playing,
            avatar_speed: settings.avatar_speed,
            pursuer_speed: settings.pursuer_speed,
            avatar_size: AVATAR_SIZE,
            pursuer_size: settings.pursuer_size,
            play_area,
        };
        state.clamp_avatar();
        state
    }

    /// Put entities back at their start positions and re-read speed/size
    /// from the live controls. Calling it twice yields the same state.
    pub fn reset(&mut self, settings: &Settings) {
        *self = Self::new(settings, self.play_area);
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Mark the round as lost. There is no way back to Playing except `reset`.
    pub fn end_round(&mut self) {
        self.phase = GamePhase::GameOver;
    }

    pub fn avatar_rect(&self) -> Rect {
        Rect::square(self.avatar, self.avatar_size)
    }

    pub fn pursuer_rect(&self) -> Rect {
        Rect::square(self.pursuer, self.pursuer_size)
    }

    /// Largest top-left coordinate that keeps the avatar inside the play area
    pub fn avatar_max(&self) -> Vec2 {
        (self.play_area - Vec2::splat(self.avatar_size)).max(Vec2::ZERO)
    }

    /// Resize the play area and pull the avatar back inside it
    pub fn set_play_area(&mut self, play_area: Vec2) {
        self.play_area = play_area;
        self.clamp_avatar();
    }

    fn clamp_avatar(&mut self) {
        let max = self.avatar_max();
        self.avatar = self.avatar.max(Vec2::ZERO).min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_uses_controls() {
        let settings = Settings {
            avatar_speed: 40.0,
            pursuer_speed: 3.0,
            pursuer_size: 80.0,
            ..Default::default()
        };
        let state = GameState::new(&settings, DEFAULT_PLAY_AREA);
        assert_eq!(state.avatar, AVATAR_START);
        assert_eq!(state.pursuer, PURSUER_START);
        assert_eq!(state.avatar_speed, 40.0);
        assert_eq!(state.pursuer_speed, 3.0);
        assert_eq!(state.pursuer_rect().size, Vec2::splat(80.0));
        assert_eq!(state.avatar_rect().size, Vec2::splat(AVATAR_SIZE));
        assert!(!state.is_over());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, DEFAULT_PLAY_AREA);
        state.avatar = Vec2::new(10.0, 20.0);
        state.pursuer = Vec2::new(33.0, 44.0);
        state.end_round();

        state.reset(&settings);
        let once = state.clone();
        state.reset(&settings);
        assert_eq!(state, once);
        assert!(!state.is_over());
        assert_eq!(state.avatar, AVATAR_START);
    }

    #[test]
    fn test_reset_reads_live_controls() {
        let mut settings = Settings::default();
        let mut state = GameState::new(&settings, DEFAULT_PLAY_AREA);
        settings.pursuer_speed = 7.0;
        settings.pursuer_size = 120.0;
        state.reset(&settings);
        assert_eq!(state.pursuer_speed, 7.0);
        assert_eq!(state.pursuer_size, 120.0);
    }

    #[test]
    fn test_shrinking_play_area_clamps_avatar() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, DEFAULT_PLAY_AREA);
        state.avatar = Vec2::new(700.0, 500.0);
        state.set_play_area(Vec2::new(400.0, 300.0));
        assert_eq!(state.avatar, Vec2::new(350.0, 250.0));
    }

    #[test]
    fn test_tiny_play_area_pins_avatar_at_origin() {
        let state = GameState::new(&Settings::default(), Vec2::new(20.0, 20.0));
        assert_eq!(state.avatar_max(), Vec2::ZERO);
        assert_eq!(state.avatar, Vec2::ZERO);
    }
}

//! Keyboard input: directional keys move the avatar inside the play area

use super::state::GameState;
use crate::consts::STEP_DIVISOR;

/// One of the four movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a `KeyboardEvent.key` value to a direction.
    ///
    /// Arrow keys and WASD both work, compared case-insensitively.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "arrowup" | "w" => Some(Direction::Up),
            "arrowdown" | "s" => Some(Direction::Down),
            "arrowleft" | "a" => Some(Direction::Left),
            "arrowright" | "d" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Distance a single key press moves the avatar
#[inline]
pub fn avatar_step(avatar_speed: f32) -> f32 {
    avatar_speed / STEP_DIVISOR
}

/// Move the avatar one step in `dir`, clamped to the play area.
///
/// Returns false (and leaves the state untouched) once the round is over.
pub fn move_avatar(state: &mut GameState, dir: Direction) -> bool {
    if state.is_over() {
        return false;
    }

    let step = avatar_step(state.avatar_speed);
    let max = state.avatar_max();
    let pos = &mut state.avatar;
    match dir {
        Direction::Up => pos.y = (pos.y - step).max(0.0),
        Direction::Down => pos.y = (pos.y + step).min(max.y),
        Direction::Left => pos.x = (pos.x - step).max(0.0),
        Direction::Right => pos.x = (pos.x + step).min(max.x),
    }
    true
}

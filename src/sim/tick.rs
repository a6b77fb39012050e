//! Per-frame gameplay step
//!
//! One call advances the chase by a single display frame.

use super::collision::intersects;
use super::pursuit::step_pursuer;
use super::state::GameState;

/// Outcome of a gameplay step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Round is already over, nothing moved
    Idle,
    /// Entities moved (or not), no contact
    Moved,
    /// The pursuer reached the avatar this step; the round is now over
    Caught,
}

/// Advance the pursuer one step toward the avatar and check for contact
pub fn tick(state: &mut GameState) -> StepOutcome {
    if state.is_over() {
        return StepOutcome::Idle;
    }

    state.pursuer = step_pursuer(state.pursuer, state.avatar, state.pursuer_speed);
    check_caught(state)
}

/// End the round if avatar and pursuer overlap.
///
/// Used after pursuer steps and after avatar moves.
pub fn check_caught(state: &mut GameState) -> StepOutcome {
    if state.is_over() {
        return StepOutcome::Idle;
    }

    if intersects(&state.avatar_rect(), &state.pursuer_rect()) {
        state.end_round();
        StepOutcome::Caught
    } else {
        StepOutcome::Moved
    }
}

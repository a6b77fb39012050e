//! Pursuer movement

use glam::Vec2;

/// Move `pursuer` one fixed step of `speed` toward `target` on each axis.
///
/// The step does not scale with distance, so when `speed` does not divide
/// the gap the pursuer overshoots and oscillates around the target. The
/// result is not clamped to the play area.
pub fn step_pursuer(pursuer: Vec2, target: Vec2, speed: f32) -> Vec2 {
    Vec2::new(
        step_axis(pursuer.x, target.x, speed),
        step_axis(pursuer.y, target.y, speed),
    )
}

#[inline]
fn step_axis(from: f32, to: f32, speed: f32) -> f32 {
    if from < to {
        from + speed
    } else if from > to {
        from - speed
    } else {
        from
    }
}

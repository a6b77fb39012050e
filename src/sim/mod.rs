//! Gameplay simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - No rendering, storage or platform dependencies
//! - Time only enters through explicit frame timestamps

pub mod collision;
pub mod input;
pub mod pursuit;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{Rect, intersects};
pub use input::{Direction, avatar_step, move_avatar};
pub use pursuit::step_pursuer;
pub use state::{GamePhase, GameState};
pub use tick::{StepOutcome, check_caught, tick};
pub use timer::Timer;

//! Presentation adapter
//!
//! The game never touches the page directly. After every state change it
//! builds a `VisualState` snapshot and hands it to a `Presenter`, which
//! owns layout and styling.

#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::DomPresenter;

use crate::game::RoundSummary;
use crate::settings::Color;
use crate::sim::Rect;

/// One drawn square
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityVisual {
    pub rect: Rect,
    /// Border and glow color
    pub color: Color,
}

/// Timer readout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub elapsed_secs: f64,
    pub best_secs: f64,
}

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct VisualState {
    pub avatar: EntityVisual,
    pub pursuer: EntityVisual,
    pub background: Color,
    pub hud: Hud,
    /// Present while the game-over overlay should be shown
    pub game_over: Option<RoundSummary>,
}

/// Passive sink for visual state
pub trait Presenter {
    fn apply_visual_state(&mut self, visual: &VisualState);
}

/// Keeps every snapshot it receives
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub frames: Vec<VisualState>,
}

#[cfg(test)]
impl RecordingPresenter {
    pub fn last(&self) -> &VisualState {
        self.frames.last().expect("nothing presented yet")
    }
}

#[cfg(test)]
impl Presenter for RecordingPresenter {
    fn apply_visual_state(&mut self, visual: &VisualState) {
        self.frames.push(visual.clone());
    }
}

//! Background music
//!
//! Browsers often block autoplay until the user interacts with the page, so
//! startup playback goes through a small retry policy: try unmuted, then
//! muted (which is usually allowed) and unmute a moment later, and give up
//! quietly after a few attempts.

/// Result of one `play()` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played,
    Blocked,
}

/// What to do next after a play attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayAction {
    /// Music is playing unmuted
    Done,
    /// Mute the element and call `play()` again
    TryMuted,
    /// Playing muted; unmute after this many ms
    UnmuteAfter(u32),
    /// Start over with the next attempt after this many ms
    RetryAfter { attempt: u32, delay_ms: u32 },
    /// Out of attempts, stay silent
    GiveUp,
}

/// Bounded retry-with-mute policy for autoplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayPolicy {
    /// Attempts (after the first) that may fall back to muted playback
    pub max_retries: u32,
    pub retry_delay_ms: u32,
    pub unmute_delay_ms: u32,
}

impl Default for AutoplayPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_delay_ms: 700,
            unmute_delay_ms: 800,
        }
    }
}

impl AutoplayPolicy {
    /// Next step after an unmuted `play()` on attempt `attempt` (0-based)
    pub fn after_unmuted(&self, attempt: u32, outcome: PlayOutcome) -> AutoplayAction {
        match outcome {
            PlayOutcome::Played => AutoplayAction::Done,
            PlayOutcome::Blocked if attempt < self.max_retries => AutoplayAction::TryMuted,
            PlayOutcome::Blocked => AutoplayAction::GiveUp,
        }
    }

    /// Next step after the muted fallback `play()` on attempt `attempt`
    pub fn after_muted(&self, attempt: u32, outcome: PlayOutcome) -> AutoplayAction {
        match outcome {
            PlayOutcome::Played => AutoplayAction::UnmuteAfter(self.unmute_delay_ms),
            PlayOutcome::Blocked => AutoplayAction::RetryAfter {
                attempt: attempt + 1,
                delay_ms: self.retry_delay_ms,
            },
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::MusicPlayer;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlAudioElement;

    use super::{AutoplayAction, AutoplayPolicy, PlayOutcome};
    use crate::platform::web::sleep_ms;

    /// Wrapper around the page's `<audio>` element
    #[derive(Clone)]
    pub struct MusicPlayer {
        element: HtmlAudioElement,
        policy: AutoplayPolicy,
    }

    impl MusicPlayer {
        pub fn new(element: HtmlAudioElement) -> Self {
            Self {
                element,
                policy: AutoplayPolicy::default(),
            }
        }

        /// Set volume (0.0 - 1.0)
        pub fn set_volume(&self, volume: f32) {
            self.element.set_volume(volume.clamp(0.0, 1.0) as f64);
        }

        /// Resume playback; returns once the browser accepted or refused
        pub async fn play(&self) -> PlayOutcome {
            let Ok(promise) = self.element.play() else {
                return PlayOutcome::Blocked;
            };
            match JsFuture::from(promise).await {
                Ok(_) => PlayOutcome::Played,
                Err(e) => {
                    log::debug!("play() refused: {:?}", e);
                    PlayOutcome::Blocked
                }
            }
        }

        pub fn pause(&self) {
            if self.element.pause().is_err() {
                log::warn!("Failed to pause music");
            }
        }

        /// Best-effort autoplay. `on_playing` runs once music starts.
        pub async fn autoplay(&self, volume: f32, on_playing: impl Fn()) {
            let mut attempt = 0;
            loop {
                self.set_volume(volume);
                let mut action = self.policy.after_unmuted(attempt, self.play().await);
                if action == AutoplayAction::TryMuted {
                    self.element.set_muted(true);
                    action = self.policy.after_muted(attempt, self.play().await);
                }

                match action {
                    AutoplayAction::Done => {
                        self.element.set_muted(false);
                        on_playing();
                        return;
                    }
                    AutoplayAction::UnmuteAfter(delay_ms) => {
                        on_playing();
                        sleep_ms(delay_ms).await;
                        self.element.set_muted(false);
                        return;
                    }
                    AutoplayAction::RetryAfter { attempt: next, delay_ms } => {
                        log::debug!("Autoplay blocked, retrying in {}ms", delay_ms);
                        sleep_ms(delay_ms).await;
                        attempt = next;
                    }
                    AutoplayAction::TryMuted | AutoplayAction::GiveUp => {
                        log::info!("Autoplay blocked - music waits for the play button");
                        return;
                    }
                }
            }
        }
    }
}

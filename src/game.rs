//! Game orchestration
//!
//! `Game` owns every piece of mutable state (round, timer, best time,
//! settings) together with its storage backend and presenter. Frame
//! callbacks, key presses, control changes and the reset button all come
//! through here; the `sim` functions underneath stay pure.

use glam::Vec2;

use crate::best_time::BestTime;
use crate::persistence::KeyValueStore;
use crate::platform::{FrameHandler, FrameScheduler, FrameStream};
use crate::renderer::{EntityVisual, Hud, Presenter, VisualState};
use crate::settings::{ControlChange, Settings};
use crate::sim::{self, Direction, GameState, StepOutcome, Timer};

/// Result of a finished round, shown on the game-over overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummary {
    /// How long the avatar survived
    pub elapsed_secs: f64,
    /// Best time after this round was taken into account
    pub best_secs: f64,
    /// This round set a new best time
    pub new_record: bool,
}

/// Game instance holding all state
pub struct Game<S: KeyValueStore, P: Presenter> {
    state: GameState,
    timer: Timer,
    best: BestTime,
    settings: Settings,
    store: S,
    presenter: P,
    /// Summary of the round that just ended, cleared on reset
    last_round: Option<RoundSummary>,
    /// A timer frame is already queued; avoids a second tick chain
    timer_frame_pending: bool,
}

impl<S: KeyValueStore, P: Presenter> Game<S, P> {
    /// Read best time and settings from `store` and set up the first round
    pub fn new(store: S, presenter: P, play_area: Vec2) -> Self {
        let best = BestTime::load(&store);
        let settings = Settings::load(&store);
        Self {
            state: GameState::new(&settings, play_area),
            timer: Timer::new(),
            best,
            settings,
            store,
            presenter,
            last_round: None,
            timer_frame_pending: false,
        }
    }

    /// Draw the first frame, start the game loop and the round timer
    pub fn boot(&mut self, scheduler: &mut dyn FrameScheduler) {
        log::info!("Escapa starting (best {:.1}s)", self.best.secs());
        self.present();
        scheduler.request_frame(FrameStream::GameLoop);
        self.reset(scheduler);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn best_time(&self) -> BestTime {
        self.best
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn last_round(&self) -> Option<RoundSummary> {
        self.last_round
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// One gameplay frame: step the pursuer, redraw, check for contact.
    ///
    /// The loop always reschedules itself; once the round is over it just
    /// idles until a reset.
    pub fn on_loop_frame(&mut self, scheduler: &mut dyn FrameScheduler) {
        match sim::tick(&mut self.state) {
            StepOutcome::Idle => {}
            StepOutcome::Moved => self.present(),
            StepOutcome::Caught => {
                self.finish_round();
                self.present();
            }
        }
        scheduler.request_frame(FrameStream::GameLoop);
    }

    /// One timer frame: accumulate elapsed time and refresh the HUD
    pub fn on_timer_frame(&mut self, timestamp_ms: f64, scheduler: &mut dyn FrameScheduler) {
        self.timer_frame_pending = false;
        if self.timer.tick(timestamp_ms) {
            self.present();
            self.schedule_timer(scheduler);
        }
    }

    /// Handle a `keydown` key value. Returns true if it moved the avatar.
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(dir) = Direction::from_key(key) else {
            return false;
        };
        if !sim::move_avatar(&mut self.state, dir) {
            return false;
        }

        if sim::check_caught(&mut self.state) == StepOutcome::Caught {
            self.finish_round();
        }
        self.present();
        true
    }

    /// Start a new round: entities back to start, speeds and size from the
    /// current controls, overlay hidden, timer restarted.
    pub fn reset(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.state.reset(&self.settings);
        self.last_round = None;
        self.timer.reset();
        self.timer.start();
        self.present();
        self.schedule_timer(scheduler);
        log::info!("Round started");
    }

    /// Apply a control-panel change immediately and persist the settings
    pub fn apply_control(&mut self, change: ControlChange) {
        self.settings.apply(change);
        match change {
            ControlChange::AvatarSpeed(_) => self.state.avatar_speed = self.settings.avatar_speed,
            ControlChange::PursuerSpeed(_) => {
                self.state.pursuer_speed = self.settings.pursuer_speed
            }
            ControlChange::PursuerSize(_) => self.state.pursuer_size = self.settings.pursuer_size,
            _ => {}
        }

        if let Err(e) = self.settings.save(&mut self.store) {
            log::warn!("Failed to save settings: {}", e);
        }
        self.present();
    }

    /// The play surface changed size
    pub fn resize(&mut self, play_area: Vec2) {
        self.state.set_play_area(play_area);
        self.present();
    }

    /// Snapshot of everything the presenter draws
    pub fn visual_state(&self) -> VisualState {
        VisualState {
            avatar: EntityVisual {
                rect: self.state.avatar_rect(),
                color: self.settings.avatar_color,
            },
            pursuer: EntityVisual {
                rect: self.state.pursuer_rect(),
                color: self.settings.pursuer_color,
            },
            background: self.settings.background_color,
            hud: Hud {
                elapsed_secs: self.timer.elapsed_secs(),
                best_secs: self.best.secs(),
            },
            game_over: self.last_round,
        }
    }

    /// Collision-over transition. `sim` has already flipped the round to
    /// over, which keeps this from running twice.
    fn finish_round(&mut self) {
        self.timer.stop();
        let elapsed_secs = self.timer.elapsed_secs();

        let new_record = self.best.record(elapsed_secs);
        if new_record {
            log::info!("New best time: {:.1}s", elapsed_secs);
            if let Err(e) = self.best.save(&mut self.store) {
                log::warn!("Failed to save best time: {}", e);
            }
        }

        log::info!("Caught after {:.1}s", elapsed_secs);
        self.last_round = Some(RoundSummary {
            elapsed_secs,
            best_secs: self.best.secs(),
            new_record,
        });
    }

    fn schedule_timer(&mut self, scheduler: &mut dyn FrameScheduler) {
        if !self.timer_frame_pending {
            scheduler.request_frame(FrameStream::Timer);
            self.timer_frame_pending = true;
        }
    }

    fn present(&mut self) {
        let visual = self.visual_state();
        self.presenter.apply_visual_state(&visual);
    }
}

impl<S: KeyValueStore, P: Presenter> FrameHandler for Game<S, P> {
    fn on_frame(&mut self, stream: FrameStream, timestamp_ms: f64, scheduler: &mut dyn FrameScheduler) {
        log::trace!("{:?} frame at {:.1}ms", stream, timestamp_ms);
        match stream {
            FrameStream::GameLoop => self.on_loop_frame(scheduler),
            FrameStream::Timer => self.on_timer_frame(timestamp_ms, scheduler),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::persistence::{MemoryStore, StorageError};
    use crate::platform::{FixedRateClock, FrameQueue};
    use crate::renderer::RecordingPresenter;
    use crate::settings::Color;

    type TestGame = Game<MemoryStore, RecordingPresenter>;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn booted(store: MemoryStore) -> (TestGame, FrameQueue) {
        let mut game = Game::new(store, RecordingPresenter::default(), DEFAULT_PLAY_AREA);
        let mut queue = FrameQueue::new();
        game.boot(&mut queue);
        (game, queue)
    }

    /// Storage that can be read but refuses every write
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get_item(&self, _key: &str) -> Option<String> {
            None
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    /// Pump frames 100ms apart starting at t=1000 until the round ends
    fn play_until_caught<S: KeyValueStore>(
        game: &mut Game<S, RecordingPresenter>,
        queue: &mut FrameQueue,
    ) -> usize {
        let mut clock = FixedRateClock::new(900.0, 100.0);
        let mut frames = 0;
        while !game.state().is_over() {
            queue.pump(game, clock.next_frame());
            frames += 1;
            assert!(frames < 10_000, "round never ended");
        }
        frames
    }

    #[test]
    fn test_boot_schedules_loop_and_timer() {
        let (game, queue) = booted(MemoryStore::new());
        assert!(queue.is_pending(FrameStream::GameLoop));
        assert!(queue.is_pending(FrameStream::Timer));
        assert_eq!(queue.len(), 2);
        assert!(game.timer().is_running());
        assert_eq!(game.state().avatar, AVATAR_START);
        assert!(game.presenter().last().game_over.is_none());
    }

    #[test]
    fn test_round_ends_when_pursuer_arrives() {
        let (mut game, mut queue) = booted(MemoryStore::new());
        let frames = play_until_caught(&mut game, &mut queue);

        // Default pursuer speed 2 closes the 200px gap on frame 76
        assert_eq!(frames, 76);
        assert!(!game.timer().is_running());
        // Timer baselined at t=1000, last counted tick at t=8400
        assert!(approx(game.timer().elapsed_secs(), 7.4));

        let summary = game.last_round().unwrap();
        assert!(summary.new_record);
        assert!(approx(summary.best_secs, 7.4));
        assert_eq!(game.presenter().last().game_over, Some(summary));
    }

    #[test]
    fn test_new_best_is_persisted() {
        let (mut game, mut queue) = booted(MemoryStore::new());
        play_until_caught(&mut game, &mut queue);

        let stored: f64 = game
            .store()
            .get_item(BEST_TIME_KEY)
            .unwrap()
            .parse()
            .unwrap();
        assert!(approx(stored, 7.4));
        assert!(approx(game.presenter().last().hud.best_secs, 7.4));
    }

    #[test]
    fn test_shorter_round_keeps_stored_best() {
        let mut store = MemoryStore::new();
        store.set_item(BEST_TIME_KEY, "10.0").unwrap();
        let (mut game, mut queue) = booted(store);
        assert_eq!(game.presenter().last().hud.best_secs, 10.0);

        play_until_caught(&mut game, &mut queue);
        let summary = game.last_round().unwrap();
        assert!(!summary.new_record);
        assert_eq!(summary.best_secs, 10.0);
        assert_eq!(game.store().get_item(BEST_TIME_KEY).as_deref(), Some("10.0"));
    }

    #[test]
    fn test_loop_keeps_running_after_game_over() {
        let (mut game, mut queue) = booted(MemoryStore::new());
        play_until_caught(&mut game, &mut queue);
        let frozen = game.state().clone();
        let presented = game.presenter().frames.len();
        let elapsed = game.timer().elapsed_secs();

        for t in 0..10 {
            queue.pump(&mut game, 10_000.0 + t as f64 * 100.0);
            assert!(queue.is_pending(FrameStream::GameLoop));
        }
        // Timer chain ended, gameplay frozen, overlay shown once
        assert!(!queue.is_pending(FrameStream::Timer));
        assert_eq!(game.state(), &frozen);
        assert_eq!(game.timer().elapsed_secs(), elapsed);
        assert_eq!(game.presenter().frames.len(), presented);
        let overlays = game
            .presenter()
            .frames
            .iter()
            .filter(|f| f.game_over.is_some())
            .count();
        assert_eq!(overlays, 1);
    }

    #[test]
    fn test_reset_starts_fresh_round() {
        let (mut game, mut queue) = booted(MemoryStore::new());
        play_until_caught(&mut game, &mut queue);
        queue.pump(&mut game, 20_000.0);

        game.reset(&mut queue);
        assert!(!game.state().is_over());
        assert_eq!(game.state().avatar, AVATAR_START);
        assert_eq!(game.state().pursuer, PURSUER_START);
        assert!(game.last_round().is_none());
        assert!(game.presenter().last().game_over.is_none());
        assert!(game.timer().is_running());
        assert_eq!(game.timer().elapsed_secs(), 0.0);
        assert!(queue.is_pending(FrameStream::Timer));

        // Best time survives the reset
        assert!(approx(game.best_time().secs(), 7.4));
    }

    #[test]
    fn test_reset_shows_zeroed_timer() {
        let (mut game, mut queue) = booted(MemoryStore::new());
        play_until_caught(&mut game, &mut queue);
        assert!(approx(game.presenter().last().hud.elapsed_secs, 7.4));

        game.reset(&mut queue);
        let shown = game.presenter().last();
        assert_eq!(shown.hud.elapsed_secs, 0.0);
        assert!(shown.game_over.is_none());
    }

    #[test]
    fn test_failed_writes_do_not_interrupt_play() {
        let mut game = Game::new(ReadOnlyStore, RecordingPresenter::default(), DEFAULT_PLAY_AREA);
        let mut queue = FrameQueue::new();
        game.boot(&mut queue);
        play_until_caught(&mut game, &mut queue);

        // Best time kept in memory even though it could not be stored
        assert!(approx(game.best_time().secs(), 7.4));
        let summary = game.last_round().unwrap();
        assert!(summary.new_record);
        assert_eq!(game.presenter().last().game_over, Some(summary));

        game.reset(&mut queue);
        game.apply_control(ControlChange::PursuerSpeed(3.0));
        assert_eq!(game.settings().pursuer_speed, 3.0);
        assert_eq!(game.state().pursuer_speed, 3.0);

        queue.pump(&mut game, 30_000.0);
        assert_eq!(game.state().pursuer, Vec2::new(297.0, 297.0));
    }

    #[test]
    fn test_reset_twice_matches_reset_once() {
        let (mut game, mut queue) = booted(MemoryStore::new());
        for t in 0..5 {
            queue.pump(&mut game, 1000.0 + t as f64 * 16.0);
        }
        game.key_down("d");

        game.reset(&mut queue);
        let state = game.state().clone();
        let timer = game.timer().clone();
        game.reset(&mut queue);
        assert_eq!(game.state(), &state);
        assert_eq!(game.timer(), &timer);

        // Still a single timer chain
        assert_eq!(queue.count(FrameStream::Timer), 1);
        assert_eq!(queue.count(FrameStream::GameLoop), 1);
    }

    #[test]
    fn test_key_down_moves_avatar() {
        let (mut game, _queue) = booted(MemoryStore::new());
        assert!(game.key_down("ArrowLeft"));
        assert_eq!(game.state().avatar, Vec2::new(90.0, 100.0));
        assert!(game.key_down("S"));
        assert_eq!(game.state().avatar, Vec2::new(90.0, 110.0));
        assert_eq!(
            game.presenter().last().avatar.rect.pos,
            Vec2::new(90.0, 110.0)
        );

        let presented = game.presenter().frames.len();
        assert!(!game.key_down("Shift"));
        assert_eq!(game.presenter().frames.len(), presented);
    }

    #[test]
    fn test_walking_into_pursuer_ends_round() {
        let (mut game, _queue) = booted(MemoryStore::new());
        game.state.pursuer = Vec2::new(165.0, 100.0);

        assert!(game.key_down("ArrowRight"));
        assert!(!game.state().is_over());
        assert!(game.key_down("ArrowRight"));
        assert!(game.state().is_over());
        assert!(game.last_round().is_some());

        // Input ignored from now on
        assert!(!game.key_down("ArrowLeft"));
        assert_eq!(game.state().avatar, Vec2::new(120.0, 100.0));
    }

    #[test]
    fn test_controls_apply_live_and_persist() {
        let (mut game, mut queue) = booted(MemoryStore::new());
        game.apply_control(ControlChange::PursuerSpeed(5.0));
        assert_eq!(game.state().pursuer_speed, 5.0);

        queue.pump(&mut game, 1000.0);
        assert_eq!(game.state().pursuer, Vec2::new(295.0, 295.0));

        game.apply_control(ControlChange::PursuerSize(120.0));
        assert_eq!(game.presenter().last().pursuer.rect.size, Vec2::splat(120.0));

        game.apply_control(ControlChange::AvatarSpeed(25.0));
        game.key_down("d");
        assert_eq!(game.state().avatar.x, 105.0);

        let red = Color::rgb(255, 0, 0);
        game.apply_control(ControlChange::BackgroundColor(red));
        assert_eq!(game.presenter().last().background, red);

        let saved = Settings::load(game.store());
        assert_eq!(&saved, game.settings());
        assert_eq!(saved.pursuer_speed, 5.0);
    }

    #[test]
    fn test_reset_uses_current_controls() {
        let (mut game, mut queue) = booted(MemoryStore::new());
        game.apply_control(ControlChange::PursuerSpeed(7.0));
        game.state.pursuer_speed = 1.0;
        game.reset(&mut queue);
        assert_eq!(game.state().pursuer_speed, 7.0);
    }

    #[test]
    fn test_settings_loaded_at_startup() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            pursuer_size: 90.0,
            ..Default::default()
        };
        settings.save(&mut store).unwrap();

        let (game, _queue) = booted(store);
        assert_eq!(game.state().pursuer_size, 90.0);
    }

    #[test]
    fn test_resize_clamps_avatar() {
        let (mut game, _queue) = booted(MemoryStore::new());
        game.resize(Vec2::new(120.0, 400.0));
        assert_eq!(game.state().avatar, Vec2::new(70.0, 100.0));
        assert_eq!(game.presenter().last().avatar.rect.pos, Vec2::new(70.0, 100.0));
    }
}

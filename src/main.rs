//! Escapa entry point
//!
//! On the web this wires the page (keyboard, reset button, control panel,
//! music) to the game and starts the frame loop. Natively it runs a
//! headless simulation on a fixed-rate clock.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlAudioElement, HtmlElement, HtmlInputElement, Window};

    use escapa::audio::MusicPlayer;
    use escapa::persistence::LocalStorage;
    use escapa::platform::web::RafScheduler;
    use escapa::renderer::DomPresenter;
    use escapa::{Color, ControlChange, Game, Settings};

    type App = Game<LocalStorage, DomPresenter>;

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let play_area_el = document
            .query_selector(".game-area")?
            .ok_or("no .game-area element")?;
        let presenter = DomPresenter::new(&document)?;
        let game = Rc::new(RefCell::new(Game::new(
            LocalStorage::new(),
            presenter,
            measure(&play_area_el),
        )));

        let music = document
            .get_element_by_id("bg-music")
            .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok())
            .map(MusicPlayer::new);
        if music.is_none() {
            log::warn!("No #bg-music element - music disabled");
        }

        sync_controls(&document, game.borrow().settings());
        setup_keyboard(&window, game.clone());
        setup_reset_button(&document, game.clone());
        setup_controls(&document, game.clone(), music.clone());
        setup_resize(&window, play_area_el, game.clone());
        if let Some(music) = music {
            setup_music(&document, music, game.borrow().settings().volume);
        }

        let mut scheduler = RafScheduler::new(game.clone());
        game.borrow_mut().boot(&mut scheduler);

        log::info!("Escapa running!");
        Ok(())
    }

    fn measure(play_area: &Element) -> Vec2 {
        Vec2::new(play_area.client_width() as f32, play_area.client_height() as f32)
    }

    fn input(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn set_label(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(&format!("{}-value", id)) {
            el.set_text_content(Some(text));
        }
    }

    /// Slider/picker ids and how their value maps to a control change
    const CONTROLS: &[(&str, fn(&str) -> Option<ControlChange>)] = &[
        ("avatar-speed", |v: &str| v.parse().ok().map(ControlChange::AvatarSpeed)),
        ("pursuer-speed", |v: &str| v.parse().ok().map(ControlChange::PursuerSpeed)),
        ("pursuer-size", |v: &str| v.parse().ok().map(ControlChange::PursuerSize)),
        ("avatar-color", |v: &str| Color::from_hex(v).map(ControlChange::AvatarColor)),
        ("pursuer-color", |v: &str| Color::from_hex(v).map(ControlChange::PursuerColor)),
        ("bg-color", |v: &str| Color::from_hex(v).map(ControlChange::BackgroundColor)),
        ("volume", |v: &str| v.parse().ok().map(ControlChange::Volume)),
    ];

    /// Show the loaded settings in the control panel
    fn sync_controls(document: &Document, settings: &Settings) {
        let values = [
            ("avatar-speed", settings.avatar_speed.to_string()),
            ("pursuer-speed", settings.pursuer_speed.to_string()),
            ("pursuer-size", settings.pursuer_size.to_string()),
            ("avatar-color", settings.avatar_color.to_string()),
            ("pursuer-color", settings.pursuer_color.to_string()),
            ("bg-color", settings.background_color.to_string()),
            ("volume", settings.volume.to_string()),
        ];
        for (id, value) in values {
            if let Some(el) = input(document, id) {
                el.set_value(&value);
            }
            set_label(document, id, &value);
        }
    }

    fn setup_controls(document: &Document, game: Rc<RefCell<App>>, music: Option<MusicPlayer>) {
        for &(id, parse) in CONTROLS {
            let Some(el) = input(document, id) else {
                log::warn!("Control #{} not found", id);
                continue;
            };

            let game = game.clone();
            let music = music.clone();
            let document = document.clone();
            let el_clone = el.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let value = el_clone.value();
                let Some(change) = parse(&value) else {
                    log::warn!("Ignoring invalid value {:?} for #{}", value, id);
                    return;
                };
                let mut g = game.borrow_mut();
                g.apply_control(change);
                if let (ControlChange::Volume(_), Some(music)) = (change, &music) {
                    music.set_volume(g.settings().volume);
                }
                set_label(&document, id, &value);
            });
            let _ = el.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(window: &Window, game: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            game.borrow_mut().key_down(&event.key());
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_reset_button(document: &Document, game: Rc<RefCell<App>>) {
        let Some(btn) = document.get_element_by_id("reset-button") else {
            log::warn!("No #reset-button element");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut scheduler = RafScheduler::new(game.clone());
            game.borrow_mut().reset(&mut scheduler);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(window: &Window, play_area: Element, game: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize(measure(&play_area));
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_music(document: &Document, music: MusicPlayer, volume: f32) {
        let play_btn = document
            .get_element_by_id("play-music")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let pause_btn = document
            .get_element_by_id("pause-music")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());

        let mark_active = {
            let play_btn = play_btn.clone();
            let pause_btn = pause_btn.clone();
            move |playing: bool| {
                if let Some(btn) = &play_btn {
                    let _ = btn.class_list().toggle_with_force("active", playing);
                }
                if let Some(btn) = &pause_btn {
                    let _ = btn.class_list().toggle_with_force("active", !playing);
                }
            }
        };

        if let Some(btn) = &play_btn {
            let music = music.clone();
            let mark_active = mark_active.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let music = music.clone();
                let mark_active = mark_active.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    if music.play().await == escapa::audio::PlayOutcome::Played {
                        mark_active(true);
                    }
                });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = &pause_btn {
            let music = music.clone();
            let mark_active = mark_active.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                music.pause();
                mark_active(false);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        wasm_bindgen_futures::spawn_local(async move {
            music.autoplay(volume, || mark_active(true)).await;
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Escapa (native) starting...");
    log::info!("Native mode runs a headless chase - run with `trunk serve` for the web version");

    let rounds = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(3);
    headless::run(rounds);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use escapa::Game;
    use escapa::format_seconds;
    use escapa::persistence::MemoryStore;
    use escapa::platform::{FixedRateClock, FrameQueue};
    use escapa::renderer::{Presenter, VisualState};
    use escapa::consts::DEFAULT_PLAY_AREA;

    /// Give up on a round after two simulated minutes at 60 Hz
    const MAX_FRAMES: u32 = 60 * 120;
    /// The bot reacts every few frames, like a player tapping keys
    const KEY_INTERVAL: u32 = 6;

    /// Logs frames instead of drawing them
    struct LogPresenter;

    impl Presenter for LogPresenter {
        fn apply_visual_state(&mut self, visual: &VisualState) {
            log::trace!(
                "avatar {:?} pursuer {:?} time {}s",
                visual.avatar.rect.pos,
                visual.pursuer.rect.pos,
                format_seconds(visual.hud.elapsed_secs)
            );
        }
    }

    /// Key that moves the avatar away from the pursuer along the wider gap
    fn flee_key(game: &Game<MemoryStore, LogPresenter>) -> &'static str {
        let state = game.state();
        let away = state.avatar - state.pursuer;
        if away.x.abs() >= away.y.abs() {
            if away.x >= 0.0 { "d" } else { "a" }
        } else if away.y >= 0.0 {
            "s"
        } else {
            "w"
        }
    }

    pub fn run(rounds: u32) {
        let mut game = Game::new(MemoryStore::new(), LogPresenter, DEFAULT_PLAY_AREA);
        let mut queue = FrameQueue::new();
        let mut clock = FixedRateClock::default();
        game.boot(&mut queue);

        for round in 1..=rounds {
            if round > 1 {
                game.reset(&mut queue);
            }

            let mut frames = 0;
            while !game.state().is_over() && frames < MAX_FRAMES {
                if frames % KEY_INTERVAL == 0 {
                    let key = flee_key(&game);
                    game.key_down(key);
                }
                queue.pump(&mut game, clock.next_frame());
                frames += 1;
            }

            match game.last_round() {
                Some(summary) => println!(
                    "Round {}: caught after {}s (best {}s{})",
                    round,
                    format_seconds(summary.elapsed_secs),
                    format_seconds(summary.best_secs),
                    if summary.new_record { ", new record" } else { "" }
                ),
                None => println!(
                    "Round {}: survived {} frames, stopping",
                    round, frames
                ),
            }
        }
    }
}

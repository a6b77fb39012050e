//! DOM presenter: absolutely positioned divs inside the play area

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use super::{EntityVisual, Presenter, VisualState};
use crate::format_seconds;

/// Page elements the game writes to
pub struct DomPresenter {
    body: HtmlElement,
    avatar: HtmlElement,
    pursuer: HtmlElement,
    game_over: HtmlElement,
    timer: HtmlElement,
    best_time: HtmlElement,
    last_time: HtmlElement,
    best_overlay: HtmlElement,
    /// Last applied snapshot, to skip untouched elements
    last: Option<VisualState>,
}

fn element(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{}", id)))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("#{} is not an HTML element", id)))
}

impl DomPresenter {
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            body: document
                .body()
                .ok_or_else(|| JsValue::from_str("no body"))?,
            avatar: element(document, "avatar")?,
            pursuer: element(document, "pursuer")?,
            game_over: element(document, "game-over-screen")?,
            timer: element(document, "timer")?,
            best_time: element(document, "best-time-display")?,
            last_time: element(document, "last-time")?,
            best_overlay: element(document, "best-time")?,
            last: None,
        })
    }

    fn place(el: &HtmlElement, entity: &EntityVisual) {
        let style = el.style();
        let rect = entity.rect;
        let _ = style.set_property("left", &format!("{}px", rect.pos.x));
        let _ = style.set_property("top", &format!("{}px", rect.pos.y));
        let _ = style.set_property("width", &format!("{}px", rect.size.x));
        let _ = style.set_property("height", &format!("{}px", rect.size.y));
    }

    fn tint(el: &HtmlElement, entity: &EntityVisual) {
        let style = el.style();
        let color = entity.color.to_string();
        let _ = style.set_property("border-color", &color);
        let _ = style.set_property("box-shadow", &format!("0 0 15px {}", color));
    }
}

impl Presenter for DomPresenter {
    fn apply_visual_state(&mut self, visual: &VisualState) {
        let prev = self.last.take();
        let prev = prev.as_ref();

        for (el, entity, old) in [
            (&self.avatar, &visual.avatar, prev.map(|p| &p.avatar)),
            (&self.pursuer, &visual.pursuer, prev.map(|p| &p.pursuer)),
        ] {
            if old.map(|o| o.rect) != Some(entity.rect) {
                Self::place(el, entity);
            }
            if old.map(|o| o.color) != Some(entity.color) {
                Self::tint(el, entity);
            }
        }

        if prev.map(|p| p.background) != Some(visual.background) {
            let _ = self
                .body
                .style()
                .set_property("background-color", &visual.background.to_string());
        }

        let best = format_seconds(visual.hud.best_secs);
        self.timer.set_text_content(Some(&format!(
            "Time: {}s | Best: {}s",
            format_seconds(visual.hud.elapsed_secs),
            best
        )));
        self.best_time.set_text_content(Some(&best));
        self.best_overlay
            .set_text_content(Some(&format!("Best: {}s", best)));

        if prev.map(|p| p.game_over) != Some(visual.game_over) {
            let classes = self.body.class_list();
            match visual.game_over {
                Some(summary) => {
                    self.last_time.set_text_content(Some(&format!(
                        "Your time: {}s{}",
                        format_seconds(summary.elapsed_secs),
                        if summary.new_record { " - new record!" } else { "" }
                    )));
                    let _ = self.game_over.style().set_property("display", "flex");
                    let _ = classes.add_1("dead");
                }
                None => {
                    let _ = self.game_over.style().set_property("display", "none");
                    let _ = classes.remove_1("dead");
                }
            }
        }

        self.last = Some(visual.clone());
    }
}

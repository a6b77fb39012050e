//! Browser scheduling on top of `requestAnimationFrame` and `setTimeout`

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{FrameHandler, FrameScheduler, FrameStream};

/// Schedules frames for a shared handler via `requestAnimationFrame`
pub struct RafScheduler<H: FrameHandler + 'static> {
    handler: Rc<RefCell<H>>,
}

impl<H: FrameHandler + 'static> RafScheduler<H> {
    pub fn new(handler: Rc<RefCell<H>>) -> Self {
        Self { handler }
    }
}

impl<H: FrameHandler + 'static> FrameScheduler for RafScheduler<H> {
    fn request_frame(&mut self, stream: FrameStream) {
        let Some(window) = web_sys::window() else {
            log::error!("No window - cannot schedule {:?} frame", stream);
            return;
        };

        let handler = self.handler.clone();
        // Freed on the JS side once the frame has fired
        let callback = Closure::once_into_js(move |time: f64| {
            let mut scheduler = RafScheduler::new(handler.clone());
            handler.borrow_mut().on_frame(stream, time, &mut scheduler);
        });
        if window
            .request_animation_frame(callback.unchecked_ref())
            .is_err()
        {
            log::error!("requestAnimationFrame failed for {:?}", stream);
        }
    }
}

/// Resolve after `ms` milliseconds
pub async fn sleep_ms(ms: u32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

//! Platform abstraction layer
//!
//! Frame scheduling: the game registers self-rescheduling per-frame
//! callbacks (the gameplay loop and the round timer). In the browser this is
//! `requestAnimationFrame`; natively and in tests a `FrameQueue` is pumped
//! with timestamps from a clock.

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::collections::VecDeque;

/// Independent per-frame callback chains sharing one scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameStream {
    /// Pursuer step, redraw and collision check
    GameLoop,
    /// Timer accumulation
    Timer,
}

/// Something that can run a callback on the next display frame
pub trait FrameScheduler {
    /// Ask for `stream` to be invoked once on the next frame
    fn request_frame(&mut self, stream: FrameStream);
}

/// Receiver of scheduled frames
pub trait FrameHandler {
    /// Called once per requested frame with the frame timestamp (ms).
    /// Re-request through `scheduler` to keep the stream alive.
    fn on_frame(&mut self, stream: FrameStream, timestamp_ms: f64, scheduler: &mut dyn FrameScheduler);
}

/// Explicit frame queue for native runs and deterministic tests.
///
/// Requests made while a frame is being dispatched run on the following
/// frame, the same as `requestAnimationFrame`.
#[derive(Debug, Default)]
pub struct FrameQueue {
    pending: VecDeque<FrameStream>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self, stream: FrameStream) -> bool {
        self.pending.contains(&stream)
    }

    /// Number of queued requests for `stream`
    pub fn count(&self, stream: FrameStream) -> usize {
        self.pending.iter().filter(|&&s| s == stream).count()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Dispatch every stream requested before this call, in request order
    pub fn pump(&mut self, handler: &mut dyn FrameHandler, timestamp_ms: f64) -> usize {
        let due: Vec<FrameStream> = self.pending.drain(..).collect();
        for &stream in &due {
            handler.on_frame(stream, timestamp_ms, self);
        }
        due.len()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self, stream: FrameStream) {
        self.pending.push_back(stream);
    }
}

/// Clock that advances a fixed interval per frame (60 Hz by default)
#[derive(Debug, Clone)]
pub struct FixedRateClock {
    now_ms: f64,
    interval_ms: f64,
}

impl FixedRateClock {
    pub const DEFAULT_INTERVAL_MS: f64 = 1000.0 / 60.0;

    pub fn new(start_ms: f64, interval_ms: f64) -> Self {
        Self {
            now_ms: start_ms,
            interval_ms,
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Advance one frame and return the new timestamp
    pub fn next_frame(&mut self) -> f64 {
        self.now_ms += self.interval_ms;
        self.now_ms
    }
}

impl Default for FixedRateClock {
    fn default() -> Self {
        Self::new(0.0, Self::DEFAULT_INTERVAL_MS)
    }
}

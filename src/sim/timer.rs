//! Round timer
//!
//! Accumulates wall-clock deltas between frame timestamps rather than
//! counting frames, so elapsed time does not depend on the refresh rate.

/// Elapsed-time accumulator with a Stopped/Running lifecycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timer {
    /// Seconds accumulated since the last `start()`
    elapsed_secs: f64,
    running: bool,
    /// Timestamp (ms) of the previous tick, `None` until the first tick after start/stop
    last_timestamp: Option<f64>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    /// Zero the elapsed time without touching the running state
    pub fn reset(&mut self) {
        self.elapsed_secs = 0.0;
    }

    /// Zero the elapsed time and begin running. The caller is responsible
    /// for scheduling the first tick.
    pub fn start(&mut self) {
        self.elapsed_secs = 0.0;
        self.last_timestamp = None;
        self.running = true;
    }

    /// Stop accumulating. Elapsed is kept for display until the next `start()`.
    pub fn stop(&mut self) {
        self.running = false;
        self.last_timestamp = None;
    }

    /// Advance with a frame timestamp in milliseconds.
    ///
    /// Returns true when the timer wants another tick scheduled.
    pub fn tick(&mut self, timestamp_ms: f64) -> bool {
        if !self.running {
            self.last_timestamp = Some(timestamp_ms);
            return false;
        }

        // First tick after start only sets the baseline
        let last = self.last_timestamp.unwrap_or(timestamp_ms);
        let delta_secs = ((timestamp_ms - last) / 1000.0).max(0.0);
        self.elapsed_secs += delta_secs;
        self.last_timestamp = Some(timestamp_ms);
        true
    }
}

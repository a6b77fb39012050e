//! Best survival time
//!
//! Persisted as a float string under a single key, read once at load.

use crate::consts::BEST_TIME_KEY;
use crate::persistence::{KeyValueStore, StorageError};

/// Longest survival ever recorded, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BestTime {
    secs: f64,
}

impl BestTime {
    pub fn new(secs: f64) -> Self {
        Self {
            secs: sanitize(secs),
        }
    }

    pub fn secs(&self) -> f64 {
        self.secs
    }

    /// True if a round lasting `elapsed_secs` would set a new record
    pub fn is_beaten_by(&self, elapsed_secs: f64) -> bool {
        elapsed_secs > self.secs
    }

    /// Take `elapsed_secs` as the new best if it beats the current one.
    /// Returns true when the record changed.
    pub fn record(&mut self, elapsed_secs: f64) -> bool {
        if !self.is_beaten_by(elapsed_secs) {
            return false;
        }
        self.secs = sanitize(elapsed_secs);
        true
    }

    /// Load from the store. Missing or garbage values read as 0.
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get_item(BEST_TIME_KEY) {
            Some(raw) => match leading_float(&raw) {
                Some(secs) => {
                    let best = Self::new(secs);
                    log::info!("Loaded best time: {:.1}s", best.secs);
                    best
                }
                None => {
                    log::warn!("Ignoring unparsable best time {:?}", raw);
                    Self::default()
                }
            },
            None => {
                log::info!("No best time found, starting fresh");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        store.set_item(BEST_TIME_KEY, &self.secs.to_string())
    }
}

/// Longest numeric prefix of `raw`, so hand-edited values like `12.3s`
/// still read as 12.3
fn leading_float(raw: &str) -> Option<f64> {
    let raw = raw.trim_start();
    raw.char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .rev()
        .find_map(|end| raw[..end].parse::<f64>().ok())
}

fn sanitize(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 { secs } else { 0.0 }
}

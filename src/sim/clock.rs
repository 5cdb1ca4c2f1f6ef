//! Round clock
//!
//! Counts in whole milliseconds so tick sums stay exact (180 ticks of 100 ms
//! is exactly 18 s).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    elapsed_ms: u64,
    running: bool,
    paused: bool,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
        self.paused = false;
    }

    /// Stop for good; later `advance` calls are ignored
    pub fn stop(&mut self) {
        self.running = false;
        self.paused = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn pause(&mut self) {
        if self.running {
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Add time if the clock is ticking. Returns whether it moved.
    pub fn advance(&mut self, delta_ms: u64) -> bool {
        if !self.is_ticking() {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        true
    }

    /// Time penalty; applies even between ticks
    pub(crate) fn add_penalty(&mut self, ms: u64) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(ms);
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn is_ticking(&self) -> bool {
        self.running && !self.paused
    }

    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }

    /// HUD text, tenths of a second
    pub fn display(&self) -> String {
        crate::format_secs(self.elapsed_secs())
    }
}

//! Platform abstraction layer
//!
//! Browser builds expose `WebGame` to the page script, which owns the render
//! loop and forwards clicks and `requestAnimationFrame` timestamps. Native
//! builds drive `RoundEngine` directly (see `main.rs`).

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebGame;

/// Converts absolute frame timestamps into clamped round-time deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
    carry: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole milliseconds since the previous frame, capped at `MAX_FRAME_MS`.
    /// Sub-millisecond remainders carry over to the next frame.
    pub fn delta_ms(&mut self, now_ms: f64) -> u64 {
        let Some(last) = self.last.replace(now_ms) else {
            return 0;
        };
        let raw = (now_ms - last).max(0.0) + self.carry;
        let whole = raw.floor();
        self.carry = raw - whole;
        (whole as u64).min(crate::consts::MAX_FRAME_MS)
    }

    /// Forget the previous timestamp (after pause/resume or a restart)
    pub fn reset(&mut self) {
        self.last = None;
        self.carry = 0.0;
    }
}

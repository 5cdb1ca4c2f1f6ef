//! Stunt Show - click the numbers 1 to 25 as fast as you can
//!
//! Core modules:
//! - `sim`: Round engine (board, clock, mode rules, timers, click handling)
//! - `progress`: Progress sink (coins, personal bests)
//! - `leaderboard`: Local fastest-completion table
//! - `settings`: Mode/difficulty/skin selection
//! - `persistence`: Key-value snapshot in LocalStorage
//! - `platform`: Browser binding (wasm32 only)

pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod progress;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, StoreError};
pub use leaderboard::Leaderboard;
pub use progress::{Profile, ProgressSink};
pub use settings::Settings;
pub use sim::{Difficulty, Mode, RoundEngine, RoundResult, RoundStatus};

/// Game configuration constants
pub mod consts {
    /// Number of tiles on the board (values 1..=25)
    pub const BOARD_SIZE: usize = 25;
    /// Value whose click completes a round
    pub const LAST_TILE: u32 = BOARD_SIZE as u32;

    /// Clock cadence (ms of round time per clock tick)
    pub const TICK_MS: u64 = 100;
    /// Hidden-board period before a Normal round accepts clicks
    pub const REVEAL_DELAY_MS: u64 = 500;
    /// Time penalty / input lock length after a wrong click
    pub const PENALTY_MS: u64 = 3000;

    /// Sumamos: replenish cadence
    pub const REPLENISH_INTERVAL_MS: u64 = 2000;
    /// Sumamos: tiles recycled per replenish tick
    pub const REPLENISH_BATCH: usize = 2;
    /// Sumamos: first synthetic value written over a consumed tile
    pub const FIRST_SYNTHETIC_VALUE: u32 = LAST_TILE + 1;

    /// Extreme: obscure cadence
    pub const OBSCURE_INTERVAL_MS: u64 = 3000;

    /// Completion time that earns zero coins; each second under it earns 2
    pub const CURRENCY_PAR_SECS: f64 = 25.0;
    pub const CURRENCY_PER_SEC: f64 = 2.0;

    /// Largest frame delta accepted by the driver (tab switches, breakpoints)
    pub const MAX_FRAME_MS: u64 = 250;
}

/// Coins earned for a completion time: `floor((25 - secs) * 2)`, never negative.
#[inline]
pub fn currency_for(final_elapsed_secs: f64) -> u32 {
    let raw = ((consts::CURRENCY_PAR_SECS - final_elapsed_secs) * consts::CURRENCY_PER_SEC).floor();
    if raw > 0.0 { raw as u32 } else { 0 }
}

/// Format seconds with tenths, the way the HUD shows time
#[inline]
pub fn format_secs(secs: f64) -> String {
    format!("{:.1}", secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_for() {
        assert_eq!(currency_for(10.0), 30);
        assert_eq!(currency_for(24.6), 0);
        assert_eq!(currency_for(25.0), 0);
        assert_eq!(currency_for(40.0), 0);
        assert_eq!(currency_for(12.3), 25);
    }

    #[test]
    fn test_format_secs() {
        assert_eq!(format_secs(12.34), "12.3");
        assert_eq!(format_secs(0.0), "0.0");
    }
}

//! Round engine
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Round time only advances through `advance`
//! - Seeded RNG only
//! - Timers fire in due order, ties broken by timer kind
//! - No rendering or platform dependencies

pub mod board;
pub mod clock;
pub mod engine;
pub mod rules;
pub mod state;
pub mod tick;

pub use board::Board;
pub use clock::Clock;
pub use engine::RoundEngine;
pub use rules::{Difficulty, Mode, ModeRules, PenaltyPolicy, TileBehavior};
pub use state::{
    ClickOutcome, Opponent, OpponentView, Round, RoundResult, RoundSnapshot, RoundStatus,
    TileView, TimerKind, Timers,
};

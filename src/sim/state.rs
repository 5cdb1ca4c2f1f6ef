//! Round state and presentation types
//!
//! A `Round` owns everything a play session mutates, including its pending
//! timers. Dropping or replacing the round drops the timers with it.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::Board;
use super::clock::Clock;
use super::rules::{Difficulty, Mode, ModeRules, TileBehavior};
use crate::consts::*;

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    #[default]
    Idle,
    Running,
    Won,
    Lost,
}

impl RoundStatus {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundStatus::Won | RoundStatus::Lost)
    }
}

/// AI racer (Competitive only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opponent {
    /// Drawn for display; the AI never reads it
    pub board: Board,
    /// Next value the AI will clear
    pub ai_next_expected: u32,
}

impl Opponent {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            ai_next_expected: 1,
        }
    }

    /// The AI has cleared its last tile
    #[inline]
    pub fn finished(&self) -> bool {
        self.ai_next_expected >= LAST_TILE
    }
}

/// Periodic and one-shot tasks, as round-time due stamps (ms)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    pub clock: Option<u64>,
    pub reveal: Option<u64>,
    pub ai: Option<u64>,
    pub tiles: Option<u64>,
}

/// Which timer fired; declaration order breaks ties between equal due stamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerKind {
    Clock,
    Reveal,
    Ai,
    Tiles,
}

impl Timers {
    /// Schedule every task the mode needs, starting at round time 0
    pub fn for_round(rules: &ModeRules, difficulty: Difficulty) -> Self {
        Self {
            clock: Some(TICK_MS),
            reveal: rules.reveal_delay_ms,
            ai: rules.opponent.then(|| difficulty.ai_interval_ms()),
            tiles: match rules.tiles {
                TileBehavior::Static => None,
                TileBehavior::Replenish { interval_ms, .. } => Some(interval_ms),
                TileBehavior::Obscure { interval_ms } => Some(interval_ms),
            },
        }
    }

    /// Earliest pending task
    pub fn next_due(&self) -> Option<(u64, TimerKind)> {
        [
            (self.clock, TimerKind::Clock),
            (self.reveal, TimerKind::Reveal),
            (self.ai, TimerKind::Ai),
            (self.tiles, TimerKind::Tiles),
        ]
        .into_iter()
        .filter_map(|(due, kind)| due.map(|d| (d, kind)))
        .min()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.next_due().is_none()
    }

    /// Cancel everything
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Emitted once when a round ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub mode: Mode,
    pub difficulty: Difficulty,
    /// Seconds on the clock at the end (penalties included)
    pub final_elapsed: f64,
    pub won: bool,
    pub currency_awarded: u32,
    /// Beats the best time the progress sink had for this mode
    pub personal_best: bool,
}

/// Result of a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No state change (not running, concealed, locked, paused, cleared tile, bad index)
    Ignored,
    /// Correct tile; the new target
    Advanced { next_expected: u32 },
    /// Last tile clicked, round won
    Completed,
    /// Pending tile clicked out of order
    Penalized,
}

/// A single play session
#[derive(Debug, Clone)]
pub struct Round {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub rules: ModeRules,
    pub board: Board,
    pub next_expected: u32,
    pub clock: Clock,
    pub status: RoundStatus,
    pub combo: u32,
    pub revealed: bool,
    /// Round-time stamp until which input is rejected
    pub penalized_until: Option<u64>,
    /// Obscured positions (Extreme)
    pub hidden: BTreeSet<usize>,
    /// Next recycled value (Sumamos)
    pub replenish_counter: u32,
    pub opponent: Option<Opponent>,
    /// Contrarreloj limit
    pub time_limit_ms: Option<u64>,
    /// Round time; every timer and the penalty lock are measured against it
    pub now_ms: u64,
    pub(crate) timers: Timers,
    pub(crate) rng: Pcg32,
    /// Set by the terminal transition, taken by the engine
    pub(crate) result: Option<RoundResult>,
}

impl Round {
    /// Build a running round. `opponent_board` is only kept when the mode races an AI.
    pub fn new(
        mode: Mode,
        difficulty: Difficulty,
        board: Board,
        opponent_board: Option<Board>,
        seed: u64,
    ) -> Self {
        let rules = mode.rules();
        let mut clock = Clock::new();
        clock.start();

        Self {
            mode,
            difficulty,
            rules,
            board,
            next_expected: 1,
            clock,
            status: RoundStatus::Running,
            combo: 0,
            revealed: rules.reveal_delay_ms.is_none(),
            penalized_until: None,
            hidden: BTreeSet::new(),
            replenish_counter: FIRST_SYNTHETIC_VALUE,
            opponent: if rules.opponent {
                opponent_board.map(Opponent::new)
            } else {
                None
            },
            time_limit_ms: rules.timed.then(|| difficulty.time_limit_ms()),
            now_ms: 0,
            timers: Timers::for_round(&rules, difficulty),
            rng: Pcg32::seed_from_u64(seed),
            result: None,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.status == RoundStatus::Running
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Input lock still active
    #[inline]
    pub fn is_penalized(&self) -> bool {
        self.penalized_until.is_some_and(|until| self.now_ms < until)
    }

    /// Every gate a click has to pass
    pub fn accepts_input(&self) -> bool {
        self.is_running() && self.revealed && !self.is_paused() && !self.is_penalized()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    /// Countdown for timed modes
    pub fn remaining_secs(&self) -> Option<f64> {
        self.time_limit_ms
            .map(|limit| limit.saturating_sub(self.clock.elapsed_ms()) as f64 / 1000.0)
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// How a board position should be drawn right now
    pub fn tile_view(&self, position: usize) -> TileView {
        let Some(value) = self.board.get(position) else {
            return TileView::Cleared;
        };
        if value < self.next_expected {
            TileView::Cleared
        } else if !self.revealed {
            TileView::Concealed
        } else if self.hidden.contains(&position) {
            TileView::Obscured
        } else if self.rules.mirrored {
            TileView::Mirrored(value)
        } else {
            TileView::Number(value)
        }
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            mode: self.mode,
            difficulty: self.difficulty,
            status: self.status,
            board: self.board.tiles().to_vec(),
            tiles: (0..BOARD_SIZE).map(|i| self.tile_view(i)).collect(),
            next_expected: self.next_expected,
            elapsed: self.clock.elapsed_secs(),
            remaining: self.remaining_secs(),
            combo: self.combo,
            revealed: self.revealed,
            hidden: self.hidden.iter().copied().collect(),
            penalized_until: self.penalized_until.filter(|_| self.is_penalized()),
            locked: self.is_penalized(),
            paused: self.is_paused(),
            now_ms: self.now_ms,
            opponent: self.opponent.as_ref().map(|o| OpponentView {
                ai_next_expected: o.ai_next_expected,
                tiles: o
                    .board
                    .tiles()
                    .iter()
                    .map(|&v| (v >= o.ai_next_expected).then_some(v))
                    .collect(),
            }),
        }
    }
}

/// Derived tile appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TileView {
    /// Already passed: blank and disabled
    Cleared,
    /// Board not revealed yet
    Concealed,
    /// Covered with "?" (Extreme)
    Obscured,
    Number(u32),
    /// Number drawn horizontally flipped (Mirror)
    Mirrored(u32),
}

impl TileView {
    /// Clickable in principle (the lock may still reject it)
    pub fn is_enabled(&self) -> bool {
        !matches!(self, TileView::Cleared | TileView::Concealed)
    }

    /// Text content for simple renderers
    pub fn label(&self) -> String {
        match self {
            TileView::Cleared | TileView::Concealed => String::new(),
            TileView::Obscured => "?".to_string(),
            TileView::Number(v) | TileView::Mirrored(v) => v.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentView {
    pub ai_next_expected: u32,
    /// `None` for tiles the AI has already cleared
    pub tiles: Vec<Option<u32>>,
}

/// Presentation snapshot, serialized to JSON for the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub status: RoundStatus,
    pub board: Vec<u32>,
    pub tiles: Vec<TileView>,
    pub next_expected: u32,
    pub elapsed: f64,
    pub remaining: Option<f64>,
    pub combo: u32,
    pub revealed: bool,
    pub hidden: Vec<usize>,
    pub penalized_until: Option<u64>,
    pub locked: bool,
    pub paused: bool,
    pub now_ms: u64,
    pub opponent: Option<OpponentView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordered_board() -> Board {
        let mut tiles = [0u32; BOARD_SIZE];
        for (i, t) in tiles.iter_mut().enumerate() {
            *t = i as u32 + 1;
        }
        Board::from_tiles(tiles)
    }

    #[test]
    fn test_new_round_defaults() {
        let round = Round::new(Mode::Normal, Difficulty::Amateur, ordered_board(), None, 1);
        assert_eq!(round.status, RoundStatus::Running);
        assert_eq!(round.next_expected, 1);
        assert_eq!(round.replenish_counter, 26);
        assert!(!round.revealed);
        assert!(round.opponent.is_none());
        assert!(round.time_limit_ms.is_none());
        assert!(!round.accepts_input());
    }

    #[test]
    fn test_opponent_only_in_competitive() {
        let round = Round::new(
            Mode::Mirror,
            Difficulty::Top,
            ordered_board(),
            Some(ordered_board()),
            1,
        );
        assert!(round.opponent.is_none());

        let round = Round::new(
            Mode::Competitive,
            Difficulty::Top,
            ordered_board(),
            Some(ordered_board()),
            1,
        );
        assert_eq!(round.opponent.as_ref().map(|o| o.ai_next_expected), Some(1));
        assert!(round.revealed);
    }

    #[test]
    fn test_timer_schedule_per_mode() {
        let t = Timers::for_round(&Mode::Normal.rules(), Difficulty::Amateur);
        assert_eq!(t.next_due(), Some((100, TimerKind::Clock)));
        assert_eq!(t.reveal, Some(500));
        assert_eq!(t.ai, None);

        let t = Timers::for_round(&Mode::Competitive.rules(), Difficulty::Principiante);
        assert_eq!(t.ai, Some(800));

        let t = Timers::for_round(&Mode::Sumamos.rules(), Difficulty::Amateur);
        assert_eq!(t.tiles, Some(2000));

        let t = Timers::for_round(&Mode::Extreme.rules(), Difficulty::Amateur);
        assert_eq!(t.tiles, Some(3000));
    }

    #[test]
    fn test_timer_tie_order() {
        let t = Timers {
            clock: Some(800),
            reveal: None,
            ai: Some(800),
            tiles: Some(700),
        };
        assert_eq!(t.next_due(), Some((700, TimerKind::Tiles)));
        let t = Timers { tiles: None, ..t };
        assert_eq!(t.next_due(), Some((800, TimerKind::Clock)));
    }

    #[test]
    fn test_tile_views() {
        let mut round = Round::new(Mode::Extreme, Difficulty::Amateur, ordered_board(), None, 1);
        round.next_expected = 3;
        round.hidden.insert(4);
        assert_eq!(round.tile_view(0), TileView::Cleared);
        assert_eq!(round.tile_view(2), TileView::Number(3));
        assert_eq!(round.tile_view(4), TileView::Obscured);
        assert_eq!(round.tile_view(4).label(), "?");

        let round = Round::new(Mode::Mirror, Difficulty::Amateur, ordered_board(), None, 1);
        assert_eq!(round.tile_view(9), TileView::Mirrored(10));

        let round = Round::new(Mode::Normal, Difficulty::Amateur, ordered_board(), None, 1);
        assert_eq!(round.tile_view(0), TileView::Concealed);
        assert!(!round.tile_view(0).is_enabled());
    }

    #[test]
    fn test_snapshot_serializes() {
        let round = Round::new(
            Mode::Contrarreloj,
            Difficulty::Leyenda,
            ordered_board(),
            None,
            1,
        );
        let snap = round.snapshot();
        assert_eq!(snap.tiles.len(), BOARD_SIZE);
        assert_eq!(snap.remaining, Some(12.0));

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"mode\":\"contrarreloj\""));
        assert!(json.contains("\"kind\":\"number\""));
    }
}

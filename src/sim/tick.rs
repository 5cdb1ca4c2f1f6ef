//! Round timers and click handling
//!
//! `advance` walks round time forward and fires due timers one at a time, in
//! due order. Each handler runs to completion before the next is looked up, and
//! a terminal transition clears the timer record in the same call, so nothing
//! can fire against a finished round.

use rand::Rng;

use super::rules::{PenaltyPolicy, TileBehavior};
use super::state::{ClickOutcome, Round, RoundResult, RoundStatus, TimerKind};
use crate::consts::*;

impl Round {
    /// Move round time forward by `delta_ms`, firing every timer that falls due
    pub fn advance(&mut self, delta_ms: u64) {
        if !self.is_running() || self.is_paused() {
            return;
        }

        let target = self.now_ms.saturating_add(delta_ms);
        while let Some((due, kind)) = self.timers.next_due() {
            if due > target {
                break;
            }
            self.now_ms = due;
            self.fire(kind);
            if !self.is_running() {
                return;
            }
        }
        self.now_ms = target;
    }

    fn fire(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Clock => {
                self.timers.clock = Some(self.now_ms + TICK_MS);
                self.clock.advance(TICK_MS);
                self.check_time_limit();
            }
            TimerKind::Reveal => {
                self.timers.reveal = None;
                self.revealed = true;
            }
            TimerKind::Ai => {
                self.timers.ai = Some(self.now_ms + self.difficulty.ai_interval_ms());
                self.advance_opponent();
            }
            TimerKind::Tiles => match self.rules.tiles {
                TileBehavior::Static => self.timers.tiles = None,
                TileBehavior::Replenish { interval_ms, batch } => {
                    self.timers.tiles = Some(self.now_ms + interval_ms);
                    self.replenish(batch);
                }
                TileBehavior::Obscure { interval_ms } => {
                    self.timers.tiles = Some(self.now_ms + interval_ms);
                    self.obscure_one();
                }
            },
        }
    }

    fn check_time_limit(&mut self) {
        if let Some(limit) = self.time_limit_ms {
            if self.clock.elapsed_ms() >= limit {
                log::info!("{}: time limit of {} s reached", self.mode, limit / 1000);
                self.finish(false);
            }
        }
    }

    fn advance_opponent(&mut self) {
        let Some(opponent) = self.opponent.as_mut() else {
            self.timers.ai = None;
            return;
        };
        if opponent.finished() {
            log::info!("Opponent cleared the board first");
            self.finish(false);
        } else {
            opponent.ai_next_expected += 1;
        }
    }

    /// Recycle consumed tiles, first in board order, once at least `batch` exist
    fn replenish(&mut self, batch: usize) {
        let consumed: Vec<usize> = self.board.consumed_positions(self.next_expected).collect();
        if consumed.len() < batch {
            return;
        }
        for &position in consumed.iter().take(batch) {
            self.board.set(position, self.replenish_counter);
            self.replenish_counter += 1;
        }
        log::debug!(
            "Replenished {} tiles, next synthetic value {}",
            batch,
            self.replenish_counter
        );
    }

    /// Cover one random pending tile
    fn obscure_one(&mut self) {
        let pending: Vec<usize> = self.board.pending_positions(self.next_expected).collect();
        if pending.is_empty() {
            return;
        }
        let position = pending[self.rng.random_range(0..pending.len())];
        self.hidden.insert(position);
        log::debug!("Obscured position {}", position);
    }

    /// Handle a click on a board position
    pub fn click(&mut self, position: usize) -> ClickOutcome {
        if !self.accepts_input() {
            return ClickOutcome::Ignored;
        }
        let Some(value) = self.board.get(position) else {
            return ClickOutcome::Ignored;
        };

        if value == self.next_expected {
            self.combo += 1;
            if value == LAST_TILE && self.rules.completes_at_last_tile {
                self.finish(true);
                return ClickOutcome::Completed;
            }
            self.next_expected += 1;
            self.hidden.remove(&position);
            ClickOutcome::Advanced {
                next_expected: self.next_expected,
            }
        } else if value > self.next_expected {
            self.combo = 0;
            self.apply_penalty();
            ClickOutcome::Penalized
        } else {
            ClickOutcome::Ignored
        }
    }

    fn apply_penalty(&mut self) {
        match self.rules.penalty {
            PenaltyPolicy::TimePenalty { ms } => {
                self.clock.add_penalty(ms);
                log::debug!("Wrong tile: +{} ms, clock at {}", ms, self.clock.display());
                // The penalty can jump past the limit between clock ticks. Lose
                // now, otherwise a click before the next tick wins on an
                // expired clock.
                self.check_time_limit();
            }
            PenaltyPolicy::InputLock { ms } => {
                self.penalized_until = Some(self.now_ms + ms);
                log::debug!("Wrong tile: input locked until {} ms", self.now_ms + ms);
            }
        }
    }

    /// Terminal transition: stop the clock, cancel timers, stage the result
    pub(crate) fn finish(&mut self, won: bool) {
        if !self.is_running() {
            return;
        }
        self.status = if won {
            RoundStatus::Won
        } else {
            RoundStatus::Lost
        };
        self.clock.stop();
        self.timers.clear();
        self.penalized_until = None;

        let final_elapsed = self.clock.elapsed_secs();
        self.result = Some(RoundResult {
            mode: self.mode,
            difficulty: self.difficulty,
            final_elapsed,
            won,
            currency_awarded: if won { crate::currency_for(final_elapsed) } else { 0 },
            personal_best: false,
        });
    }

    /// Hand the staged result to the caller, at most once
    pub(crate) fn take_result(&mut self) -> Option<RoundResult> {
        self.result.take()
    }

    /// Freeze round time; the round stays `Running`
    pub fn pause(&mut self) {
        if self.is_running() {
            self.clock.pause();
        }
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }
}

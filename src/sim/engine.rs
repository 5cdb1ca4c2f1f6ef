//! Round engine: owns the current round and reports finished ones
//!
//! The engine is the only thing that talks to the progress sink, and it only
//! does so when a round hands over its staged result. Restarting or abandoning
//! drops the old `Round` (timers included) without reporting anything.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::board::Board;
use super::rules::{Difficulty, Mode};
use super::state::{ClickOutcome, Round, RoundSnapshot, RoundStatus};
use crate::ConfigError;
use crate::progress::ProgressSink;
use crate::settings::Settings;

pub struct RoundEngine<S: ProgressSink> {
    sink: S,
    rng: Pcg32,
    round: Option<Round>,
}

impl<S: ProgressSink> RoundEngine<S> {
    pub fn new(sink: S, seed: u64) -> Self {
        Self {
            sink,
            rng: Pcg32::seed_from_u64(seed),
            round: None,
        }
    }

    /// Begin a new round, discarding any current one
    pub fn start(&mut self, mode: Mode, difficulty: Difficulty) -> &Round {
        if let Some(old) = self.round.as_ref().filter(|r| r.is_running()) {
            log::info!("Restarting: previous {} round discarded", old.mode);
        }

        let board = Board::generate(&mut self.rng);
        let opponent_board = mode
            .rules()
            .opponent
            .then(|| Board::generate(&mut self.rng));
        let seed: u64 = self.rng.random();

        log::info!("Starting {} round ({})", mode, difficulty);
        self.round.insert(Round::new(mode, difficulty, board, opponent_board, seed))
    }

    /// Start from menu keys; unknown keys are a caller bug and fail here
    pub fn start_keys(&mut self, mode: &str, difficulty: &str) -> Result<&Round, ConfigError> {
        let mode: Mode = mode.parse()?;
        let difficulty: Difficulty = difficulty.parse()?;
        Ok(self.start(mode, difficulty))
    }

    pub fn start_from_settings(&mut self, settings: &Settings) -> &Round {
        self.start(settings.mode, settings.difficulty)
    }

    /// Leave the round screen: drop the round, report nothing
    pub fn abandon(&mut self) {
        if self.round.take().is_some() {
            log::info!("Round abandoned");
        }
    }

    pub fn click(&mut self, position: usize) -> ClickOutcome {
        let Some(round) = self.round.as_mut() else {
            return ClickOutcome::Ignored;
        };
        let outcome = round.click(position);
        self.report();
        outcome
    }

    /// Feed elapsed real time to the current round
    pub fn advance(&mut self, delta_ms: u64) {
        if let Some(round) = self.round.as_mut() {
            round.advance(delta_ms);
            self.report();
        }
    }

    pub fn pause(&mut self) {
        if let Some(round) = self.round.as_mut() {
            round.pause();
        }
    }

    pub fn resume(&mut self) {
        if let Some(round) = self.round.as_mut() {
            round.resume();
        }
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn status(&self) -> RoundStatus {
        self.round.as_ref().map(|r| r.status).unwrap_or_default()
    }

    pub fn snapshot(&self) -> Option<RoundSnapshot> {
        self.round.as_ref().map(Round::snapshot)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Forward a staged result to the sink, marking personal bests
    fn report(&mut self) {
        let Some(mut result) = self.round.as_mut().and_then(Round::take_result) else {
            return;
        };
        result.personal_best =
            result.won && beats(result.final_elapsed, self.sink.personal_best(result.mode));

        if result.won {
            log::info!(
                "{} completed in {} s, +{} coins{}",
                result.mode,
                crate::format_secs(result.final_elapsed),
                result.currency_awarded,
                if result.personal_best { " (personal best)" } else { "" }
            );
        } else {
            log::info!(
                "{} lost at {} s",
                result.mode,
                crate::format_secs(result.final_elapsed)
            );
        }
        self.sink.on_round_end(&result);
    }
}

/// Lower is better; no stored best counts as infinitely slow
fn beats(time: f64, best: Option<f64>) -> bool {
    time < best.unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BOARD_SIZE;
    use crate::sim::state::RoundResult;

    /// Sink that just records what it was given
    #[derive(Default)]
    struct Recorder {
        results: Vec<RoundResult>,
        best: Option<f64>,
    }

    impl ProgressSink for Recorder {
        fn personal_best(&self, _mode: Mode) -> Option<f64> {
            self.best
        }

        fn on_round_end(&mut self, result: &RoundResult) {
            self.results.push(result.clone());
        }
    }

    fn clear_board(engine: &mut RoundEngine<Recorder>) {
        for v in 1..=25u32 {
            let pos = engine.round().unwrap().board.position_of(v).unwrap();
            engine.click(pos);
        }
    }

    #[test]
    fn test_start_resets_round() {
        let mut engine = RoundEngine::new(Recorder::default(), 1);
        let round = engine.start(Mode::Normal, Difficulty::Amateur);
        assert_eq!(round.status, RoundStatus::Running);
        assert_eq!(round.next_expected, 1);
        assert!(!round.revealed);

        let mut values = round.board.tiles().to_vec();
        values.sort_unstable();
        assert_eq!(values.len(), BOARD_SIZE);
        assert_eq!(values, (1..=25).collect::<Vec<u32>>());
    }

    #[test]
    fn test_start_keys_fails_fast() {
        let mut engine = RoundEngine::new(Recorder::default(), 1);
        assert!(matches!(
            engine.start_keys("speedrun", "amateur"),
            Err(ConfigError::UnknownMode(_))
        ));
        assert!(matches!(
            engine.start_keys("normal", "dios"),
            Err(ConfigError::UnknownDifficulty(_))
        ));
        assert!(engine.round().is_none());
        assert!(engine.start_keys("contrarreloj", "leyenda").is_ok());
        assert_eq!(engine.round().unwrap().time_limit_ms, Some(12_000));
    }

    #[test]
    fn test_win_reports_exactly_once() {
        let mut engine = RoundEngine::new(Recorder::default(), 5);
        engine.start(Mode::Normal, Difficulty::Amateur);
        engine.advance(10_000);
        clear_board(&mut engine);
        engine.click(0);
        engine.advance(1_000);

        assert_eq!(engine.status(), RoundStatus::Won);
        let results = &engine.sink().results;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].currency_awarded, 30);
        assert!(results[0].personal_best);
        assert!(results[0].won);
    }

    #[test]
    fn test_slower_than_best_is_not_personal_best() {
        let sink = Recorder {
            best: Some(5.0),
            ..Default::default()
        };
        let mut engine = RoundEngine::new(sink, 5);
        engine.start(Mode::Mirror, Difficulty::Amateur);
        engine.advance(6_000);
        clear_board(&mut engine);
        assert!(!engine.sink().results[0].personal_best);
    }

    #[test]
    fn test_loss_reported_once() {
        let mut engine = RoundEngine::new(Recorder::default(), 5);
        engine.start(Mode::Competitive, Difficulty::Principiante);
        engine.advance(25 * 800);
        engine.advance(5_000);
        assert_eq!(engine.status(), RoundStatus::Lost);
        assert_eq!(engine.sink().results.len(), 1);
        assert!(!engine.sink().results[0].won);
        assert!(!engine.sink().results[0].personal_best);
    }

    #[test]
    fn test_restart_discards_without_report() {
        let mut engine = RoundEngine::new(Recorder::default(), 5);
        engine.start(Mode::Contrarreloj, Difficulty::Top);
        engine.advance(7_900);
        engine.start(Mode::Contrarreloj, Difficulty::Top);
        engine.advance(7_900);
        assert_eq!(engine.status(), RoundStatus::Running);
        assert!(engine.sink().results.is_empty());

        engine.abandon();
        engine.advance(60_000);
        assert!(engine.sink().results.is_empty());
        assert_eq!(engine.status(), RoundStatus::Idle);
    }

    #[test]
    fn test_boards_differ_between_rounds() {
        let mut engine = RoundEngine::new(Recorder::default(), 5);
        let a = engine.start(Mode::Competitive, Difficulty::Top).board.clone();
        let opp = engine.round().unwrap().opponent.clone().unwrap().board;
        let b = engine.start(Mode::Competitive, Difficulty::Top).board.clone();
        assert_ne!(a, b);
        assert_ne!(a, opp);
    }

    #[test]
    fn test_snapshot_none_when_idle() {
        let mut engine = RoundEngine::new(Recorder::default(), 5);
        assert!(engine.snapshot().is_none());
        assert_eq!(engine.click(0), ClickOutcome::Ignored);
        engine.start(Mode::Extreme, Difficulty::Amateur);
        assert_eq!(engine.snapshot().unwrap().tiles.len(), BOARD_SIZE);
    }
}

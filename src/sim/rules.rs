//! Mode and difficulty tables
//!
//! The engine never branches on mode names; it reads the `ModeRules` record
//! for the round's mode and dispatches on its fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::consts::*;

/// Game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Board hidden for half a second, +3 s per mistake
    #[default]
    Normal,
    /// Race an AI that clears one tile per interval
    Competitive,
    /// Cleared tiles are recycled with ever-growing numbers; never ends
    Sumamos,
    /// Beat the difficulty's time limit
    Contrarreloj,
    /// Digits are drawn horizontally flipped
    Mirror,
    /// Pending tiles get covered with "?" over time
    Extreme,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Normal,
        Mode::Competitive,
        Mode::Sumamos,
        Mode::Contrarreloj,
        Mode::Mirror,
        Mode::Extreme,
    ];

    /// Storage/menu key
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Competitive => "competitive",
            Mode::Sumamos => "sumamos",
            Mode::Contrarreloj => "contrarreloj",
            Mode::Mirror => "mirror",
            Mode::Extreme => "extreme",
        }
    }

    /// Rule record for this mode
    pub fn rules(&self) -> ModeRules {
        let time_penalty = PenaltyPolicy::TimePenalty { ms: PENALTY_MS };
        let input_lock = PenaltyPolicy::InputLock { ms: PENALTY_MS };

        match self {
            Mode::Normal => ModeRules {
                timed: false,
                opponent: false,
                tiles: TileBehavior::Static,
                reveal_delay_ms: Some(REVEAL_DELAY_MS),
                penalty: time_penalty,
                completes_at_last_tile: true,
                mirrored: false,
            },
            Mode::Competitive => ModeRules {
                opponent: true,
                penalty: input_lock,
                ..ModeRules::plain(time_penalty)
            },
            Mode::Sumamos => ModeRules {
                tiles: TileBehavior::Replenish {
                    interval_ms: REPLENISH_INTERVAL_MS,
                    batch: REPLENISH_BATCH,
                },
                completes_at_last_tile: false,
                ..ModeRules::plain(input_lock)
            },
            Mode::Contrarreloj => ModeRules {
                timed: true,
                ..ModeRules::plain(time_penalty)
            },
            Mode::Mirror => ModeRules {
                mirrored: true,
                ..ModeRules::plain(time_penalty)
            },
            Mode::Extreme => ModeRules {
                tiles: TileBehavior::Obscure {
                    interval_ms: OBSCURE_INTERVAL_MS,
                },
                ..ModeRules::plain(input_lock)
            },
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Mode::Normal),
            "competitive" | "competitivo" => Ok(Mode::Competitive),
            "sumamos" => Ok(Mode::Sumamos),
            "contrarreloj" => Ok(Mode::Contrarreloj),
            "mirror" | "espejo" => Ok(Mode::Mirror),
            "extreme" | "extremo" => Ok(Mode::Extreme),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// AI / time-limit difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Principiante,
    #[default]
    Amateur,
    Profesional,
    Leyenda,
    Top,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Principiante,
        Difficulty::Amateur,
        Difficulty::Profesional,
        Difficulty::Leyenda,
        Difficulty::Top,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Principiante => "principiante",
            Difficulty::Amateur => "amateur",
            Difficulty::Profesional => "profesional",
            Difficulty::Leyenda => "leyenda",
            Difficulty::Top => "top",
        }
    }

    /// Contrarreloj limit in seconds
    pub fn time_limit_secs(&self) -> u64 {
        match self {
            Difficulty::Principiante => 20,
            Difficulty::Amateur => 18,
            Difficulty::Profesional => 15,
            Difficulty::Leyenda => 12,
            Difficulty::Top => 8,
        }
    }

    pub fn time_limit_ms(&self) -> u64 {
        self.time_limit_secs() * 1000
    }

    /// Milliseconds between opponent advances
    pub fn ai_interval_ms(&self) -> u64 {
        match self {
            Difficulty::Principiante => 800,
            Difficulty::Amateur => 700,
            Difficulty::Profesional => 600,
            Difficulty::Leyenda => 480,
            Difficulty::Top => 320,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "principiante" => Ok(Difficulty::Principiante),
            "amateur" => Ok(Difficulty::Amateur),
            "profesional" => Ok(Difficulty::Profesional),
            "leyenda" => Ok(Difficulty::Leyenda),
            "top" => Ok(Difficulty::Top),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// What happens to the board between clicks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileBehavior {
    Static,
    /// Overwrite up to `batch` consumed tiles with fresh values every interval
    Replenish { interval_ms: u64, batch: usize },
    /// Hide one pending tile every interval
    Obscure { interval_ms: u64 },
}

/// Consequence of clicking a pending tile out of order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenaltyPolicy {
    /// Add time to the clock
    TimePenalty { ms: u64 },
    /// Reject every click for a while
    InputLock { ms: u64 },
}

/// Per-mode parameters consulted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRules {
    /// Round is lost when the clock reaches the difficulty's time limit
    pub timed: bool,
    /// An AI opponent races the player
    pub opponent: bool,
    pub tiles: TileBehavior,
    /// Board starts concealed for this long
    pub reveal_delay_ms: Option<u64>,
    pub penalty: PenaltyPolicy,
    /// Clicking the last tile wins the round
    pub completes_at_last_tile: bool,
    /// Presentation hint only
    pub mirrored: bool,
}

impl ModeRules {
    fn plain(penalty: PenaltyPolicy) -> Self {
        Self {
            timed: false,
            opponent: false,
            tiles: TileBehavior::Static,
            reveal_delay_ms: None,
            penalty,
            completes_at_last_tile: true,
            mirrored: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_keys_roundtrip() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>(), Ok(mode));
        }
        assert_eq!("Espejo".parse::<Mode>(), Ok(Mode::Mirror));
        assert_eq!(
            "arcade".parse::<Mode>(),
            Err(ConfigError::UnknownMode("arcade".to_string()))
        );
    }

    #[test]
    fn test_difficulty_tables() {
        assert_eq!(Difficulty::Amateur.time_limit_secs(), 18);
        assert_eq!(Difficulty::Top.time_limit_secs(), 8);
        assert_eq!(Difficulty::Principiante.ai_interval_ms(), 800);
        assert_eq!(Difficulty::Leyenda.ai_interval_ms(), 480);
        assert!("imposible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_penalty_policies() {
        let locks = [Mode::Competitive, Mode::Extreme, Mode::Sumamos];
        for mode in Mode::ALL {
            let expected = if locks.contains(&mode) {
                PenaltyPolicy::InputLock { ms: PENALTY_MS }
            } else {
                PenaltyPolicy::TimePenalty { ms: PENALTY_MS }
            };
            assert_eq!(mode.rules().penalty, expected, "{mode}");
        }
    }

    #[test]
    fn test_only_normal_has_reveal_delay() {
        for mode in Mode::ALL {
            let rules = mode.rules();
            assert_eq!(rules.reveal_delay_ms.is_some(), mode == Mode::Normal);
        }
    }

    #[test]
    fn test_sumamos_never_completes() {
        assert!(!Mode::Sumamos.rules().completes_at_last_tile);
        assert!(Mode::Extreme.rules().completes_at_last_tile);
        assert!(Mode::Contrarreloj.rules().timed);
        assert!(Mode::Competitive.rules().opponent);
    }
}

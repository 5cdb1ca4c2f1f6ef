//! Local leaderboard of fastest completions
//!
//! Persisted inside the profile, keeps the 10 fastest winning rounds across all
//! modes (lower time ranks higher).

use serde::{Deserialize, Serialize};

use crate::sim::Mode;

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// A single completed round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub mode: Mode,
    /// Completion time in seconds
    pub time: f64,
    /// Coins earned by the run
    pub coins: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a completion time makes the board
    pub fn qualifies(&self, time: f64) -> bool {
        if !time.is_finite() || time < 0.0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| time < e.time).unwrap_or(true)
    }

    /// Rank a time would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, time: f64) -> Option<usize> {
        if !self.qualifies(time) {
            return None;
        }
        let rank = self.entries.iter().position(|e| time < e.time);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a run if it qualifies; returns the rank achieved
    pub fn add_run(&mut self, mode: Mode, time: f64, coins: u32, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(time)?;

        // Sorted ascending by time; ties keep the older run first
        self.entries.insert(
            rank - 1,
            LeaderboardEntry {
                mode,
                time,
                coins,
                timestamp,
            },
        );
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fastest time on the board
    pub fn top_time(&self) -> Option<f64> {
        self.entries.first().map(|e| e.time)
    }

    /// Entries for one mode, fastest first
    pub fn for_mode(&self, mode: Mode) -> impl Iterator<Item = &LeaderboardEntry> {
        self.entries.iter().filter(move |e| e.mode == mode)
    }

    /// Entries ordered by coins earned, richest first
    pub fn by_coins(&self) -> Vec<&LeaderboardEntry> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| b.coins.cmp(&a.coins));
        entries
    }

    /// Both ranking tabs, optionally narrowed to one mode
    pub fn ranking(&self, mode: Option<Mode>) -> Ranking<'_> {
        let times = match mode {
            Some(mode) => self.for_mode(mode).collect(),
            None => self.entries.iter().collect(),
        };
        let mut coins = self.by_coins();
        coins.retain(|e| mode.is_none_or(|m| e.mode == m));
        Ranking { times, coins }
    }
}

/// Ranking screen data: fastest runs and best-paid runs
#[derive(Debug, Serialize)]
pub struct Ranking<'a> {
    pub times: Vec<&'a LeaderboardEntry>,
    pub coins: Vec<&'a LeaderboardEntry>,
}

//! Configuration errors
//!
//! Everything the round engine itself rejects (wrong tile, locked input, finished
//! round) is gameplay, not an error. Only unknown keys coming from the menu or a
//! stale settings snapshot end up here, plus store purchases the balance
//! can't cover.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown game mode: {0:?}")]
    UnknownMode(String),

    #[error("unknown difficulty: {0:?}")]
    UnknownDifficulty(String),

    #[error("unknown grid skin: {0:?}")]
    UnknownSkin(String),

    #[error("grid skin not unlocked: {0:?}")]
    LockedSkin(String),
}

/// Store purchases the profile refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no such store item: {0:?}")]
    UnknownItem(String),

    #[error("{item:?} costs {price} coins, balance is {coins}")]
    NotEnoughCoins { item: String, price: u32, coins: u64 },
}

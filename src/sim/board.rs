//! Tile board and its generator

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::BOARD_SIZE;

/// 25 tile values in fixed positions (row-major 5x5)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    tiles: [u32; BOARD_SIZE],
}

impl Board {
    /// Fresh unbiased shuffle of 1..=25 (Fisher-Yates)
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut tiles = [0u32; BOARD_SIZE];
        for (i, tile) in tiles.iter_mut().enumerate() {
            *tile = i as u32 + 1;
        }
        tiles.shuffle(rng);
        Self { tiles }
    }

    /// Build a board from explicit values (tests, replays)
    pub fn from_tiles(tiles: [u32; BOARD_SIZE]) -> Self {
        Self { tiles }
    }

    /// Value at a position, if the position exists
    #[inline]
    pub fn get(&self, position: usize) -> Option<u32> {
        self.tiles.get(position).copied()
    }

    #[inline]
    pub fn tiles(&self) -> &[u32; BOARD_SIZE] {
        &self.tiles
    }

    /// Position holding a value
    pub fn position_of(&self, value: u32) -> Option<usize> {
        self.tiles.iter().position(|&v| v == value)
    }

    /// Positions whose value has already been passed
    pub fn consumed_positions(&self, next_expected: u32) -> impl Iterator<Item = usize> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(move |&(_, &v)| v < next_expected)
            .map(|(i, _)| i)
    }

    /// Positions still to be clicked
    pub fn pending_positions(&self, next_expected: u32) -> impl Iterator<Item = usize> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(move |&(_, &v)| v >= next_expected)
            .map(|(i, _)| i)
    }

    /// Overwrite a tile (Sumamos recycling)
    pub(crate) fn set(&mut self, position: usize, value: u32) {
        self.tiles[position] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_generate_is_permutation() {
        let mut rng = Pcg32::seed_from_u64(7);
        let board = Board::generate(&mut rng);
        let mut values = board.tiles().to_vec();
        values.sort_unstable();
        assert_eq!(values, (1..=25).collect::<Vec<u32>>());
    }

    #[test]
    fn test_generate_deterministic_per_seed() {
        let a = Board::generate(&mut Pcg32::seed_from_u64(42));
        let b = Board::generate(&mut Pcg32::seed_from_u64(42));
        let c = Board::generate(&mut Pcg32::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_consumed_and_pending_split() {
        let mut tiles = [0u32; BOARD_SIZE];
        for (i, t) in tiles.iter_mut().enumerate() {
            *t = i as u32 + 1;
        }
        let board = Board::from_tiles(tiles);
        assert_eq!(board.consumed_positions(4).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(board.pending_positions(24).collect::<Vec<_>>(), vec![23, 24]);
        assert_eq!(board.position_of(25), Some(24));
        assert_eq!(board.get(25), None);
    }

    proptest::proptest! {
        #[test]
        fn prop_any_seed_yields_permutation(seed in proptest::prelude::any::<u64>()) {
            let board = Board::generate(&mut Pcg32::seed_from_u64(seed));
            let mut seen = [false; BOARD_SIZE];
            for &v in board.tiles() {
                proptest::prop_assert!((1..=25).contains(&v));
                proptest::prop_assert!(!seen[(v - 1) as usize]);
                seen[(v - 1) as usize] = true;
            }
        }
    }
}

use crate::logic::board::{Cell, Color, Piece, Rank, NUM_CELLS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;

// Empty, white single, white double, black single, black double.
const NUM_OCCUPANTS: usize = 5;
const ZOBRIST_SEED: u64 = 42;

/// Random ids for every (cell, occupant) pair, including the empty occupant.
///
/// Keys come from a fixed-seed generator and are built once per process on
/// first use, so hashes are reproducible within a run.
pub struct ZobristKeys {
    keys: [[u64; NUM_OCCUPANTS]; NUM_CELLS],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut keys = [[0; NUM_OCCUPANTS]; NUM_CELLS];
        for cell_keys in &mut keys {
            for key in cell_keys.iter_mut() {
                *key = rng.gen();
            }
        }
        Self { keys }
    }

    pub fn get() -> &'static Self {
        static INSTANCE: OnceLock<ZobristKeys> = OnceLock::new();
        INSTANCE.get_or_init(ZobristKeys::new)
    }

    const fn occupant_index(piece: Option<Piece>) -> usize {
        match piece {
            None => 0,
            Some(Piece { color, rank }) => {
                let rank_idx = match rank {
                    Rank::Single => 0,
                    Rank::Double => 1,
                };
                let color_idx = match color {
                    Color::White => 0,
                    Color::Black => 1,
                };
                1 + color_idx * 2 + rank_idx
            }
        }
    }

    pub fn key(&self, cell: Cell, piece: Option<Piece>) -> u64 {
        self.keys
            .get(cell.index())
            .and_then(|k| k.get(Self::occupant_index(piece)))
            .copied()
            .unwrap_or(0)
    }

    /// Hash delta for one cell changing occupant.
    pub fn toggle(&self, cell: Cell, old: Option<Piece>, new: Option<Piece>) -> u64 {
        self.key(cell, old) ^ self.key(cell, new)
    }
}

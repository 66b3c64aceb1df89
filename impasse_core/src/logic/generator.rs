use crate::engine::{Move, MoveTag};
use crate::logic::board::{move_directions, BoardState, Cell, Color, Piece};
use crate::logic::lookup::DiagonalTables;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Legal moves grouped by origin, then by target (`None` for a bear-off).
///
/// Iteration is ordered by cell, so everything built on top of it (move
/// ordering, search traces) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Move>", into = "Vec<Move>")]
pub struct LegalMoves {
    by_origin: BTreeMap<Cell, BTreeMap<Option<Cell>, MoveTag>>,
}

impl LegalMoves {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mv: Move) {
        self.by_origin
            .entry(mv.origin)
            .or_default()
            .insert(mv.target, mv.tag);
    }

    pub fn is_empty(&self) -> bool {
        self.by_origin.is_empty()
    }

    /// Total number of moves.
    pub fn len(&self) -> usize {
        self.by_origin.values().map(BTreeMap::len).sum()
    }

    pub fn origin_count(&self) -> usize {
        self.by_origin.len()
    }

    pub fn origins(&self) -> impl Iterator<Item = Cell> + '_ {
        self.by_origin.keys().copied()
    }

    pub fn targets(&self, origin: Cell) -> Option<&BTreeMap<Option<Cell>, MoveTag>> {
        self.by_origin.get(&origin)
    }

    pub fn tag(&self, origin: Cell, target: Option<Cell>) -> Option<MoveTag> {
        self.targets(origin).and_then(|t| t.get(&target)).copied()
    }

    pub fn contains(&self, mv: &Move) -> bool {
        self.tag(mv.origin, mv.target) == Some(mv.tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.by_origin.iter().flat_map(|(&origin, targets)| {
            targets
                .iter()
                .map(move |(&target, &tag)| Move::new(origin, target, tag))
        })
    }

    /// The move, if there is exactly one origin with exactly one target.
    pub fn only_move(&self) -> Option<Move> {
        if self.by_origin.len() != 1 {
            return None;
        }
        let (&origin, targets) = self.by_origin.iter().next()?;
        if targets.len() != 1 {
            return None;
        }
        let (&target, &tag) = targets.iter().next()?;
        Some(Move::new(origin, target, tag))
    }
}

impl From<Vec<Move>> for LegalMoves {
    fn from(moves: Vec<Move>) -> Self {
        let mut legal = Self::new();
        for mv in moves {
            legal.insert(mv);
        }
        legal
    }
}

impl From<LegalMoves> for Vec<Move> {
    fn from(legal: LegalMoves) -> Self {
        legal.iter().collect()
    }
}

/// Rules of movement for the side to move.
pub struct MoveGenerator;

impl Default for MoveGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveGenerator {
    pub const fn new() -> Self {
        Self
    }

    /// Crownings take precedence over everything else.
    pub fn generate_moves(&self, state: &BoardState, turn: Color) -> LegalMoves {
        let crownings = self.crownings(state, turn);
        if crownings.is_empty() {
            self.other_moves(state, turn)
        } else {
            crownings
        }
    }

    /// For every ripe Single (own Single on the far row), each other own
    /// Single may be spent to crown it.
    pub fn crownings(&self, state: &BoardState, turn: Color) -> LegalMoves {
        let mut moves = LegalMoves::new();
        let ripe = state
            .pieces_of(turn)
            .filter(|(cell, piece)| piece.is_single() && cell.is_crown_row_of(turn))
            .map(|(cell, _)| cell);

        for target in ripe {
            for (origin, piece) in state.pieces_of(turn) {
                if origin != target && piece.is_single() {
                    moves.insert(Move::new(origin, Some(target), MoveTag::Crown));
                }
            }
        }
        moves
    }

    /// Slides and transposes, or forced bear-offs when there are none.
    pub fn other_moves(&self, state: &BoardState, turn: Color) -> LegalMoves {
        let mut moves = LegalMoves::new();
        for (origin, piece) in state.pieces_of(turn) {
            if !piece.is_single() {
                self.transposes(state, origin, piece, &mut moves);
            }
            self.slides(state, origin, piece, &mut moves);
        }

        if moves.is_empty() {
            // Impasse: every checker is offered for bear-off.
            for (origin, _) in state.pieces_of(turn) {
                moves.insert(Move::new(origin, None, MoveTag::BearOff));
            }
        }
        moves
    }

    fn slides(&self, state: &BoardState, origin: Cell, piece: Piece, moves: &mut LegalMoves) {
        let tables = DiagonalTables::get();
        let color = piece.color;
        for dir in move_directions(piece) {
            for &target in tables.ray(origin, dir) {
                if !state.is_empty_at(target) {
                    break;
                }
                let tag = if target.is_home_row_of(color) {
                    MoveTag::SlideToBearOffRow
                } else if target.is_crown_row_of(color) && piece.is_single() {
                    MoveTag::SlideToCrownSetup
                } else {
                    MoveTag::Slide
                };
                moves.insert(Move::new(origin, Some(target), tag));
            }
        }
    }

    fn transposes(&self, state: &BoardState, origin: Cell, piece: Piece, moves: &mut LegalMoves) {
        let color = piece.color;
        for dir in move_directions(piece) {
            let Some(target) = origin.step(dir) else {
                continue;
            };
            if !state.is_single_of(target, color) {
                continue;
            }
            let tag = if target.is_home_row_of(color) {
                MoveTag::TransposeToBearOff
            } else if origin.is_crown_row_of(color) {
                MoveTag::TransposeCrownSetup
            } else {
                MoveTag::Transpose
            };
            moves.insert(Move::new(origin, Some(target), tag));
        }
    }
}

use crate::engine::config::EngineConfig;
use crate::engine::eval::evaluate_with;
use crate::engine::zobrist::ZobristKeys;
use crate::engine::{Move, MoveTag};
use crate::logic::board::{BoardState, Cell, Color, Piece, Rank};
use crate::logic::generator::{LegalMoves, MoveGenerator};
use crate::logic::rules::{self, MoveError};
use serde::{Deserialize, Serialize};

// A move rewrites its origin and at most one target.
const MAX_CHANGES: usize = 2;

/// New occupant of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub cell: Cell,
    pub piece: Option<Piece>,
}

/// Cells a move rewrites, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateDelta {
    changes: [Option<CellChange>; MAX_CHANGES],
    count: usize,
}

impl StateDelta {
    pub const fn new() -> Self {
        Self {
            changes: [None; MAX_CHANGES],
            count: 0,
        }
    }

    pub fn push(&mut self, cell: Cell, piece: Option<Piece>) {
        if let Some(slot) = self.changes.get_mut(self.count) {
            *slot = Some(CellChange { cell, piece });
            self.count += 1;
        } else {
            debug_assert!(false, "StateDelta overflow! Max changes: {MAX_CHANGES}");
        }
    }

    pub const fn len(&self) -> usize {
        self.count
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = CellChange> + '_ {
        self.changes.iter().take(self.count).flatten().copied()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.iter().map(|change| change.cell)
    }
}

/// Checker totals per side, a Double counting as two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerCounts {
    pub white: u8,
    pub black: u8,
}

impl CheckerCounts {
    pub fn from_state(state: &BoardState) -> Self {
        Self {
            white: state.checker_count(Color::White),
            black: state.checker_count(Color::Black),
        }
    }

    pub const fn get(self, color: Color) -> u8 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    fn decrement(&mut self, color: Color) {
        let count = match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };
        *count = count.saturating_sub(1);
    }
}

/// Everything a position needs to be rebuilt, minus the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub state: BoardState,
    pub turn: Color,
    pub legal_moves: LegalMoves,
    pub checkers: CheckerCounts,
    pub winner: Option<Color>,
}

/// Board, side to move, and the cached facts derived from them.
///
/// `legal_moves` always holds exactly the moves the side to move may make,
/// and `hash` always equals `state.compute_hash()`. Both are kept current
/// by [`Position::advance`] without a full recomputation of the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PositionSnapshot", into = "PositionSnapshot")]
pub struct Position {
    state: BoardState,
    turn: Color,
    legal_moves: LegalMoves,
    checkers: CheckerCounts,
    winner: Option<Color>,
    hash: u64,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// Standard starting position, White to move.
    pub fn new() -> Self {
        Self::from_state(BoardState::initial(), Color::White)
    }

    /// Builds a position from optional overrides of the standard start.
    pub fn with_start(state: Option<BoardState>, turn: Option<Color>) -> Self {
        Self::from_state(state.unwrap_or_default(), turn.unwrap_or(Color::White))
    }

    pub fn from_state(state: BoardState, turn: Color) -> Self {
        let checkers = CheckerCounts::from_state(&state);
        let winner = [Color::White, Color::Black]
            .into_iter()
            .find(|&color| checkers.get(color) == 0);
        let legal_moves = if winner.is_some() {
            LegalMoves::new()
        } else {
            MoveGenerator::new().generate_moves(&state, turn)
        };
        let hash = state.compute_hash();
        Self {
            state,
            turn,
            legal_moves,
            checkers,
            winner,
            hash,
        }
    }

    pub fn from_snapshot(snapshot: PositionSnapshot) -> Self {
        let hash = snapshot.state.compute_hash();
        Self {
            state: snapshot.state,
            turn: snapshot.turn,
            legal_moves: snapshot.legal_moves,
            checkers: snapshot.checkers,
            winner: snapshot.winner,
            hash,
        }
    }

    pub fn snapshot(&self) -> PositionSnapshot {
        PositionSnapshot {
            state: self.state.clone(),
            turn: self.turn,
            legal_moves: self.legal_moves.clone(),
            checkers: self.checkers,
            winner: self.winner,
        }
    }

    pub const fn state(&self) -> &BoardState {
        &self.state
    }

    pub const fn turn(&self) -> Color {
        self.turn
    }

    pub const fn legal_moves(&self) -> &LegalMoves {
        &self.legal_moves
    }

    pub const fn checkers(&self) -> CheckerCounts {
        self.checkers
    }

    pub const fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub const fn hash(&self) -> u64 {
        self.hash
    }

    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    /// Looks up the legal move between two cells, if there is one.
    pub fn find_move(&self, origin: Cell, target: Option<Cell>) -> Option<Move> {
        self.legal_moves
            .tag(origin, target)
            .map(|tag| Move::new(origin, target, tag))
    }

    /// Cell rewrites for `mv`. The move must be legal here.
    pub fn apply_move(&self, mv: &Move) -> StateDelta {
        let mover = self.turn;
        let rank = self.state.get(mv.origin).map_or(Rank::Single, |p| p.rank);
        let single = Some(Piece::single(mover));
        let double = Some(Piece::double(mover));

        let (origin_after, target_after) = match mv.tag {
            MoveTag::Slide | MoveTag::SlideToCrownSetup => (None, Some(Piece::new(mover, rank))),
            MoveTag::SlideToBearOffRow => (None, single),
            MoveTag::Transpose | MoveTag::TransposeCrownSetup => (single, double),
            MoveTag::TransposeToBearOff => (single, single),
            MoveTag::Crown => (None, double),
            MoveTag::BearOff => match rank {
                Rank::Single => (None, None),
                Rank::Double => (single, None),
            },
        };

        let mut delta = StateDelta::new();
        delta.push(mv.origin, origin_after);
        if let (Some(target), Some(piece)) = (mv.target, target_after) {
            delta.push(target, Some(piece));
        }
        delta
    }

    /// Occupants the delta is about to overwrite, for highlighting and undo.
    pub fn previous_cells(&self, delta: &StateDelta) -> Vec<CellChange> {
        delta
            .iter()
            .map(|change| CellChange {
                cell: change.cell,
                piece: self.state.get(change.cell),
            })
            .collect()
    }

    /// Writes `delta` into the board and settles counts, winner and turn.
    pub fn advance(&mut self, delta: &StateDelta, tag: MoveTag) {
        let keys = ZobristKeys::get();
        for change in delta.iter() {
            let old = self.state.get(change.cell);
            self.hash ^= keys.toggle(change.cell, old, change.piece);
            self.state.set(change.cell, change.piece);
        }

        match tag {
            MoveTag::BearOff => {
                self.checkers.decrement(self.turn);
                if self.checkers.get(self.turn) == 0 {
                    self.winner = Some(self.turn);
                    self.legal_moves = LegalMoves::new();
                } else {
                    self.check_for_crownings_or_change_turn();
                }
            }
            MoveTag::SlideToBearOffRow => {
                self.checkers.decrement(self.turn);
                self.check_for_crownings_or_change_turn();
            }
            MoveTag::TransposeToBearOff => {
                self.checkers.decrement(self.turn);
                self.change_turn();
            }
            MoveTag::SlideToCrownSetup | MoveTag::TransposeCrownSetup => {
                self.check_for_crownings_or_change_turn();
            }
            MoveTag::Slide | MoveTag::Transpose | MoveTag::Crown => self.change_turn(),
        }
    }

    /// Successor position after a legal move.
    pub fn derive(&self, mv: &Move) -> Self {
        let delta = self.apply_move(mv);
        let mut next = Self {
            state: self.state.clone(),
            turn: self.turn,
            legal_moves: LegalMoves::new(),
            checkers: self.checkers,
            winner: self.winner,
            hash: self.hash,
        };
        next.advance(&delta, mv.tag);
        next
    }

    /// Validated [`Position::derive`].
    pub fn play(&self, mv: &Move) -> Result<Self, MoveError> {
        rules::validate_move(self, mv)?;
        Ok(self.derive(mv))
    }

    /// Static value from White's point of view with the default weights.
    pub fn evaluate(&self) -> i32 {
        evaluate_with(self, &EngineConfig::default())
    }

    fn check_for_crownings_or_change_turn(&mut self) {
        let crownings = MoveGenerator::new().crownings(&self.state, self.turn);
        if crownings.is_empty() {
            self.change_turn();
        } else {
            self.legal_moves = crownings;
        }
    }

    // Crownings for the incoming side are not looked for here. A far-row
    // Single left by the opponent waits for that side's next slide.
    fn change_turn(&mut self) {
        self.turn = self.turn.opposite();
        self.legal_moves = MoveGenerator::new().other_moves(&self.state, self.turn);
    }
}

impl From<PositionSnapshot> for Position {
    fn from(snapshot: PositionSnapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}

impl From<Position> for PositionSnapshot {
    fn from(position: Position) -> Self {
        Self {
            state: position.state,
            turn: position.turn,
            legal_moves: position.legal_moves,
            checkers: position.checkers,
            winner: position.winner,
        }
    }
}

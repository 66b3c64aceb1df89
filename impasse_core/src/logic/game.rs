use crate::engine::{Move, MoveTag};
use crate::logic::board::{Cell, Color};
use crate::logic::position::{CellChange, Position};
use crate::logic::rules::{self, MoveError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    BoreOff(Color), // Winner
    OutOfTime(Color), // Winner
}

impl GameStatus {
    pub const fn winner(self) -> Option<Color> {
        match self {
            Self::Playing => None,
            Self::BoreOff(color) | Self::OutOfTime(color) => Some(color),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub mv: Move,
    pub color: Color,
    pub previous: Vec<CellChange>, // Occupants before the move
    pub note: Option<String>, // For AI stats or other info
    pub hash: u64,
}

/// Cells to highlight for the move just played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    pub cells: Vec<Cell>,
    pub color: Color,
    pub tag: MoveTag,
}

/// Seconds left per side; `None` is an untimed side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clocks {
    pub white: Option<u32>,
    pub black: Option<u32>,
}

impl Clocks {
    pub const fn both(seconds: u32) -> Self {
        Self {
            white: Some(seconds),
            black: Some(seconds),
        }
    }

    pub const fn get(self, color: Color) -> Option<u32> {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    fn get_mut(&mut self, color: Color) -> &mut Option<u32> {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct UndoPoint {
    position: Position,
    status: GameStatus,
    last_move: Option<LastMove>,
    clocks: Clocks,
    history_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub position: Position,
    pub status: GameStatus,
    pub last_move: Option<LastMove>,
    pub history: Vec<MoveRecord>,
    pub clocks: Clocks,
    undo_point: Option<Box<UndoPoint>>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self::from_position(Position::new(), Clocks::default())
    }

    pub fn from_position(position: Position, clocks: Clocks) -> Self {
        let status = position
            .winner()
            .map_or(GameStatus::Playing, GameStatus::BoreOff);
        Self {
            position,
            status,
            last_move: None,
            history: Vec::new(),
            clocks,
            undo_point: None,
        }
    }

    pub const fn turn(&self) -> Color {
        self.position.turn()
    }

    pub const fn can_undo(&self) -> bool {
        self.undo_point.is_some()
    }

    pub fn make_move(&mut self, mv: Move) -> Result<(), MoveError> {
        self.check_playable(&mv)?;
        self.undo_point = Some(Box::new(UndoPoint {
            position: self.position.clone(),
            status: self.status,
            last_move: self.last_move.clone(),
            clocks: self.clocks,
            history_len: self.history.len(),
        }));
        self.apply(mv, None);
        Ok(())
    }

    // The undo point still refers to the last human move, so one undo
    // takes back both.
    pub fn make_engine_move(
        &mut self,
        mv: Move,
        note: Option<String>,
    ) -> Result<(), MoveError> {
        self.check_playable(&mv)?;
        self.apply(mv, note);
        Ok(())
    }

    pub fn undo_move(&mut self) -> Result<(), MoveError> {
        let point = self.undo_point.take().ok_or(MoveError::NothingToUndo)?;
        let UndoPoint {
            position,
            status,
            last_move,
            clocks,
            history_len,
        } = *point;
        self.position = position;
        self.status = status;
        self.last_move = last_move;
        self.clocks = clocks;
        self.history.truncate(history_len);
        Ok(())
    }

    pub fn tick_clock(&mut self) -> GameStatus {
        if self.status != GameStatus::Playing {
            return self.status;
        }
        let turn = self.turn();
        if let Some(remaining) = self.clocks.get_mut(turn) {
            if *remaining == 0 {
                return self.status;
            }
            *remaining -= 1;
            if *remaining == 0 {
                self.status = GameStatus::OutOfTime(turn.opposite());
            }
        }
        self.status
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn check_playable(&self, mv: &Move) -> Result<(), MoveError> {
        if self.status != GameStatus::Playing {
            return Err(MoveError::GameOver);
        }
        rules::validate_move(&self.position, mv)
    }

    fn apply(&mut self, mv: Move, note: Option<String>) {
        let color = self.position.turn();
        let delta = self.position.apply_move(&mv);
        let previous = self.position.previous_cells(&delta);
        self.position.advance(&delta, mv.tag);

        self.last_move = Some(LastMove {
            cells: delta.cells().collect(),
            color,
            tag: mv.tag,
        });
        if let Some(winner) = self.position.winner() {
            self.status = GameStatus::BoreOff(winner);
        }
        self.history.push(MoveRecord {
            mv,
            color,
            previous,
            note,
            hash: self.position.hash(),
        });
    }
}

use crate::logic::board::Cell;
use crate::logic::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod eval;
pub mod ordering;
pub mod search;
pub mod tt;
pub mod zobrist;

#[cfg(test)]
mod search_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveTag {
    Slide,
    SlideToBearOffRow,
    SlideToCrownSetup,
    Transpose,
    TransposeToBearOff,
    TransposeCrownSetup,
    Crown,
    BearOff,
}

impl MoveTag {
    /// Moves that take a checker off the board.
    pub const fn is_bear_off(self) -> bool {
        matches!(
            self,
            Self::BearOff | Self::SlideToBearOffRow | Self::TransposeToBearOff
        )
    }

    /// Moves that leave a Single on the far row.
    pub const fn is_crown_setup(self) -> bool {
        matches!(self, Self::SlideToCrownSetup | Self::TransposeCrownSetup)
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Slide => "S",
            Self::SlideToBearOffRow => "SB",
            Self::SlideToCrownSetup => "SC",
            Self::Transpose => "T",
            Self::TransposeToBearOff => "TB",
            Self::TransposeCrownSetup => "TC",
            Self::Crown => "C",
            Self::BearOff => "B",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub origin: Cell,
    /// `None` only for a bear-off.
    pub target: Option<Cell>,
    pub tag: MoveTag,
}

impl Move {
    pub const fn new(origin: Cell, target: Option<Cell>, tag: MoveTag) -> Self {
        Self {
            origin,
            target,
            tag,
        }
    }

    /// Columns travelled, used to rank plain slides.
    pub fn column_distance(self) -> u8 {
        self.target
            .map_or(0, |t| t.col().abs_diff(self.origin.col()))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Some(target) => write!(f, "{}-{} ({})", self.origin, target, self.tag.code()),
            None => write!(f, "{} ({})", self.origin, self.tag.code()),
        }
    }
}

/// Wall-clock allowance for one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBudget {
    /// Budget honoured once `min_depth` has been searched.
    pub soft_ms: u64,
    /// Absolute cap, honoured at any depth.
    pub hard_ms: u64,
    pub min_depth: u8,
}

impl Default for TimeBudget {
    fn default() -> Self {
        Self {
            soft_ms: 6000,
            hard_ms: 10000,
            min_depth: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum SearchLimit {
    Depth(u8),
    Time(TimeBudget),
}

/// Depth a suggestion was found at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchDepth {
    /// Only one legal move, nothing was searched.
    Trivial,
    Searched(u8),
    /// Depth 1 ran out of time; the move is the first one in ordering.
    Unfinished,
}

impl fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trivial => f.write_str("0 (one legal move)"),
            Self::Searched(d) => write!(f, "{d}"),
            Self::Unfinished => f.write_str("none (out of time before depth 1)"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u32,
    pub time_ms: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Suggestion {
    pub mv: Move,
    pub depth: SearchDepth,
    pub value: i32,
    pub stats: SearchStats,
}

pub trait Evaluator {
    fn evaluate(&self, position: &Position) -> i32;
}

pub trait Searcher {
    fn search(&mut self, position: &Position, limit: SearchLimit) -> Option<(Move, SearchStats)>;
}

use crate::engine::zobrist::ZobristKeys;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const BOARD_SIZE: u8 = 8;
/// Dark squares only.
pub const NUM_CELLS: usize = 32;
/// Longest diagonal walk from any cell.
pub const MAX_DIAGONAL: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    /// Row a color starts from and bears off on.
    pub const fn home_row(self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => BOARD_SIZE - 1,
        }
    }

    /// The opponent's home row, where a Single becomes ripe for crowning.
    pub const fn crown_row(self) -> u8 {
        self.opposite().home_row()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Single,
    Double,
}

impl Rank {
    pub const fn weight(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub rank: Rank,
}

impl Piece {
    pub const fn new(color: Color, rank: Rank) -> Self {
        Self { color, rank }
    }

    pub const fn single(color: Color) -> Self {
        Self::new(color, Rank::Single)
    }

    pub const fn double(color: Color) -> Self {
        Self::new(color, Rank::Double)
    }

    pub const fn is_single(self) -> bool {
        matches!(self.rank, Rank::Single)
    }

    pub const fn to_char(self) -> char {
        match (self.color, self.rank) {
            (Color::White, Rank::Single) => 'w',
            (Color::White, Rank::Double) => 'W',
            (Color::Black, Rank::Single) => 'b',
            (Color::Black, Rank::Double) => 'B',
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'w' => Some(Self::single(Color::White)),
            'W' => Some(Self::double(Color::White)),
            'b' => Some(Self::single(Color::Black)),
            'B' => Some(Self::double(Color::Black)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction {
    pub dc: i8,
    pub dr: i8,
}

impl Direction {
    pub const UP_RIGHT: Self = Self { dc: 1, dr: 1 };
    pub const UP_LEFT: Self = Self { dc: -1, dr: 1 };
    pub const DOWN_RIGHT: Self = Self { dc: 1, dr: -1 };
    pub const DOWN_LEFT: Self = Self { dc: -1, dr: -1 };

    pub const ALL: [Self; 4] = [Self::UP_RIGHT, Self::UP_LEFT, Self::DOWN_RIGHT, Self::DOWN_LEFT];

    pub const fn index(self) -> usize {
        match (self.dc, self.dr) {
            (1, 1) => 0,
            (-1, 1) => 1,
            (1, _) => 2,
            _ => 3,
        }
    }
}

/// Directions a piece moves in. Singles head for the far row, Doubles head home.
pub const fn move_directions(piece: Piece) -> [Direction; 2] {
    match (piece.color, piece.rank) {
        (Color::White, Rank::Single) | (Color::Black, Rank::Double) => {
            [Direction::UP_RIGHT, Direction::UP_LEFT]
        }
        (Color::White, Rank::Double) | (Color::Black, Rank::Single) => {
            [Direction::DOWN_RIGHT, Direction::DOWN_LEFT]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidCell(String),
    RowCount(usize),
    RowLength { row: usize, len: usize },
    UnknownPiece(char),
    LightSquare { col: u8, row: u8 },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCell(s) => write!(f, "invalid cell `{s}`"),
            Self::RowCount(n) => write!(f, "expected 8 rows, found {n}"),
            Self::RowLength { row, len } => {
                write!(f, "row {} has {len} squares, expected 8", row + 1)
            }
            Self::UnknownPiece(c) => write!(f, "unknown piece `{c}`"),
            Self::LightSquare { col, row } => {
                write!(f, "piece on light square ({col}, {row})")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// One of the 32 dark squares. `(col + row)` is always even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cell {
    col: u8,
    row: u8,
}

impl Cell {
    pub const fn new(col: u8, row: u8) -> Option<Self> {
        if col < BOARD_SIZE && row < BOARD_SIZE && (col + row) % 2 == 0 {
            Some(Self { col, row })
        } else {
            None
        }
    }

    pub const fn col(self) -> u8 {
        self.col
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn index(self) -> usize {
        self.row as usize * 4 + self.col as usize / 2
    }

    pub const fn from_index(idx: usize) -> Option<Self> {
        if idx >= NUM_CELLS {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let row = (idx / 4) as u8;
        #[allow(clippy::cast_possible_truncation)]
        let col = (idx % 4) as u8 * 2 + row % 2;
        Some(Self { col, row })
    }

    /// All dark squares, column by column.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..BOARD_SIZE).flat_map(|col| (0..BOARD_SIZE).filter_map(move |row| Self::new(col, row)))
    }

    #[must_use]
    pub fn step(self, dir: Direction) -> Option<Self> {
        let col = self.col.checked_add_signed(dir.dc)?;
        let row = self.row.checked_add_signed(dir.dr)?;
        Self::new(col, row)
    }

    pub const fn is_home_row_of(self, color: Color) -> bool {
        self.row == color.home_row()
    }

    pub const fn is_crown_row_of(self, color: Color) -> bool {
        self.row == color.crown_row()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", char::from(b'A' + self.col), self.row + 1)
    }
}

impl FromStr for Cell {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::InvalidCell(s.to_string());
        let mut chars = s.trim().chars();
        let file = chars.next().ok_or_else(err)?.to_ascii_uppercase();
        let rank = chars.next().and_then(|c| c.to_digit(10)).ok_or_else(err)?;
        if chars.next().is_some() || !('A'..='H').contains(&file) || !(1..=8).contains(&rank) {
            return Err(err());
        }
        let col = u8::try_from(u32::from(file) - u32::from('A')).map_err(|_| err())?;
        let row = u8::try_from(rank - 1).map_err(|_| err())?;
        Self::new(col, row).ok_or_else(err)
    }
}

impl TryFrom<String> for Cell {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        cell.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    cells: [Option<Piece>; NUM_CELLS],
}

impl Default for BoardState {
    fn default() -> Self {
        Self::initial()
    }
}

impl BoardState {
    pub const fn empty() -> Self {
        Self {
            cells: [None; NUM_CELLS],
        }
    }

    /// Standard start: each side has two Singles on its own home row, two next
    /// to it, and four Doubles deep in the opponent's half.
    #[must_use]
    pub fn initial() -> Self {
        let mut state = Self::empty();
        let layout: [((u8, u8), Piece); 16] = [
            ((0, 0), Piece::single(Color::White)),
            ((3, 1), Piece::single(Color::White)),
            ((4, 0), Piece::single(Color::White)),
            ((7, 1), Piece::single(Color::White)),
            ((1, 7), Piece::double(Color::White)),
            ((2, 6), Piece::double(Color::White)),
            ((5, 7), Piece::double(Color::White)),
            ((6, 6), Piece::double(Color::White)),
            ((0, 6), Piece::single(Color::Black)),
            ((3, 7), Piece::single(Color::Black)),
            ((4, 6), Piece::single(Color::Black)),
            ((7, 7), Piece::single(Color::Black)),
            ((1, 1), Piece::double(Color::Black)),
            ((2, 0), Piece::double(Color::Black)),
            ((5, 1), Piece::double(Color::Black)),
            ((6, 0), Piece::double(Color::Black)),
        ];
        for ((col, row), piece) in layout {
            if let Some(cell) = Cell::new(col, row) {
                state.set(cell, Some(piece));
            }
        }
        state
    }

    /// Parses a diagram of eight rows, row 8 first. `w`/`b` are Singles,
    /// `W`/`B` Doubles, and `.` or `-` an empty square.
    pub fn from_diagram(diagram: &str) -> Result<Self, ParseError> {
        let rows: Vec<&str> = diagram
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if rows.len() != usize::from(BOARD_SIZE) {
            return Err(ParseError::RowCount(rows.len()));
        }
        let mut state = Self::empty();
        for (i, line) in rows.iter().enumerate() {
            let squares: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if squares.len() != usize::from(BOARD_SIZE) {
                return Err(ParseError::RowLength {
                    row: i,
                    len: squares.len(),
                });
            }
            #[allow(clippy::cast_possible_truncation)]
            let row = BOARD_SIZE - 1 - i as u8;
            for (col, c) in (0..BOARD_SIZE).zip(squares) {
                if c == '.' || c == '-' {
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(ParseError::UnknownPiece(c))?;
                let cell = Cell::new(col, row).ok_or(ParseError::LightSquare { col, row })?;
                state.set(cell, Some(piece));
            }
        }
        Ok(state)
    }

    pub fn get(&self, cell: Cell) -> Option<Piece> {
        self.cells.get(cell.index()).copied().flatten()
    }

    pub fn set(&mut self, cell: Cell, piece: Option<Piece>) {
        if let Some(slot) = self.cells.get_mut(cell.index()) {
            *slot = piece;
        }
    }

    pub fn is_empty_at(&self, cell: Cell) -> bool {
        self.get(cell).is_none()
    }

    pub fn is_single_of(&self, cell: Cell, color: Color) -> bool {
        self.get(cell) == Some(Piece::single(color))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, Option<Piece>)> + '_ {
        Cell::all().map(|cell| (cell, self.get(cell)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Cell, Piece)> + '_ {
        self.iter().filter_map(move |(cell, piece)| match piece {
            Some(p) if p.color == color => Some((cell, p)),
            _ => None,
        })
    }

    /// Checkers of `color`, a Double counting as two.
    pub fn checker_count(&self, color: Color) -> u8 {
        self.pieces_of(color).map(|(_, p)| p.rank.weight()).sum()
    }

    pub fn count_rank(&self, color: Color, rank: Rank) -> usize {
        self.pieces_of(color).filter(|(_, p)| p.rank == rank).count()
    }

    pub fn compute_hash(&self) -> u64 {
        let keys = ZobristKeys::get();
        self.iter()
            .fold(0, |hash, (cell, piece)| hash ^ keys.key(cell, piece))
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..BOARD_SIZE).rev() {
            write!(f, "{} ", row + 1)?;
            for col in 0..BOARD_SIZE {
                let c = Cell::new(col, row).map_or(' ', |cell| self.get(cell).map_or('.', Piece::to_char));
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "  ABCDEFGH")
    }
}

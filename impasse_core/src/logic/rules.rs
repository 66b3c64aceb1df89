use crate::engine::Move;
use crate::logic::position::Position;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    GameOver,
    NoPieceAtOrigin,
    NotYourTurn,
    IllegalMove(Move),
    NothingToUndo,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameOver => f.write_str("the game is already over"),
            Self::NoPieceAtOrigin => f.write_str("no piece on the origin cell"),
            Self::NotYourTurn => f.write_str("that piece belongs to the side not on move"),
            Self::IllegalMove(mv) => write!(f, "illegal move {mv}"),
            Self::NothingToUndo => f.write_str("no move to undo"),
        }
    }
}

impl std::error::Error for MoveError {}

/// Checks a submitted move against the position's legal-move set.
pub fn validate_move(position: &Position, mv: &Move) -> Result<(), MoveError> {
    if position.winner().is_some() {
        return Err(MoveError::GameOver);
    }
    let piece = position
        .state()
        .get(mv.origin)
        .ok_or(MoveError::NoPieceAtOrigin)?;
    if piece.color != position.turn() {
        return Err(MoveError::NotYourTurn);
    }
    if !position.legal_moves().contains(mv) {
        return Err(MoveError::IllegalMove(*mv));
    }
    Ok(())
}

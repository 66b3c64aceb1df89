//! Rules engine and alpha-beta search for Impasse, a checkers variant played
//! on the 32 dark squares of an 8×8 board.

pub mod engine;
pub mod logic;

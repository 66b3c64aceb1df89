pub mod board;
pub mod eval_constants;
pub mod game;
pub mod generator;
pub mod lookup;
pub mod position;
pub mod rules;

#[cfg(test)]
mod position_test;

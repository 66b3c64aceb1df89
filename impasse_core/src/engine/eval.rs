use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::board::{move_directions, BoardState, Cell, Color, Piece, Rank, MAX_DIAGONAL};
use crate::logic::lookup::DiagonalTables;
use crate::logic::position::Position;
use std::sync::Arc;

pub struct ImpasseEvaluator {
    config: Arc<EngineConfig>,
}

impl Default for ImpasseEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(EngineConfig::default()))
    }
}

impl ImpasseEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }
}

impl Evaluator for ImpasseEvaluator {
    fn evaluate(&self, position: &Position) -> i32 {
        evaluate_with(position, &self.config)
    }
}

/// Static score from White's point of view: positive favours White.
pub fn evaluate_with(position: &Position, config: &EngineConfig) -> i32 {
    if let Some(winner) = position.winner() {
        return match winner {
            Color::White => config.score_win,
            Color::Black => -config.score_win,
        };
    }

    let state = position.state();
    let checkers = position.checkers();

    // 1. Material: fewer checkers left is better
    let count_diff = i32::from(checkers.black) - i32::from(checkers.white);
    let mut score = if count_diff == 0 {
        config.weight_doubles * (doubles_count(state, Color::White) - doubles_count(state, Color::Black))
    } else {
        config.weight_checkers_count * count_diff
    };

    // 2. Routes home for Doubles, routes to the far row for Singles
    score += config.weight_doubles_paths
        * (bear_off_paths(state, Color::White, config.doubles_paths_max)
            - bear_off_paths(state, Color::Black, config.doubles_paths_max));
    score += config.weight_singles_paths
        * (crown_paths(state, Color::White, config.singles_paths_max)
            - crown_paths(state, Color::Black, config.singles_paths_max));

    score
}

fn doubles_count(state: &BoardState, color: Color) -> i32 {
    i32::try_from(state.count_rank(color, Rank::Double)).unwrap_or(i32::MAX)
}

/// Sum over `color`'s Doubles of their best route score to the home row.
pub fn bear_off_paths(state: &BoardState, color: Color, max: i32) -> i32 {
    state
        .pieces_of(color)
        .filter(|(_, piece)| piece.rank == Rank::Double)
        .map(|(cell, _)| {
            let mut walk = BearOffWalk {
                state,
                color,
                max,
                best: None,
            };
            for dir_idx in 0..2 {
                walk.walk(cell, dir_idx, 0, false, false, 0);
            }
            walk.best.unwrap_or(0)
        })
        .sum()
}

/// Sum over `color`'s Singles of their best route score to the crown row.
pub fn crown_paths(state: &BoardState, color: Color, max: i32) -> i32 {
    state
        .pieces_of(color)
        .filter(|(_, piece)| piece.is_single())
        .map(|(cell, _)| {
            let mut walk = CrownWalk {
                state,
                color,
                max,
                best: None,
            };
            for dir_idx in 0..2 {
                walk.walk(cell, dir_idx, 1, 0);
            }
            walk.best.unwrap_or(0)
        })
        .sum()
}

// A Double heads home along its own diagonals. A run of empty cells costs
// one slide; hopping an own Single (a transpose) costs one more unless it
// directly follows a turn onto an empty run.
struct BearOffWalk<'a> {
    state: &'a BoardState,
    color: Color,
    max: i32,
    best: Option<i32>,
}

impl BearOffWalk<'_> {
    fn walk(
        &mut self,
        anchor: Cell,
        dir_idx: usize,
        mut steps: i32,
        mut prev_empty: bool,
        mut changed_dir: bool,
        depth: usize,
    ) {
        if depth > MAX_DIAGONAL {
            return;
        }
        let dirs = move_directions(Piece::double(self.color));
        let Some(&dir) = dirs.get(dir_idx) else {
            return;
        };
        let own_single = Piece::single(self.color);

        for &cell in DiagonalTables::get().ray(anchor, dir) {
            let new_steps = match self.state.get(cell) {
                None => {
                    if !prev_empty {
                        steps += 1;
                        prev_empty = true;
                    }
                    changed_dir = false;
                    steps + 1
                }
                Some(piece) if piece == own_single => {
                    if !(changed_dir && prev_empty) {
                        steps += 1;
                    }
                    changed_dir = false;
                    prev_empty = false;
                    steps
                }
                Some(_) => break,
            };

            if cell.is_home_row_of(self.color) && self.improves(steps) {
                self.best = Some(self.max - steps);
                break;
            }
            self.walk(cell, 1 - dir_idx, new_steps, prev_empty, true, depth + 1);
        }
    }

    fn improves(&self, steps: i32) -> bool {
        self.best.is_none_or(|best| self.max - steps > best)
    }
}

// A Single heads for the far row over empty cells only, one step per cell.
struct CrownWalk<'a> {
    state: &'a BoardState,
    color: Color,
    max: i32,
    best: Option<i32>,
}

impl CrownWalk<'_> {
    fn walk(&mut self, anchor: Cell, dir_idx: usize, steps: i32, depth: usize) {
        if depth > MAX_DIAGONAL {
            return;
        }
        let dirs = move_directions(Piece::single(self.color));
        let Some(&dir) = dirs.get(dir_idx) else {
            return;
        };

        for &cell in DiagonalTables::get().ray(anchor, dir) {
            if !self.state.is_empty_at(cell) {
                break;
            }
            if cell.is_crown_row_of(self.color)
                && self.best.is_none_or(|best| self.max - steps > best)
            {
                self.best = Some(self.max - steps);
            }
            self.walk(cell, 1 - dir_idx, steps + 1, depth + 1);
        }
    }
}

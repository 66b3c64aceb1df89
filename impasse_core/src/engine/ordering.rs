use crate::engine::{Move, MoveTag};
use crate::logic::board::{move_directions, BoardState, Cell, Color, Piece, Rank};
use crate::logic::lookup::DiagonalTables;
use crate::logic::position::Position;

/// Legal moves of `position`, most promising first.
///
/// Buckets, in order: the hint (if legal), crownings, bear-offs, slides that
/// block opposing Doubles (two, then one) or opposing Singles (two, then
/// one), crown setups, transposes, then every other slide by descending
/// column distance.
pub fn order_moves(position: &Position, hint: Option<Move>) -> Vec<Move> {
    let state = position.state();
    let mover = position.turn();

    let mut first = Vec::with_capacity(1);
    let mut crowns = Vec::new();
    let mut bear_offs = Vec::new();
    let mut blocks_two_doubles = Vec::new();
    let mut blocks_one_double = Vec::new();
    let mut blocks_two_singles = Vec::new();
    let mut blocks_one_single = Vec::new();
    let mut crown_setups = Vec::new();
    let mut transposes = Vec::new();
    let mut slides = Vec::new();

    for mv in position.legal_moves().iter() {
        if Some(mv) == hint {
            first.push(mv);
            continue;
        }
        if mv.tag == MoveTag::Crown {
            crowns.push(mv);
        } else if mv.tag.is_bear_off() {
            bear_offs.push(mv);
        } else if mv.tag.is_crown_setup() {
            crown_setups.push(mv);
        } else if mv.tag == MoveTag::Transpose {
            transposes.push(mv);
        } else if let Some(target) = mv.target {
            match blocked_doubles(state, target, mover) {
                2.. => blocks_two_doubles.push(mv),
                1 => blocks_one_double.push(mv),
                _ => match blocked_singles(state, target, mover) {
                    2.. => blocks_two_singles.push(mv),
                    1 => blocks_one_single.push(mv),
                    _ => slides.push(mv),
                },
            }
        } else {
            slides.push(mv);
        }
    }

    slides.sort_by_key(|mv| std::cmp::Reverse(mv.column_distance()));

    first
        .into_iter()
        .chain(crowns)
        .chain(bear_offs)
        .chain(blocks_two_doubles)
        .chain(blocks_one_double)
        .chain(blocks_two_singles)
        .chain(blocks_one_single)
        .chain(crown_setups)
        .chain(transposes)
        .chain(slides)
        .collect()
}

/// Opposing Doubles whose nearest occupied cell along a line through
/// `target` would be `target` itself.
pub fn blocked_doubles(state: &BoardState, target: Cell, mover: Color) -> usize {
    blocked(state, target, mover, Rank::Double)
}

/// Same as [`blocked_doubles`] for opposing Singles.
pub fn blocked_singles(state: &BoardState, target: Cell, mover: Color) -> usize {
    blocked(state, target, mover, Rank::Single)
}

fn blocked(state: &BoardState, target: Cell, mover: Color, rank: Rank) -> usize {
    let tables = DiagonalTables::get();
    let opponent = Piece::new(mover.opposite(), rank);
    move_directions(Piece::new(mover, rank))
        .into_iter()
        .filter(|&dir| {
            tables
                .ray(target, dir)
                .iter()
                .find_map(|&cell| state.get(cell))
                .is_some_and(|piece| piece == opponent)
        })
        .count()
}

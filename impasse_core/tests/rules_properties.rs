use impasse_core::engine::ordering::order_moves;
use impasse_core::engine::{Move, MoveTag};
use impasse_core::logic::board::{move_directions, BoardState, Cell, Color, Direction};
use impasse_core::logic::generator::MoveGenerator;
use impasse_core::logic::lookup::DiagonalTables;
use impasse_core::logic::position::Position;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn direction_between(origin: Cell, target: Cell) -> Direction {
    let dc = if target.col() > origin.col() { 1 } else { -1 };
    let dr = if target.row() > origin.row() { 1 } else { -1 };
    Direction { dc, dr }
}

fn check_slides_are_unobstructed(pos: &Position) {
    let tables = DiagonalTables::get();
    for mv in pos.legal_moves().iter() {
        let is_slide = matches!(
            mv.tag,
            MoveTag::Slide | MoveTag::SlideToBearOffRow | MoveTag::SlideToCrownSetup
        );
        if !is_slide {
            continue;
        }
        let target = mv.target.unwrap();
        let ray = tables.ray(mv.origin, direction_between(mv.origin, target));
        let steps = ray.iter().position(|&c| c == target).unwrap();
        for &c in ray.iter().take(steps + 1) {
            assert!(pos.state().is_empty_at(c), "{mv} crosses {c}");
        }
    }
}

fn check_crownings_are_exclusive(pos: &Position) {
    let turn = pos.turn();
    let moves: Vec<Move> = pos.legal_moves().iter().collect();
    let crowns = moves.iter().filter(|m| m.tag == MoveTag::Crown).count();
    if crowns == 0 {
        return;
    }
    assert_eq!(crowns, moves.len());

    let singles: Vec<Cell> = pos
        .state()
        .pieces_of(turn)
        .filter(|(_, p)| p.is_single())
        .map(|(c, _)| c)
        .collect();
    let ripe = singles.iter().filter(|c| c.is_crown_row_of(turn)).count();
    assert_eq!(crowns, ripe * (singles.len() - 1));
}

// A slide needs an empty neighbour, a transpose an own Single next to a Double.
fn has_slide_or_transpose(pos: &Position) -> bool {
    let state = pos.state();
    let turn = pos.turn();
    state.pieces_of(turn).any(|(cell, piece)| {
        move_directions(piece).into_iter().any(|dir| {
            cell.step(dir).is_some_and(|next| {
                state.is_empty_at(next) || (!piece.is_single() && state.is_single_of(next, turn))
            })
        })
    })
}

fn check_impasse_is_total(pos: &Position) {
    let moves = pos.legal_moves();
    if moves.iter().any(|m| m.tag == MoveTag::Crown) {
        return;
    }
    let stuck = !has_slide_or_transpose(pos);
    let others = MoveGenerator::new().other_moves(pos.state(), pos.turn());
    assert_eq!(stuck, others.iter().all(|m| m.tag == MoveTag::BearOff));

    let bear_offs = moves.iter().filter(|m| m.tag == MoveTag::BearOff).count();
    if !stuck {
        assert_eq!(bear_offs, 0);
        return;
    }
    let pieces = pos.state().pieces_of(pos.turn()).count();
    assert_eq!(bear_offs, pieces);
    assert_eq!(moves.len(), pieces);
    for (cell, _) in pos.state().pieces_of(pos.turn()) {
        assert_eq!(moves.tag(cell, None), Some(MoveTag::BearOff), "{cell}");
    }
}

#[test]
fn test_random_playouts_respect_move_rules() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..30 {
        let mut pos = Position::new();
        for _ in 0..500 {
            if pos.is_terminal() {
                assert!(pos.legal_moves().is_empty());
                break;
            }
            check_slides_are_unobstructed(&pos);
            check_crownings_are_exclusive(&pos);
            check_impasse_is_total(&pos);

            let ordered = order_moves(&pos, None);
            assert_eq!(ordered, order_moves(&pos, None));
            assert_eq!(ordered.len(), pos.legal_moves().len());

            let mv = *ordered.choose(&mut rng).unwrap();
            let next = pos.derive(&mv);
            assert_eq!(next.hash(), next.state().compute_hash());
            pos = next;
        }
    }
}

#[test]
fn test_initial_position_scenario() {
    let pos = Position::new();
    assert_eq!(pos.turn(), Color::White);
    assert_eq!(pos.evaluate(), 0);
    assert!(pos
        .legal_moves()
        .iter()
        .all(|m| m.tag == MoveTag::Slide));
}

#[test]
fn test_blocked_side_may_bear_off_every_piece() {
    // White Singles on A1 and C1 face Black Singles on B2 and D2; the White
    // Double on E1 already sits on its home row.
    let state = BoardState::from_diagram(
        "........
         ........
         ........
         ........
         ........
         ........
         .b.b....
         w.w.W...",
    )
    .unwrap();
    let pos = Position::from_state(state, Color::White);
    assert!(!has_slide_or_transpose(&pos));
    check_impasse_is_total(&pos);

    let origins: Vec<String> = pos.legal_moves().origins().map(|c| c.to_string()).collect();
    assert_eq!(origins.len(), 3);
    for origin in ["A1", "C1", "E1"] {
        assert!(origins.iter().any(|o| o == origin), "{origin}");
    }
}

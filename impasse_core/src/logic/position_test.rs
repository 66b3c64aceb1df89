use crate::engine::{Move, MoveTag};
use crate::logic::board::{BoardState, Cell, Color, Piece};
use crate::logic::position::{Position, PositionSnapshot};
use crate::logic::rules::MoveError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn cell(s: &str) -> Cell {
    s.parse().unwrap()
}

fn position(diagram: &str, turn: Color) -> Position {
    Position::from_state(BoardState::from_diagram(diagram).unwrap(), turn)
}

fn find(pos: &Position, origin: &str, target: Option<&str>) -> Move {
    pos.find_move(cell(origin), target.map(cell))
        .unwrap_or_else(|| panic!("{origin}-{target:?} should be legal"))
}

#[test]
fn test_initial_position() {
    let pos = Position::new();
    assert_eq!(pos.turn(), Color::White);
    assert_eq!(pos.checkers().white, 12);
    assert_eq!(pos.checkers().black, 12);
    assert_eq!(pos.winner(), None);
    assert_eq!(pos.hash(), pos.state().compute_hash());
    assert_eq!(pos, Position::with_start(None, None));
}

#[test]
fn test_plain_slide_passes_the_turn() {
    let pos = Position::new();
    let mv = find(&pos, "D2", Some("E3"));
    assert_eq!(mv.tag, MoveTag::Slide);

    let delta = pos.apply_move(&mv);
    assert_eq!(delta.len(), 2);
    let previous = pos.previous_cells(&delta);
    assert_eq!(previous.first().unwrap().piece, Some(Piece::single(Color::White)));
    assert_eq!(previous.get(1).unwrap().piece, None);

    let next = pos.derive(&mv);
    assert_eq!(next.turn(), Color::Black);
    assert_eq!(next.state().get(cell("D2")), None);
    assert_eq!(next.state().get(cell("E3")), Some(Piece::single(Color::White)));
    assert_eq!(next.checkers(), pos.checkers());
    assert_eq!(next.hash(), next.state().compute_hash());
}

#[test]
fn test_crown_setup_keeps_turn_for_crowning() {
    let pos = position(
        "........
         w.......
         ........
         ........
         .......b
         ........
         ...w....
         ........",
        Color::White,
    );
    let setup = find(&pos, "A7", Some("B8"));
    assert_eq!(setup.tag, MoveTag::SlideToCrownSetup);

    let ripe = pos.derive(&setup);
    assert_eq!(ripe.turn(), Color::White);
    assert_eq!(ripe.legal_moves().len(), 1);
    let crown = find(&ripe, "D2", Some("B8"));
    assert_eq!(crown.tag, MoveTag::Crown);

    let crowned = ripe.derive(&crown);
    assert_eq!(crowned.turn(), Color::Black);
    assert_eq!(crowned.state().get(cell("B8")), Some(Piece::double(Color::White)));
    assert_eq!(crowned.state().get(cell("D2")), None);
    assert_eq!(crowned.checkers().white, 2);
}

#[test]
fn test_crown_setup_without_partner_passes_the_turn() {
    let pos = position(
        "........
         w.......
         ........
         ........
         .......b
         ........
         ........
         ..W.....",
        Color::White,
    );
    let next = pos.derive(&find(&pos, "A7", Some("B8")));
    assert_eq!(next.turn(), Color::Black);
}

#[test]
fn test_opponent_ripe_single_waits_for_its_own_turn() {
    // White's B8 Single is ripe, but Black moves into a position where the
    // turn change does not look for crownings.
    let pos = position(
        ".w......
         ........
         ........
         ........
         .......b
         ........
         ........
         w.......",
        Color::Black,
    );
    let mv = pos.legal_moves().iter().next().unwrap();
    let next = pos.derive(&mv);
    assert_eq!(next.turn(), Color::White);
    assert!(next.legal_moves().iter().all(|m| m.tag != MoveTag::Crown));

    // Building the same board from scratch does offer the crowning.
    let fresh = Position::from_state(next.state().clone(), Color::White);
    assert!(fresh.legal_moves().iter().all(|m| m.tag == MoveTag::Crown));
}

#[test]
fn test_transpose_to_bear_off() {
    let pos = position(
        "........
         ........
         ........
         b.......
         ........
         ........
         ...W....
         ..w.....",
        Color::White,
    );
    let mv = find(&pos, "D2", Some("C1"));
    assert_eq!(mv.tag, MoveTag::TransposeToBearOff);

    let next = pos.derive(&mv);
    assert_eq!(next.turn(), Color::Black);
    assert_eq!(next.state().get(cell("D2")), Some(Piece::single(Color::White)));
    assert_eq!(next.state().get(cell("C1")), Some(Piece::single(Color::White)));
    assert_eq!(next.checkers().white, 2);
}

#[test]
fn test_slide_to_bear_off_row_drops_a_checker() {
    let pos = position(
        "........
         ........
         ........
         b.......
         ........
         ........
         ...W....
         ........",
        Color::White,
    );
    let mv = find(&pos, "D2", Some("E1"));
    assert_eq!(mv.tag, MoveTag::SlideToBearOffRow);

    let next = pos.derive(&mv);
    assert_eq!(next.state().get(cell("E1")), Some(Piece::single(Color::White)));
    assert_eq!(next.checkers().white, 1);
    assert_eq!(next.turn(), Color::Black);
}

#[test]
fn test_last_bear_off_wins() {
    let pos = position(
        "........
         ........
         ........
         ........
         ........
         ........
         .b.b....
         ..w.....",
        Color::White,
    );
    let mv = find(&pos, "C1", None);
    assert_eq!(mv.tag, MoveTag::BearOff);

    let next = pos.play(&mv).unwrap();
    assert_eq!(next.winner(), Some(Color::White));
    assert_eq!(next.checkers().white, 0);
    assert!(next.legal_moves().is_empty());
    assert!(next.is_terminal());
    assert_eq!(next.evaluate(), 1000);
    assert_eq!(next.play(&mv), Err(MoveError::GameOver));
}

#[test]
fn test_double_bear_off_leaves_a_single() {
    let pos = position(
        "........
         ........
         ........
         ........
         ........
         ........
         .b.b....
         ..W.....",
        Color::White,
    );
    let next = pos.derive(&find(&pos, "C1", None));
    assert_eq!(next.state().get(cell("C1")), Some(Piece::single(Color::White)));
    assert_eq!(next.checkers().white, 1);
    assert_eq!(next.winner(), None);
}

#[test]
fn test_play_rejects_bad_moves() {
    let pos = Position::new();
    let from_empty = Move::new(cell("E3"), Some(cell("F4")), MoveTag::Slide);
    assert_eq!(pos.play(&from_empty), Err(MoveError::NoPieceAtOrigin));

    let black_piece = Move::new(cell("A7"), Some(cell("B6")), MoveTag::Slide);
    assert_eq!(pos.play(&black_piece), Err(MoveError::NotYourTurn));

    let wrong_tag = Move::new(cell("D2"), Some(cell("E3")), MoveTag::Transpose);
    assert_eq!(pos.play(&wrong_tag), Err(MoveError::IllegalMove(wrong_tag)));
}

#[test]
fn test_snapshot_roundtrip_restores_hash() {
    let mut pos = Position::new();
    pos = pos.derive(&find(&pos, "D2", Some("E3")));

    let json = serde_json::to_string(&pos).unwrap();
    let restored: Position = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, pos);
    assert_eq!(restored.hash(), pos.hash());

    let snapshot: PositionSnapshot = pos.snapshot();
    assert_eq!(Position::from_snapshot(snapshot), pos);
}

#[test]
fn test_random_playouts_keep_invariants() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let mut pos = Position::new();
        for _ in 0..400 {
            if pos.is_terminal() {
                break;
            }
            let moves: Vec<Move> = pos.legal_moves().iter().collect();
            assert!(!moves.is_empty());

            // Crownings are exclusive.
            let crowns = moves.iter().filter(|m| m.tag == MoveTag::Crown).count();
            assert!(crowns == 0 || crowns == moves.len());

            let mv = *moves.choose(&mut rng).unwrap();
            let before = pos.checkers().get(pos.turn());
            let mover = pos.turn();
            pos = pos.derive(&mv);

            assert_eq!(pos.hash(), pos.state().compute_hash());
            let after = pos.checkers().get(mover);
            let expected = if mv.tag.is_bear_off() { before - 1 } else { before };
            assert_eq!(after, expected, "{mv}");
            assert_eq!(pos.checkers().white, pos.state().checker_count(Color::White));
            assert_eq!(pos.checkers().black, pos.state().checker_count(Color::Black));
            assert_eq!(pos.winner().is_some(), pos.legal_moves().is_empty());
        }
    }
}

use crate::engine::config::EngineConfig;
use crate::engine::ordering::order_moves;
use crate::engine::search::{random_move, AlphaBetaEngine};
use crate::engine::{SearchDepth, SearchLimit, Searcher, TimeBudget};
use crate::logic::board::{BoardState, Color};
use crate::logic::position::Position;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn engine_without_tt() -> AlphaBetaEngine {
    AlphaBetaEngine::new(Arc::new(EngineConfig {
        use_tt: false,
        ..EngineConfig::default()
    }))
}

fn position(diagram: &str, turn: Color) -> Position {
    Position::from_state(BoardState::from_diagram(diagram).unwrap(), turn)
}

// Plain minimax with the same ply accounting as the engine.
fn minimax(position: &Position, depth: u8) -> i32 {
    if position.is_terminal() || depth == 0 {
        return position.evaluate();
    }
    let maximizing = position.turn() == Color::White;
    let values = position.legal_moves().iter().map(|mv| {
        let child = position.derive(&mv);
        let child_depth = if child.turn() == position.turn() {
            depth
        } else {
            depth - 1
        };
        minimax(&child, child_depth)
    });
    if maximizing {
        values.max().unwrap()
    } else {
        values.min().unwrap()
    }
}

#[test]
fn test_alpha_beta_matches_minimax_from_start() {
    let start = Position::new();
    let mut engine = engine_without_tt();
    for depth in 1..=3 {
        let (value, mv) = engine.search_depth(&start, depth);
        assert_eq!(value, minimax(&start, depth), "depth {depth}");
        let mv = mv.unwrap();
        assert!(start.legal_moves().contains(&mv));
        let child = start.derive(&mv);
        assert_eq!(minimax(&child, depth - 1), value, "depth {depth}");
    }
}

#[test]
fn test_alpha_beta_matches_minimax_in_endgame() {
    // Both sides close to the end; crown setups and bear-offs in reach.
    let pos = position(
        "........
         ..w.....
         ........
         ....B...
         ........
         b.......
         .....W..
         ......b.",
        Color::White,
    );
    let mut engine = engine_without_tt();
    for depth in 1..=4 {
        let (value, _) = engine.search_depth(&pos, depth);
        assert_eq!(value, minimax(&pos, depth), "depth {depth}");
    }
}

#[test]
fn test_single_legal_move_is_returned_without_search() {
    // Impasse: the lone White Single is boxed in and must bear off.
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
    assert_eq!(pos.legal_moves().len(), 1);

    let mut engine = AlphaBetaEngine::default();
    let suggestion = engine.suggest_move(&pos).unwrap();
    assert_eq!(suggestion.depth, SearchDepth::Trivial);
    assert_eq!(suggestion.stats.nodes, 0);
    assert_eq!(suggestion.value, pos.evaluate());
    assert_eq!(Some(suggestion.mv), pos.legal_moves().only_move());
}

#[test]
fn test_no_suggestion_for_finished_game() {
    let pos = position(
        "........
         ........
         ........
         ........
         ........
         ........
         .b......
         ........",
        Color::Black,
    );
    assert!(pos.is_terminal());
    let mut engine = AlphaBetaEngine::default();
    assert!(engine.suggest_move(&pos).is_none());
}

#[test]
fn test_depth_limit_is_honoured() {
    let start = Position::new();
    let mut engine = AlphaBetaEngine::default();
    let (mv, stats) = engine.search(&start, SearchLimit::Depth(3)).unwrap();
    assert_eq!(stats.depth, 3);
    assert!(stats.nodes > 0);
    assert!(start.legal_moves().contains(&mv));
    assert!(!engine.tt().is_empty());
}

#[test]
fn test_tt_does_not_change_root_choice_legality() {
    let start = Position::new();
    let mut engine = AlphaBetaEngine::default();
    for depth in 1..=3 {
        let suggestion = engine
            .suggest_move_with(&start, SearchLimit::Depth(depth))
            .unwrap();
        assert!(start.legal_moves().contains(&suggestion.mv));
    }
}

#[test]
fn test_soft_budget_stops_after_min_depth() {
    // A zero soft budget cuts the search the moment min_depth is passed,
    // so exactly min_depth plies complete.
    let start = Position::new();
    let mut engine = AlphaBetaEngine::default();
    let budget = TimeBudget {
        soft_ms: 0,
        hard_ms: 60_000,
        min_depth: 2,
    };
    let suggestion = engine
        .suggest_move_with(&start, SearchLimit::Time(budget))
        .unwrap();
    assert_eq!(suggestion.depth, SearchDepth::Searched(2));
    assert!(start.legal_moves().contains(&suggestion.mv));
}

#[test]
fn test_hard_budget_still_yields_a_legal_move() {
    let start = Position::new();
    let mut engine = AlphaBetaEngine::default();
    let budget = TimeBudget {
        soft_ms: 0,
        hard_ms: 0,
        min_depth: 64,
    };
    let suggestion = engine
        .suggest_move_with(&start, SearchLimit::Time(budget))
        .unwrap();
    assert_eq!(suggestion.depth, SearchDepth::Unfinished);
    assert_eq!(suggestion.stats.depth, 0);
    assert_eq!(Some(suggestion.mv), order_moves(&start, None).first().copied());
    assert_ne!(suggestion.depth.to_string(), SearchDepth::Trivial.to_string());
}

#[test]
fn test_random_move_is_legal() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut pos = Position::new();
    for _ in 0..40 {
        let Some(mv) = random_move(&pos, &mut rng) else {
            break;
        };
        assert!(pos.legal_moves().contains(&mv));
        pos = pos.derive(&mv);
    }
}

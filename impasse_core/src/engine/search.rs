use crate::engine::config::EngineConfig;
use crate::engine::eval::ImpasseEvaluator;
use crate::engine::ordering::order_moves;
use crate::engine::tt::{TTFlag, TranspositionTable};
use crate::engine::{
    Evaluator, Move, SearchDepth, SearchLimit, SearchStats, Searcher, Suggestion, TimeBudget,
};
use crate::logic::board::Color;
use crate::logic::position::Position;
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};

const INFINITY: i32 = 1_000_000;
const MAX_DEPTH: u8 = 64;

struct SearchContext {
    start: Instant,
    budget: Option<TimeBudget>,
    /// Set once iterative deepening goes past `min_depth`; until then only
    /// the hard budget applies.
    min_depth_reached: bool,
}

impl SearchContext {
    fn new(budget: Option<TimeBudget>) -> Self {
        Self {
            start: Instant::now(),
            budget,
            min_depth_reached: false,
        }
    }

    fn out_of_time(&self) -> bool {
        let Some(budget) = self.budget else {
            return false;
        };
        let elapsed = self.start.elapsed();
        elapsed > Duration::from_millis(budget.hard_ms)
            || (self.min_depth_reached && elapsed > Duration::from_millis(budget.soft_ms))
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
    evaluator: ImpasseEvaluator,
    tt: TranspositionTable,
    nodes_searched: u32,
}

impl Default for AlphaBetaEngine {
    fn default() -> Self {
        Self::new(Arc::new(EngineConfig::default()))
    }
}

impl AlphaBetaEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            evaluator: ImpasseEvaluator::new(config.clone()),
            config,
            tt: TranspositionTable::new(),
            nodes_searched: 0,
        }
    }

    pub const fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Best move under the configured time budget. `None` only when the
    /// side to move has no legal move.
    pub fn suggest_move(&mut self, position: &Position) -> Option<Suggestion> {
        let budget = self.config.time_budget();
        self.suggest_move_with(position, SearchLimit::Time(budget))
    }

    pub fn suggest_move_with(
        &mut self,
        position: &Position,
        limit: SearchLimit,
    ) -> Option<Suggestion> {
        if position.legal_moves().is_empty() {
            return None;
        }
        if let Some(mv) = position.legal_moves().only_move() {
            debug!("Only one legal move ({mv}), skipping search");
            return Some(Suggestion {
                mv,
                depth: SearchDepth::Trivial,
                value: self.evaluator.evaluate(position),
                stats: SearchStats::default(),
            });
        }
        self.iterative_deepening(position, limit)
    }

    pub fn search_depth(&mut self, position: &Position, depth: u8) -> (i32, Option<Move>) {
        let ctx = SearchContext::new(None);
        self.alpha_beta(&ctx, position, depth, -INFINITY, INFINITY)
            .unwrap_or_else(|| (self.evaluator.evaluate(position), None))
    }

    fn iterative_deepening(
        &mut self,
        position: &Position,
        limit: SearchLimit,
    ) -> Option<Suggestion> {
        self.nodes_searched = 0;
        let (max_depth, budget) = match limit {
            SearchLimit::Depth(d) => (d.clamp(1, MAX_DEPTH), None),
            SearchLimit::Time(budget) => (MAX_DEPTH, Some(budget)),
        };
        let mut ctx = SearchContext::new(budget);
        let mut completed: Option<(u8, i32, Option<Move>)> = None;

        for depth in 1..=max_depth {
            if budget.is_some_and(|b| depth > b.min_depth) {
                ctx.min_depth_reached = true;
            }
            match self.alpha_beta(&ctx, position, depth, -INFINITY, INFINITY) {
                Some((value, mv)) => {
                    debug!(
                        "Depth {depth} done: value {value}, nodes {}, {} ms",
                        self.nodes_searched,
                        ctx.elapsed_ms()
                    );
                    completed = Some((depth, value, mv));
                }
                None => {
                    debug!("Depth {depth} aborted after {} ms", ctx.elapsed_ms());
                    break;
                }
            }
        }

        let fallback = || order_moves(position, None).first().copied();
        let (depth, value, mv) = match completed {
            Some((depth, value, Some(mv))) if position.legal_moves().contains(&mv) => {
                (depth, value, mv)
            }
            Some((depth, value, _)) => {
                warn!("Search at depth {depth} produced no usable move, using first ordered move");
                (depth, value, fallback()?)
            }
            None => {
                warn!("Depth 1 did not finish within the hard budget, using first ordered move");
                (0, self.evaluator.evaluate(position), fallback()?)
            }
        };

        let stats = SearchStats {
            depth,
            nodes: self.nodes_searched,
            time_ms: ctx.elapsed_ms(),
        };
        info!(
            "Suggest {mv} for {}: depth {depth}, value {value}, {} nodes in {} ms",
            position.turn(),
            stats.nodes,
            stats.time_ms
        );
        Some(Suggestion {
            mv,
            depth: if completed.is_some() {
                SearchDepth::Searched(depth)
            } else {
                SearchDepth::Unfinished
            },
            value,
            stats,
        })
    }

    /// `None` means the clock ran out and the result must be discarded.
    fn alpha_beta(
        &mut self,
        ctx: &SearchContext,
        position: &Position,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
    ) -> Option<(i32, Option<Move>)> {
        if ctx.out_of_time() {
            return None;
        }
        self.nodes_searched = self.nodes_searched.wrapping_add(1);

        let alpha_orig = alpha;
        let beta_orig = beta;
        let hash = position.hash();

        if self.config.use_tt {
            if let Some(entry) = self.tt.probe(hash) {
                if entry.depth >= depth {
                    match entry.flag {
                        TTFlag::Exact => return Some((entry.score, entry.best_move)),
                        TTFlag::LowerBound => alpha = alpha.max(entry.score),
                        TTFlag::UpperBound => beta = beta.min(entry.score),
                    }
                    if alpha >= beta {
                        return Some((entry.score, entry.best_move));
                    }
                }
            }
        }

        if position.is_terminal() || depth == 0 {
            return Some((self.evaluator.evaluate(position), None));
        }

        let hint = if self.config.use_tt {
            self.tt.get_move(hash)
        } else {
            None
        };
        let maximizing = position.turn() == Color::White;
        let mut best_value = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;

        for mv in order_moves(position, hint) {
            let child = position.derive(&mv);
            // A side that keeps the turn (crowning) has not used up a ply.
            let child_depth = if child.turn() == position.turn() {
                depth
            } else {
                depth - 1
            };
            let (value, _) = self.alpha_beta(ctx, &child, child_depth, alpha, beta)?;

            if maximizing {
                if value > best_value {
                    best_value = value;
                    best_move = Some(mv);
                }
                alpha = alpha.max(value);
            } else {
                if value < best_value {
                    best_value = value;
                    best_move = Some(mv);
                }
                beta = beta.min(value);
            }
            if alpha >= beta {
                break;
            }
        }

        if self.config.use_tt {
            let flag = if best_value <= alpha_orig {
                TTFlag::UpperBound
            } else if best_value >= beta_orig {
                TTFlag::LowerBound
            } else {
                TTFlag::Exact
            };
            self.tt.store(hash, best_move, best_value, depth, flag);
        }

        Some((best_value, best_move))
    }
}

impl Searcher for AlphaBetaEngine {
    fn search(&mut self, position: &Position, limit: SearchLimit) -> Option<(Move, SearchStats)> {
        self.suggest_move_with(position, limit)
            .map(|suggestion| (suggestion.mv, suggestion.stats))
    }
}

/// Picks an origin at random, then one of its targets at random.
pub fn random_move<R: Rng + ?Sized>(position: &Position, rng: &mut R) -> Option<Move> {
    let legal = position.legal_moves();
    let origins: Vec<_> = legal.origins().collect();
    let origin = *origins.choose(rng)?;
    let targets: Vec<_> = legal.targets(origin)?.iter().collect();
    let (&target, &tag) = *targets.choose(rng)?;
    Some(Move::new(origin, target, tag))
}

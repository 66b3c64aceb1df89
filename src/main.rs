use clap::{Parser, ValueEnum};
use impasse_core::engine::config::EngineConfig;
use impasse_core::engine::search::{random_move, AlphaBetaEngine};
use impasse_core::logic::board::Color;
use impasse_core::logic::game::{GameState, GameStatus};
use log::{info, warn};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Self::White,
            Side::Black => Self::Black,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Impasse engine: self-play and move suggestions", long_about = None)]
struct Args {
    /// JSON engine configuration (weights are scale factors)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    soft_ms: Option<u64>,
    #[arg(long)]
    hard_ms: Option<u64>,
    #[arg(long)]
    min_depth: Option<u8>,
    /// Moves to play before stopping
    #[arg(long, default_value_t = 200)]
    plies: usize,
    /// Continue from a saved game
    #[arg(long)]
    resume: Option<PathBuf>,
    /// Write the final game here
    #[arg(long)]
    save: Option<PathBuf>,
    /// Print one suggestion for the side to move and exit
    #[arg(long)]
    suggest: bool,
    /// This side plays random legal moves instead of searching
    #[arg(long, value_enum)]
    random: Option<Side>,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let level = if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    simple_logger::init_with_level(level)?;

    let config = load_config(&args)?;
    let mut engine = AlphaBetaEngine::new(Arc::new(config));
    let mut game = match &args.resume {
        Some(path) => GameState::from_json(&fs::read_to_string(path)?)?,
        None => GameState::new(),
    };
    info!(
        "Starting position, {} to move:\n{}",
        game.turn(),
        game.position.state()
    );

    if args.suggest {
        match engine.suggest_move(&game.position) {
            Some(s) => println!("{} (depth {}, value {})", s.mv, s.depth, s.value),
            None => println!("No legal move: the game is over"),
        }
        return Ok(());
    }

    let random_side = args.random.map(Color::from);
    let mut rng = rand::thread_rng();
    for ply in 1..=args.plies {
        if game.status != GameStatus::Playing {
            break;
        }
        let turn = game.turn();
        let (mv, note) = if random_side == Some(turn) {
            let Some(mv) = random_move(&game.position, &mut rng) else {
                break;
            };
            (mv, None)
        } else {
            let Some(s) = engine.suggest_move(&game.position) else {
                break;
            };
            let note = format!(
                "depth {}, value {}, {} nodes, {} ms",
                s.depth, s.value, s.stats.nodes, s.stats.time_ms
            );
            (s.mv, Some(note))
        };
        info!("{ply}. {turn}: {mv}");
        game.make_engine_move(mv, note)?;
    }

    match game.status.winner() {
        Some(winner) => info!("{winner} wins ({:?})", game.status),
        None => info!("Stopped after {} plies", game.history.len()),
    }
    info!("Final position:\n{}", game.position.state());

    if let Some(path) = &args.save {
        fs::write(path, game.to_json()?)?;
        info!("Saved game to {}", path.display());
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<EngineConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from_json(&fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    if let Some(ms) = args.soft_ms {
        config.soft_time_ms = ms;
    }
    if let Some(ms) = args.hard_ms {
        config.hard_time_ms = ms;
    }
    if let Some(depth) = args.min_depth {
        config.min_search_depth = depth;
    }
    if config.soft_time_ms > config.hard_time_ms {
        warn!(
            "Soft budget {} ms exceeds hard budget {} ms; the hard budget applies",
            config.soft_time_ms, config.hard_time_ms
        );
    }
    Ok(config)
}

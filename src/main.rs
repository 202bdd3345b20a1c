//! alfiere command-line entry point: search one position and print the best move.

use alfiere::eval::{Evaluator, MaterialEval, MaterialMobilityEval, MobilityEval};
use alfiere::search::{OrderingStrategy, Search, SearchParams};
use alfiere::{Board, START_FEN};
use clap::{Parser, ValueEnum};
use log::error;
use std::process::ExitCode;
use std::time::Duration;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EvalKind {
    Material,
    Mobility,
    MaterialMobility,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Ordering {
    None,
    MvvLva,
    Aggressive,
}

impl From<Ordering> for OrderingStrategy {
    fn from(value: Ordering) -> Self {
        match value {
            Ordering::None => OrderingStrategy::None,
            Ordering::MvvLva => OrderingStrategy::MvvLva,
            Ordering::Aggressive => OrderingStrategy::Aggressive,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Position to search
    #[arg(short, long, default_value_t = String::from(START_FEN))]
    fen: String,

    /// Maximum depth in plies
    #[arg(short, long, default_value_t = 6)]
    depth: u8,

    /// Time budget in milliseconds
    #[arg(short, long)]
    movetime: Option<u64>,

    #[arg(short, long, value_enum, default_value_t = EvalKind::Material)]
    eval: EvalKind,

    #[arg(short, long, value_enum, default_value_t = Ordering::MvvLva)]
    ordering: Ordering,

    /// Stop at the horizon instead of resolving captures
    #[arg(long)]
    no_quiescence: bool,

    /// Plain minimax, no alpha-beta cutoffs
    #[arg(long)]
    no_pruning: bool,
}

fn run<E: Evaluator>(board: Board, evaluator: E, params: SearchParams) -> alfiere::Result<()> {
    let mut search = Search::new(board, evaluator, params);
    let result = search.search()?;
    println!("bestmove {} score {} depth {}", result.best_move, result.score, result.depth);
    println!("{}", result.stats);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    alfiere::init();

    let args = Args::parse();

    let board = match Board::from_fen(&args.fen) {
        Ok(board) => board,
        Err(e) => {
            error!("invalid FEN '{}': {}", args.fen, e);
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut params = SearchParams::new()
        .max_depth(args.depth)
        .ordering(args.ordering.into())
        .quiescence(!args.no_quiescence)
        .alpha_beta(!args.no_pruning);
    if let Some(ms) = args.movetime {
        params = params.time_limit(Duration::from_millis(ms));
    }

    let outcome = match args.eval {
        EvalKind::Material => run(board, MaterialEval, params),
        EvalKind::Mobility => run(board, MobilityEval, params),
        EvalKind::MaterialMobility => run(board, MaterialMobilityEval, params),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

use alfiere::perft::{perft, perft_divide};
use alfiere::{Board, START_FEN};
use clap::Parser;
use log::info;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = String::from(START_FEN))]
    fen: String,

    #[arg(short, long, default_value_t = 4)]
    depth: u8,

    /// Print the node count below each root move
    #[arg(long)]
    divide: bool,

    /// Compare against shakmaty's move generator
    #[arg(long)]
    verify: bool,
}

fn perft_shakmaty(pos: &Chess, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}

fn main() -> ExitCode {
    env_logger::init();
    alfiere::init();
    let args = Args::parse();

    let mut board = match Board::from_fen(&args.fen) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Running perft on FEN: '{}' at depth {}", args.fen, args.depth);
    let start = std::time::Instant::now();

    let nodes = if args.divide {
        match perft_divide(&mut board, args.depth) {
            Ok(split) => {
                for (mv, count) in &split {
                    println!("{}: {}", mv, count);
                }
                split.iter().map(|(_, count)| count).sum::<u64>()
            }
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        match perft(&mut board, args.depth) {
            Ok(n) => n,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    };

    let duration = start.elapsed();
    println!(
        "perft({}) = {} nodes ({} ms, {:.2} Mnps)",
        args.depth,
        nodes,
        duration.as_millis(),
        nodes as f64 / (duration.as_micros().max(1) as f64)
    );

    if args.verify {
        let pos: Chess = match args
            .fen
            .parse::<Fen>()
            .ok()
            .and_then(|fen| fen.into_position(CastlingMode::Standard).ok())
        {
            Some(pos) => pos,
            None => {
                eprintln!("shakmaty rejected FEN '{}'", args.fen);
                return ExitCode::FAILURE;
            }
        };
        let expected = perft_shakmaty(&pos, args.depth);
        info!("shakmaty perft({}) = {}", args.depth, expected);
        if expected != nodes {
            eprintln!("MISMATCH: shakmaty counts {} nodes", expected);
            return ExitCode::FAILURE;
        }
        println!("verified against shakmaty");
    }

    ExitCode::SUCCESS
}

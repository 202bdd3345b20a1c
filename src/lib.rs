pub mod board;
pub mod error;
pub mod eval;
pub mod magic;
pub mod movegen;
pub mod perft;
pub mod search;
pub mod time;
pub mod utils;

pub use board::{Board, Color, Move, PieceKind, START_FEN};
pub use error::{ChessError, Result};
pub use search::{choose_move, SearchLimit};

/// Build every precomputed attack table now instead of on first lookup.
pub fn init() {
    utils::init_attack_tables();
    magic::init();
}

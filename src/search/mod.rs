//! Search engine for the alfiere chess engine
//!
//! Iterative deepening alpha-beta with quiescence, move ordering and a time
//! budget, plus the random and greedy baseline players.

pub mod baseline;
pub mod ordering;
pub mod params;
pub mod search;
pub mod stats;

pub use self::baseline::{greedy_move, random_move};
pub use self::ordering::{order_moves, score_move};
pub use self::params::{OrderingStrategy, SearchLimit, SearchParams};
pub use self::search::{choose_move, is_mate_score, Search, SearchResult, CHECKMATE, INFINITY};
pub use self::stats::SearchStats;
pub use crate::board::Move;

//! Move ordering heuristics
//!
//! Ordering is a stable re-sort of the legal move list by a priority score.
//! It never drops a move, so it changes how much gets pruned and nothing else.

use super::params::OrderingStrategy;
use crate::board::{Board, Color, Move, PieceKind};
use crate::eval::piece_value;
use std::cmp::Reverse;

const CAPTURE_BASE: i32 = 10_000;
const MVV_LVA_PROMOTION_BASE: i32 = 5_000;
const AGGRESSIVE_PROMOTION_BASE: i32 = 8_000;
const KILLER_BONUS: i32 = 4_000;
const DEVELOPMENT_BONUS: i32 = 50;
const PAWN_ADVANCE_BONUS: i32 = 10;

// Bonus for standing near the centre; symmetric, so white and black share it
#[rustfmt::skip]
const CENTRAL_BONUS: [i32; 64] = [
    0,  0,  0,  0,  0,  0,  0,  0,
    0,  5, 10, 10, 10, 10,  5,  0,
    0, 10, 20, 30, 30, 20, 10,  0,
    0, 10, 30, 50, 50, 30, 10,  0,
    0, 10, 30, 50, 50, 30, 10,  0,
    0, 10, 20, 30, 30, 20, 10,  0,
    0,  5, 10, 10, 10, 10,  5,  0,
    0,  0,  0,  0,  0,  0,  0,  0,
];

/// Piece taken by `mv`, including the pawn removed by an en-passant capture.
pub fn captured_piece(board: &Board, mv: Move) -> Option<PieceKind> {
    match board.piece_on(mv.to()) {
        Some((kind, _)) => Some(kind),
        None => {
            let is_pawn = matches!(board.piece_on(mv.from()), Some((PieceKind::Pawn, _)));
            (is_pawn && board.ep_square() == Some(mv.to())).then_some(PieceKind::Pawn)
        }
    }
}

/// Captures and promotions: the moves quiescence keeps searching.
pub fn is_tactical(board: &Board, mv: Move) -> bool {
    mv.promotion().is_some() || captured_piece(board, mv).is_some()
}

/// Victim value x 10 minus attacker value.
pub fn mvv_lva(victim: PieceKind, attacker: PieceKind) -> i32 {
    piece_value(victim) * 10 - piece_value(attacker)
}

fn tactical_score(board: &Board, mv: Move, promotion_base: i32) -> i32 {
    let mut priority = 0;
    if let (Some(victim), Some((attacker, _))) = (captured_piece(board, mv), board.piece_on(mv.from())) {
        priority = CAPTURE_BASE + mvv_lva(victim, attacker);
    }
    if let Some(promoted) = mv.promotion() {
        priority = priority.max(promotion_base + piece_value(promoted));
    }
    priority
}

fn positional_score(board: &Board, mv: Move) -> i32 {
    let Some((kind, color)) = board.piece_on(mv.from()) else {
        return 0;
    };
    let (from, to) = (mv.from(), mv.to());
    let mut priority = (CENTRAL_BONUS[to] - CENTRAL_BONUS[from]).max(0);

    if kind != PieceKind::Pawn && kind != PieceKind::King {
        let back_rank = match color {
            Color::White => 0,
            Color::Black => 7,
        };
        if from / 8 == back_rank {
            priority += DEVELOPMENT_BONUS;
        }
    }
    if kind == PieceKind::Pawn {
        let advance = match color {
            Color::White => to as i32 / 8 - from as i32 / 8,
            Color::Black => from as i32 / 8 - to as i32 / 8,
        };
        priority += advance.max(0) * PAWN_ADVANCE_BONUS;
    }
    priority
}

/// Priority of `mv` under `strategy`; higher is searched first.
pub fn score_move(board: &Board, mv: Move, strategy: OrderingStrategy, killer: Option<Move>) -> i32 {
    let mut priority = match strategy {
        OrderingStrategy::None => 0,
        OrderingStrategy::MvvLva => tactical_score(board, mv, MVV_LVA_PROMOTION_BASE),
        OrderingStrategy::Aggressive => {
            tactical_score(board, mv, AGGRESSIVE_PROMOTION_BASE) + positional_score(board, mv)
        }
    };
    if killer == Some(mv) && !is_tactical(board, mv) {
        priority += KILLER_BONUS;
    }
    priority
}

/// Sort `moves` best-first. Ties keep generation order.
pub fn order_moves(board: &Board, moves: &mut [Move], strategy: OrderingStrategy, killer: Option<Move>) {
    if strategy == OrderingStrategy::None && killer.is_none() {
        return;
    }
    moves.sort_by_cached_key(|&mv| Reverse(score_move(board, mv, strategy, killer)));
}

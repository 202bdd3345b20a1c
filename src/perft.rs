//! Perft: count leaf positions of the legal move tree to a fixed depth.

use crate::board::{Board, Move};
use crate::error::Result;

/// Number of leaf positions reachable from `board` in exactly `depth` plies.
pub fn perft(board: &mut Board, depth: u8) -> Result<u64> {
    if depth == 0 {
        return Ok(1);
    }
    let moves = board.generate_moves();
    if depth == 1 {
        return Ok(moves.len() as u64);
    }
    let mut nodes = 0u64;
    for mv in moves {
        let undo = board.make_move(mv)?;
        let child = perft(board, depth - 1);
        board.unmake_move(undo);
        nodes += child?;
    }
    Ok(nodes)
}

/// Perft split by root move, in generation order.
pub fn perft_divide(board: &mut Board, depth: u8) -> Result<Vec<(Move, u64)>> {
    let mut split = Vec::new();
    if depth == 0 {
        return Ok(split);
    }
    for mv in board.generate_moves() {
        let undo = board.make_move(mv)?;
        let child = perft(board, depth - 1);
        board.unmake_move(undo);
        split.push((mv, child?));
    }
    Ok(split)
}

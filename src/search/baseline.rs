//! Baseline players used as sparring partners for the search

use super::ordering::captured_piece;
use crate::board::{Board, Move};
use crate::error::{ChessError, Result};
use crate::eval::piece_value;
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniformly random legal move.
pub fn random_move<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Result<Move> {
    let side = board.side_to_move();
    board
        .legal_moves(side)
        .choose(rng)
        .copied()
        .ok_or(ChessError::NoLegalMoves)
}

/// Capture the most valuable piece available, otherwise play a random move.
pub fn greedy_move<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Result<Move> {
    let side = board.side_to_move();
    let moves = board.legal_moves(side);
    if moves.is_empty() {
        return Err(ChessError::NoLegalMoves);
    }

    let board: &Board = board;
    let best_capture = moves
        .iter()
        .filter_map(|&mv| captured_piece(board, mv).map(|victim| (piece_value(victim), mv)))
        .max_by_key(|&(value, _)| value);

    match best_capture {
        Some((_, mv)) => Ok(mv),
        None => moves.choose(rng).copied().ok_or(ChessError::NoLegalMoves),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_move_is_legal() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut board = Board::start_position();
        for _ in 0..20 {
            let mv = random_move(&mut board, &mut rng).unwrap();
            assert!(board.generate_moves().contains(&mv));
            board.play_legal(mv).unwrap();
        }
    }

    #[test]
    fn test_greedy_takes_queen_over_pawn() {
        let mut rng = SmallRng::seed_from_u64(7);
        // Nc3 can take the d5 queen; the b4 pawn is out of reach
        let mut board = Board::from_fen("4k3/8/8/3q4/1p6/2N5/8/4K3 w - - 0 1").unwrap();
        assert_eq!(greedy_move(&mut board, &mut rng).unwrap(), Move::new(18, 35));
    }

    #[test]
    fn test_no_moves_on_checkmate() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut board = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(random_move(&mut board, &mut rng), Err(ChessError::NoLegalMoves));
        assert_eq!(greedy_move(&mut board, &mut rng), Err(ChessError::NoLegalMoves));
    }
}

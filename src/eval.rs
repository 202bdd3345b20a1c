//! Modulo di valutazione
//!
//! The search only needs "higher is better for `color`", so evaluation is a
//! trait with interchangeable implementations: plain material, plain
//! mobility, and the classic material + pawn structure + mobility formula.

use crate::board::{Board, Color, PieceKind};
use crate::utils::{count_bits, FILE_A};

// ============================================================================
// VALORI MATERIALI (in centipawn)
// ============================================================================
pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 320;
pub const BISHOP_VALUE: i32 = 330;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;
pub const KING_VALUE: i32 = 20000;

/// Centipawn value used for ordering and material counting.
#[inline]
pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::King => KING_VALUE,
    }
}

/// Static evaluation of a position from the point of view of `color`.
pub trait Evaluator {
    fn evaluate(&self, board: &Board, color: Color) -> i32;
}

impl<F> Evaluator for F
where
    F: Fn(&Board, Color) -> i32,
{
    fn evaluate(&self, board: &Board, color: Color) -> i32 {
        self(board, color)
    }
}

fn count(board: &Board, kind: PieceKind, color: Color) -> i32 {
    count_bits(board.piece_bb(kind, color)) as i32
}

/// Sum of piece values, own minus opponent's. Kings are left out: both sides always have one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEval;

impl MaterialEval {
    fn side_material(board: &Board, color: Color) -> i32 {
        [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ]
        .into_iter()
        .map(|kind| count(board, kind, color) * piece_value(kind))
        .sum()
    }
}

impl Evaluator for MaterialEval {
    fn evaluate(&self, board: &Board, color: Color) -> i32 {
        Self::side_material(board, color) - Self::side_material(board, color.opposite())
    }
}

/// Pseudo-legal move count for `color`.
pub fn mobility(board: &Board, color: Color) -> i32 {
    board.generate_pseudo_moves(color).len() as i32
}

/// Difference in pseudo-legal move counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct MobilityEval;

impl Evaluator for MobilityEval {
    fn evaluate(&self, board: &Board, color: Color) -> i32 {
        mobility(board, color) - mobility(board, color.opposite())
    }
}

// ============================================================================
// MATERIALE + STRUTTURA PEDONALE + MOBILITA'
// ============================================================================
// f = 200K + 9Q + 5R + 3(B+N) + P - 0.5(D+S+I) + 0.1M, differenze tra i lati,
// scalata in centipawn (un pedone = 100)

const MM_WEIGHTS: [(PieceKind, i32); 6] = [
    (PieceKind::King, 20000),
    (PieceKind::Queen, 900),
    (PieceKind::Rook, 500),
    (PieceKind::Bishop, 300),
    (PieceKind::Knight, 300),
    (PieceKind::Pawn, 100),
];
const PAWN_WEAKNESS_PENALTY: i32 = 50;
const MOBILITY_WEIGHT: i32 = 10;

/// Doubled, blocked and isolated pawns, summed.
pub fn pawn_weaknesses(board: &Board, color: Color) -> i32 {
    let pawns = board.piece_bb(PieceKind::Pawn, color);
    let mut weaknesses = 0;

    for file in 0..8 {
        let file_mask = FILE_A << file;
        let on_file = count_bits(pawns & file_mask) as i32;
        if on_file == 0 {
            continue;
        }
        // doubled
        weaknesses += on_file - 1;
        // isolated
        let neighbours = (if file > 0 { file_mask >> 1 } else { 0 }) | (if file < 7 { file_mask << 1 } else { 0 });
        if pawns & neighbours == 0 {
            weaknesses += on_file;
        }
    }

    let ahead = match color {
        Color::White => pawns << 8,
        Color::Black => pawns >> 8,
    };
    weaknesses + count_bits(ahead & board.occupied()) as i32
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialMobilityEval;

impl MaterialMobilityEval {
    fn side_score(board: &Board, color: Color) -> i32 {
        let material: i32 = MM_WEIGHTS
            .iter()
            .map(|&(kind, weight)| count(board, kind, color) * weight)
            .sum();
        material - PAWN_WEAKNESS_PENALTY * pawn_weaknesses(board, color) + MOBILITY_WEIGHT * mobility(board, color)
    }
}

impl Evaluator for MaterialMobilityEval {
    fn evaluate(&self, board: &Board, color: Color) -> i32 {
        Self::side_score(board, color) - Self::side_score(board, color.opposite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn test_start_position_is_balanced() {
        let b = board(START_FEN);
        for color in [Color::White, Color::Black] {
            assert_eq!(MaterialEval.evaluate(&b, color), 0);
            assert_eq!(MobilityEval.evaluate(&b, color), 0);
            assert_eq!(MaterialMobilityEval.evaluate(&b, color), 0);
        }
    }

    #[test]
    fn test_material_is_antisymmetric() {
        // white is a knight up
        let b = board("4k3/pppp4/8/8/8/8/PPPP4/1N2K3 w - - 0 1");
        assert_eq!(MaterialEval.evaluate(&b, Color::White), KNIGHT_VALUE);
        assert_eq!(MaterialEval.evaluate(&b, Color::Black), -KNIGHT_VALUE);
    }

    #[test]
    fn test_pawn_weaknesses() {
        // c3/c4 doubled and isolated, c3 blocked by c4; h2 isolated and blocked by the h3 knight
        let b = board("4k3/8/8/8/2P5/2P4n/7P/4K3 w - - 0 1");
        assert_eq!(pawn_weaknesses(&b, Color::White), 1 + 2 + 1 + 1 + 1);
    }

    #[test]
    fn test_closure_evaluator() {
        let b = board(START_FEN);
        let constant = |_: &Board, _: Color| 42;
        assert_eq!(constant.evaluate(&b, Color::White), 42);
    }
}

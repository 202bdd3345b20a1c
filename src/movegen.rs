//! Move generation, attack queries and terminal detection.
//!
//! Pseudo-legal moves follow piece movement rules only; `legal_moves` filters
//! them by applying each move, testing the mover's king and undoing it.

use crate::board::{Board, Color, Move, PieceKind, Undo};
use crate::error::{ChessError, IllegalReason, Result};
use crate::magic::{bishop_attacks, queen_attacks, rook_attacks};
use crate::utils::{
    king_attacks, knight_attacks, pawn_attacks, pop_lsb, test_bit, NOT_FILE_A, NOT_FILE_H, RANK_1, RANK_2,
    RANK_7, RANK_8,
};

// Squares that must be empty between king and rook, relative to e1/e8
const KING_SIDE_GAP: u64 = 0b0110_0000;
const QUEEN_SIDE_GAP: u64 = 0b0000_1110;

/// Why a position is drawn without being stalemate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    FiftyMoveRule,
    InsufficientMaterial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    /// The side to move is checkmated.
    Checkmate,
    Stalemate,
    Draw(DrawReason),
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

// Emit one move per target bit; promotion-rank targets expand to four moves
fn push_targets(out: &mut Vec<Move>, mut targets: u64, delta: i32, promo_rank: u64) {
    while let Some(to) = pop_lsb(&mut targets) {
        let from = (to as i32 - delta) as usize;
        if test_bit(promo_rank, to) {
            for kind in PieceKind::PROMOTIONS {
                out.push(Move::with_promotion(from, to, kind));
            }
        } else {
            out.push(Move::new(from, to));
        }
    }
}

impl Board {
    /// Attack set of a `kind` piece of `color` standing on `sq` with the current occupancy.
    #[inline]
    pub fn attacks_from(&self, kind: PieceKind, color: Color, sq: usize) -> u64 {
        let occ = self.occupied();
        match kind {
            PieceKind::Pawn => pawn_attacks(1u64 << sq, color),
            PieceKind::Knight => knight_attacks(sq),
            PieceKind::Bishop => bishop_attacks(sq, occ),
            PieceKind::Rook => rook_attacks(sq, occ),
            PieceKind::Queen => queen_attacks(sq, occ),
            PieceKind::King => king_attacks(sq),
        }
    }

    // Generate moves APIs -----------------------------------------
    pub fn generate_pseudo_moves(&self, color: Color) -> Vec<Move> {
        let mut out = Vec::with_capacity(64);
        self.pseudo_moves_into(color, &mut out);
        out
    }

    pub fn pseudo_moves_into(&self, color: Color, out: &mut Vec<Move>) {
        self.generate_pawn_pseudos(color, out);
        for kind in [
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ] {
            self.generate_piece_pseudos(color, kind, out);
        }
        self.generate_castling_moves(color, out);
    }

    fn generate_pawn_pseudos(&self, side: Color, out: &mut Vec<Move>) {
        let pawns = self.piece_bb(PieceKind::Pawn, side);
        let empty = !self.occupied();
        let enemy_occ = self.occupancy(side.opposite());

        match side {
            Color::White => {
                let single = (pawns << 8) & empty;
                let double = (((pawns & RANK_2) << 8) & empty) << 8 & empty;
                push_targets(out, single, 8, RANK_8);
                push_targets(out, double, 16, 0);
                push_targets(out, ((pawns & NOT_FILE_A) << 7) & enemy_occ, 7, RANK_8);
                push_targets(out, ((pawns & NOT_FILE_H) << 9) & enemy_occ, 9, RANK_8);
            }
            Color::Black => {
                let single = (pawns >> 8) & empty;
                let double = (((pawns & RANK_7) >> 8) & empty) >> 8 & empty;
                push_targets(out, single, -8, RANK_1);
                push_targets(out, double, -16, 0);
                push_targets(out, ((pawns & NOT_FILE_A) >> 9) & enemy_occ, -9, RANK_1);
                push_targets(out, ((pawns & NOT_FILE_H) >> 7) & enemy_occ, -7, RANK_1);
            }
        }

        // En passant: the ep square is empty, so it is handled apart from captures
        if let Some(ep_sq) = self.ep_square() {
            let expected_rank = match side {
                Color::White => 5,
                Color::Black => 2,
            };
            if ep_sq / 8 == expected_rank {
                // Our pawns that attack ep_sq sit where an enemy pawn on ep_sq would attack
                let mut attackers = pawn_attacks(1u64 << ep_sq, side.opposite()) & pawns;
                while let Some(from) = pop_lsb(&mut attackers) {
                    out.push(Move::new(from, ep_sq));
                }
            }
        }
    }

    fn generate_piece_pseudos(&self, side: Color, kind: PieceKind, out: &mut Vec<Move>) {
        let own = self.occupancy(side);
        let mut pieces = self.piece_bb(kind, side);
        while let Some(from) = pop_lsb(&mut pieces) {
            let mut targets = self.attacks_from(kind, side, from) & !own;
            while let Some(to) = pop_lsb(&mut targets) {
                out.push(Move::new(from, to));
            }
        }
    }

    fn generate_castling_moves(&self, side: Color, out: &mut Vec<Move>) {
        let rights = self.castling();
        if !rights.king_side(side) && !rights.queen_side(side) {
            return;
        }
        let home = match side {
            Color::White => 4,
            Color::Black => 60,
        };
        // Il re deve essere sulla casa iniziale e non sotto scacco
        if !test_bit(self.piece_bb(PieceKind::King, side), home) || self.is_square_attacked(side, home) {
            return;
        }
        let rank_shift = home - 4;
        let occ = self.occupied();
        let rooks = self.piece_bb(PieceKind::Rook, side);

        if rights.king_side(side)
            && test_bit(rooks, home + 3)
            && occ & (KING_SIDE_GAP << rank_shift) == 0
            && !self.is_square_attacked(side, home + 1)
            && !self.is_square_attacked(side, home + 2)
        {
            out.push(Move::new(home, home + 2));
        }
        if rights.queen_side(side)
            && test_bit(rooks, home - 4)
            && occ & (QUEEN_SIDE_GAP << rank_shift) == 0
            && !self.is_square_attacked(side, home - 1)
            && !self.is_square_attacked(side, home - 2)
        {
            out.push(Move::new(home, home - 2));
        }
    }

    // Legality helpers -------------------------------------------

    /// Whether `sq` is attacked by any piece of the side opposing `color`.
    pub fn is_square_attacked(&self, color: Color, sq: usize) -> bool {
        let them = color.opposite();
        let occ = self.occupied();
        let queens = self.piece_bb(PieceKind::Queen, them);

        pawn_attacks(1u64 << sq, color) & self.piece_bb(PieceKind::Pawn, them) != 0
            || knight_attacks(sq) & self.piece_bb(PieceKind::Knight, them) != 0
            || king_attacks(sq) & self.piece_bb(PieceKind::King, them) != 0
            || bishop_attacks(sq, occ) & (self.piece_bb(PieceKind::Bishop, them) | queens) != 0
            || rook_attacks(sq, occ) & (self.piece_bb(PieceKind::Rook, them) | queens) != 0
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_sq(color)
            .is_some_and(|king| self.is_square_attacked(color, king))
    }

    /// Legal moves for `color`: pseudo-legal moves that do not leave its king attacked.
    pub fn legal_moves(&mut self, color: Color) -> Vec<Move> {
        let pseudo = self.generate_pseudo_moves(color);
        let mut legal = Vec::with_capacity(pseudo.len());
        for mv in pseudo {
            let Ok(undo) = self.make_move(mv) else {
                continue;
            };
            if !self.is_in_check(color) {
                legal.push(mv);
            }
            self.unmake_move(undo);
        }
        legal
    }

    /// Legal moves for the side to move.
    pub fn generate_moves(&mut self) -> Vec<Move> {
        self.legal_moves(self.side_to_move())
    }

    /// Apply `mv` only if it is legal for the side to move.
    pub fn play_legal(&mut self, mv: Move) -> Result<Undo> {
        if !self.generate_moves().contains(&mv) {
            return Err(ChessError::IllegalMove {
                mv,
                reason: IllegalReason::NotLegal,
            });
        }
        self.make_move(mv)
    }

    /// Parse UCI move text and match it against the legal moves of the side to move.
    pub fn parse_uci_move(&mut self, text: &str) -> Result<Move> {
        let mv = Move::from_uci(text)?;
        if self.generate_moves().contains(&mv) {
            Ok(mv)
        } else {
            Err(ChessError::IllegalMove {
                mv,
                reason: IllegalReason::NotLegal,
            })
        }
    }

    // Draw and terminal detection --------------------------------

    /// Neither side can mate: each has a bare king or a king with one minor piece.
    pub fn has_insufficient_material(&self) -> bool {
        [Color::White, Color::Black].into_iter().all(|color| {
            let heavy = self.piece_bb(PieceKind::Pawn, color)
                | self.piece_bb(PieceKind::Rook, color)
                | self.piece_bb(PieceKind::Queen, color);
            let minors = self.piece_bb(PieceKind::Knight, color) | self.piece_bb(PieceKind::Bishop, color);
            heavy == 0 && minors.count_ones() <= 1
        })
    }

    pub fn is_draw(&self) -> bool {
        self.halfmove_clock() >= 100 || self.has_insufficient_material()
    }

    pub fn status(&mut self) -> GameStatus {
        let side = self.side_to_move();
        if self.legal_moves(side).is_empty() {
            return if self.is_in_check(side) {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            };
        }
        if self.halfmove_clock() >= 100 {
            GameStatus::Draw(DrawReason::FiftyMoveRule)
        } else if self.has_insufficient_material() {
            GameStatus::Draw(DrawReason::InsufficientMaterial)
        } else {
            GameStatus::Ongoing
        }
    }

    pub fn is_checkmate(&mut self) -> bool {
        self.status() == GameStatus::Checkmate
    }

    pub fn is_stalemate(&mut self) -> bool {
        self.status() == GameStatus::Stalemate
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
    fn test_start_position_counts() {
        let mut b = board(START_FEN);
        assert_eq!(b.generate_pseudo_moves(Color::White).len(), 20);
        assert_eq!(b.generate_moves().len(), 20);
        assert_eq!(b.legal_moves(Color::Black).len(), 20);
    }

    #[test]
    fn test_pawn_attacks_square() {
        let b = board("4k3/8/8/8/3p4/8/8/4K3 w - - 0 1");
        // black pawn on d4 attacks c3 and e3
        assert!(b.is_square_attacked(Color::White, 18));
        assert!(b.is_square_attacked(Color::White, 20));
        assert!(!b.is_square_attacked(Color::White, 19));
    }

    #[test]
    fn test_slider_attack_blocked() {
        let b = board("4k3/8/8/8/r2P3K/8/8/8 w - - 0 1");
        // rook a4 blocked by d4 pawn, h4 king safe
        assert!(!b.is_in_check(Color::White));
        assert!(b.is_square_attacked(Color::White, 27));
    }

    #[test]
    fn test_castling_both_wings() {
        let mut b = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let moves = b.generate_moves();
        assert!(moves.contains(&Move::new(4, 6)));
        assert!(moves.contains(&Move::new(4, 2)));
    }

    #[test]
    fn test_no_castling_through_attacked_square() {
        // black rook on f8 covers f1
        let mut b = board("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = b.generate_moves();
        assert!(!moves.contains(&Move::new(4, 6)));
        assert!(moves.contains(&Move::new(4, 2)));
    }

    #[test]
    fn test_no_castling_out_of_check() {
        let mut b = board("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1");
        let moves = b.generate_moves();
        assert!(!moves.contains(&Move::new(4, 6)));
        assert!(!moves.contains(&Move::new(4, 2)));
    }

    #[test]
    fn test_queen_side_needs_b_file_empty() {
        // b1 occupied blocks O-O-O even though the king never crosses it
        let mut b = board("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1");
        assert!(!b.generate_moves().contains(&Move::new(4, 2)));
    }

    #[test]
    fn test_en_passant_generated() {
        let mut b = board("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        assert!(b.generate_moves().contains(&Move::new(36, 43)));
    }

    #[test]
    fn test_en_passant_discovered_check_is_illegal() {
        // capturing exd6 would open the fifth rank to the rook
        let mut b = board("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1");
        assert!(!b.generate_moves().contains(&Move::new(36, 43)));
    }

    #[test]
    fn test_promotions_expand_to_four() {
        let mut b = board("8/P6k/8/8/8/8/8/K7 w - - 0 1");
        let promos: Vec<_> = b.generate_moves().into_iter().filter(|m| m.promotion().is_some()).collect();
        assert_eq!(promos.len(), 4);
    }

    #[test]
    fn test_checkmate_and_stalemate() {
        // back rank mate
        let mut mate = board("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert_eq!(mate.status(), GameStatus::Checkmate);
        assert!(mate.is_checkmate());

        let mut stale = board("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(stale.status(), GameStatus::Stalemate);
        assert!(stale.is_stalemate());
    }

    #[test]
    fn test_draw_detection() {
        let mut bare = board("8/8/4k3/8/8/3K4/8/8 w - - 0 1");
        assert_eq!(bare.status(), GameStatus::Draw(DrawReason::InsufficientMaterial));

        let mut minors = board("8/8/4k3/4n3/8/3KB3/8/8 w - - 0 1");
        assert!(minors.has_insufficient_material());
        assert!(minors.status().is_terminal());

        let two_knights = board("8/8/4k3/8/8/3KNN2/8/8 w - - 0 1");
        assert!(!two_knights.has_insufficient_material());

        let mut fifty = board("8/8/4k3/8/8/3K4/7R/8 w - - 100 80");
        assert_eq!(fifty.status(), GameStatus::Draw(DrawReason::FiftyMoveRule));
    }

    #[test]
    fn test_play_legal_rejects_pinned_piece() {
        // knight on e2 is pinned by the e8 rook
        let mut b = board("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        let mv = Move::new(12, 29);
        assert!(matches!(
            b.play_legal(mv),
            Err(ChessError::IllegalMove {
                reason: IllegalReason::NotLegal,
                ..
            })
        ));
        assert_eq!(b.parse_uci_move("e1d1").unwrap(), Move::new(4, 3));
        assert!(b.parse_uci_move("e2f4").is_err());
    }
}

// Bitboard masks, bit primitives and leaper attack tables

use crate::board::Color;
use std::sync::OnceLock;

// File masks (A is column 0, H column 7)
pub const FILE_A: u64 = 0x0101010101010101;
pub const FILE_B: u64 = 0x0202020202020202;
pub const FILE_G: u64 = 0x4040404040404040;
pub const FILE_H: u64 = 0x8080808080808080;

pub const NOT_FILE_A: u64 = !FILE_A;
pub const NOT_FILE_H: u64 = !FILE_H;
pub const NOT_FILE_AB: u64 = !(FILE_A | FILE_B);
pub const NOT_FILE_GH: u64 = !(FILE_G | FILE_H);

// Rank masks (A1 is square 0)
pub const RANK_1: u64 = 0x00000000000000FF;
pub const RANK_2: u64 = 0x000000000000FF00;
pub const RANK_7: u64 = 0x00FF000000000000;
pub const RANK_8: u64 = 0xFF00000000000000;

// Bit operations
#[inline]
pub fn set_bit(bb: u64, sq: usize) -> u64 {
    bb | (1u64 << sq)
}
#[inline]
pub fn clear_bit(bb: u64, sq: usize) -> u64 {
    bb & !(1u64 << sq)
}
#[inline]
pub fn test_bit(bb: u64, sq: usize) -> bool {
    bb & (1u64 << sq) != 0
}
#[inline]
pub fn pop_lsb(bb: &mut u64) -> Option<usize> {
    if *bb == 0 {
        return None;
    }
    let lsb = bb.trailing_zeros() as usize;
    *bb &= *bb - 1;
    Some(lsb)
}
#[inline]
pub fn lsb_index(bb: u64) -> Option<usize> {
    if bb == 0 {
        None
    } else {
        Some(bb.trailing_zeros() as usize)
    }
}
#[inline]
pub fn count_bits(bb: u64) -> u32 {
    bb.count_ones()
}
pub struct BitIter {
    bb: u64,
}
impl Iterator for BitIter {
    type Item = usize;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        pop_lsb(&mut self.bb)
    }
}
#[inline]
pub fn iter_bits(bb: u64) -> BitIter {
    BitIter { bb }
}

/// Squares attacked by every pawn in `pawns` moving as `color`.
#[inline]
pub fn pawn_attacks(pawns: u64, color: Color) -> u64 {
    match color {
        Color::White => ((pawns & NOT_FILE_A) << 7) | ((pawns & NOT_FILE_H) << 9),
        Color::Black => ((pawns & NOT_FILE_A) >> 9) | ((pawns & NOT_FILE_H) >> 7),
    }
}

// Precomputed leaper tables, built once and shared read-only
static KNIGHT_ATTACKS: OnceLock<[u64; 64]> = OnceLock::new();
static KING_ATTACKS: OnceLock<[u64; 64]> = OnceLock::new();

fn knight_mask(bb: u64) -> u64 {
    ((bb << 17) & NOT_FILE_A)
        | ((bb << 15) & NOT_FILE_H)
        | ((bb << 10) & NOT_FILE_AB)
        | ((bb << 6) & NOT_FILE_GH)
        | ((bb >> 17) & NOT_FILE_H)
        | ((bb >> 15) & NOT_FILE_A)
        | ((bb >> 10) & NOT_FILE_GH)
        | ((bb >> 6) & NOT_FILE_AB)
}

fn king_mask(bb: u64) -> u64 {
    let sides = ((bb << 1) & NOT_FILE_A) | ((bb >> 1) & NOT_FILE_H);
    let row = bb | sides;
    sides | (row << 8) | (row >> 8)
}

fn init_knight_attacks() -> [u64; 64] {
    let mut attacks = [0u64; 64];
    for (sq, slot) in attacks.iter_mut().enumerate() {
        *slot = knight_mask(1u64 << sq);
    }
    attacks
}

fn init_king_attacks() -> [u64; 64] {
    let mut attacks = [0u64; 64];
    for (sq, slot) in attacks.iter_mut().enumerate() {
        *slot = king_mask(1u64 << sq);
    }
    attacks
}

#[inline(always)]
pub fn init_attack_tables() {
    KNIGHT_ATTACKS.get_or_init(init_knight_attacks);
    KING_ATTACKS.get_or_init(init_king_attacks);
}

#[inline]
pub fn knight_attacks(sq: usize) -> u64 {
    KNIGHT_ATTACKS.get_or_init(init_knight_attacks)[sq]
}

#[inline]
pub fn king_attacks(sq: usize) -> u64 {
    KING_ATTACKS.get_or_init(init_king_attacks)[sq]
}

/// Parse algebraic square text like "e4" into 0..63.
pub fn parse_square(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some((rank - b'1') as usize * 8 + (file - b'a') as usize)
}

/// Algebraic name of a square ("a1" for 0, "h8" for 63).
pub fn square_name(sq: usize) -> String {
    let file = (b'a' + (sq % 8) as u8) as char;
    let rank = (b'1' + (sq / 8) as u8) as char;
    format!("{}{}", file, rank)
}

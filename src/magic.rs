//! Magic bitboards for O(1) sliding piece attack generation
//!
//! For every square the relevant blockers of a rook or bishop (its rays minus
//! the board edge) are hashed with a multiplier into a dense attack table:
//! `index = ((occ & mask) * magic) >> shift`. The multipliers are not
//! hardcoded; they are searched at start-up with a seeded generator and only
//! accepted once every blocker subset of the mask resolves to its ray-cast
//! attack set.

use crate::utils::count_bits;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;

/// Seed for the magic multiplier search. Any seed yields equivalent tables.
const MAGIC_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Sliding piece family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Rook,
    Bishop,
}

impl Slider {
    fn directions(self) -> &'static [(i8, i8); 4] {
        match self {
            Slider::Rook => &[(0, 1), (0, -1), (1, 0), (-1, 0)],
            Slider::Bishop => &[(1, 1), (1, -1), (-1, 1), (-1, -1)],
        }
    }
}

// ============================================================================
// TABLES
// ============================================================================

/// Magic entry for a single square
#[derive(Clone, Copy, Default)]
struct MagicEntry {
    mask: u64,     // Relevant occupancy mask (excludes edges)
    magic: u64,    // Multiplier found by search
    shift: u8,     // 64 - popcount(mask)
    offset: usize, // Offset into the family's attack vector
}

impl MagicEntry {
    #[inline(always)]
    fn index(&self, occ: u64) -> usize {
        self.offset + ((occ & self.mask).wrapping_mul(self.magic) >> self.shift) as usize
    }
}

struct MagicTables {
    rook_entries: [MagicEntry; 64],
    bishop_entries: [MagicEntry; 64],
    rook_attacks: Vec<u64>,
    bishop_attacks: Vec<u64>,
}

static MAGIC_TABLES: OnceLock<MagicTables> = OnceLock::new();

#[inline(always)]
fn tables() -> &'static MagicTables {
    MAGIC_TABLES.get_or_init(init_magic_tables)
}

// ============================================================================
// MASKS AND REFERENCE ATTACKS
// ============================================================================

/// Squares whose occupancy can change the attack set of a slider on `sq`.
/// The last square of each ray is dropped: a piece there never hides anything.
pub fn relevant_mask(slider: Slider, sq: usize) -> u64 {
    let (rank, file) = ((sq / 8) as i8, (sq % 8) as i8);
    let mut mask = 0u64;
    for &(dr, df) in slider.directions() {
        let (mut r, mut f) = (rank + dr, file + df);
        while (0..8).contains(&(r + dr)) && (0..8).contains(&(f + df)) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Ray-cast attack set: walk each ray until the first blocker (included) or the edge.
pub fn ray_attacks(slider: Slider, sq: usize, occ: u64) -> u64 {
    let (rank, file) = ((sq / 8) as i8, (sq % 8) as i8);
    let mut attacks = 0u64;
    for &(dr, df) in slider.directions() {
        let (mut r, mut f) = (rank + dr, file + df);
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if occ & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Every subset of `mask`, starting from the empty set (carry-rippler walk).
pub fn blocker_subsets(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1 << count_bits(mask));
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

// ============================================================================
// MAGIC SEARCH
// ============================================================================

/// Search a multiplier for one square. Returns the multiplier, its filled
/// table and the number of candidates tried.
///
/// Two blocker sets may land on the same slot only if they produce the same
/// attack set, so the resulting mapping is exact.
fn find_magic(mask: u64, subsets: &[u64], attacks: &[u64], rng: &mut SmallRng) -> (u64, Vec<u64>, u64) {
    let bits = count_bits(mask);
    let shift = 64 - bits;
    let size = 1usize << bits;
    let mut table = vec![0u64; size];
    // Stamp of the attempt that last wrote each slot, avoids clearing the table
    let mut stamp = vec![0u64; size];
    let mut attempt = 0u64;

    loop {
        attempt += 1;
        let magic = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        // Candidates that spread too few mask bits into the high byte rarely work
        if count_bits(mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000) < 6 {
            continue;
        }

        let mut ok = true;
        for (&occ, &attack) in subsets.iter().zip(attacks) {
            let idx = (occ.wrapping_mul(magic) >> shift) as usize;
            if stamp[idx] != attempt {
                stamp[idx] = attempt;
                table[idx] = attack;
            } else if table[idx] != attack {
                ok = false;
                break;
            }
        }
        if ok {
            return (magic, table, attempt);
        }
    }
}

fn build_family(slider: Slider, rng: &mut SmallRng) -> ([MagicEntry; 64], Vec<u64>) {
    let mut entries = [MagicEntry::default(); 64];
    let mut attacks_table = Vec::new();
    let mut total_attempts = 0u64;

    for (sq, entry) in entries.iter_mut().enumerate() {
        let mask = relevant_mask(slider, sq);
        let subsets = blocker_subsets(mask);
        let attacks: Vec<u64> = subsets.iter().map(|&occ| ray_attacks(slider, sq, occ)).collect();
        let (magic, table, attempts) = find_magic(mask, &subsets, &attacks, rng);
        total_attempts += attempts;

        *entry = MagicEntry {
            mask,
            magic,
            shift: (64 - count_bits(mask)) as u8,
            offset: attacks_table.len(),
        };
        attacks_table.extend_from_slice(&table);
    }

    debug!(
        "{:?} magic tables built: {} slots, {} candidates tried",
        slider,
        attacks_table.len(),
        total_attempts
    );
    (entries, attacks_table)
}

fn init_magic_tables() -> MagicTables {
    let mut rng = SmallRng::seed_from_u64(MAGIC_SEED);
    let (rook_entries, rook_attacks) = build_family(Slider::Rook, &mut rng);
    let (bishop_entries, bishop_attacks) = build_family(Slider::Bishop, &mut rng);
    MagicTables {
        rook_entries,
        bishop_entries,
        rook_attacks,
        bishop_attacks,
    }
}

/// Build the magic tables now instead of on first lookup.
#[inline(always)]
pub fn init() {
    tables();
}

// ============================================================================
// PUBLIC API
// ============================================================================

#[inline]
pub fn rook_attacks(sq: usize, occ: u64) -> u64 {
    let t = tables();
    t.rook_attacks[t.rook_entries[sq].index(occ)]
}

#[inline]
pub fn bishop_attacks(sq: usize, occ: u64) -> u64 {
    let t = tables();
    t.bishop_attacks[t.bishop_entries[sq].index(occ)]
}

/// Queen attacks (bishop + rook)
#[inline]
pub fn queen_attacks(sq: usize, occ: u64) -> u64 {
    rook_attacks(sq, occ) | bishop_attacks(sq, occ)
}

#[inline]
pub fn slider_attacks(slider: Slider, sq: usize, occ: u64) -> u64 {
    match slider {
        Slider::Rook => rook_attacks(sq, occ),
        Slider::Bishop => bishop_attacks(sq, occ),
    }
}

/// Check every square and blocker subset against ray casting.
/// Returns the first (slider, square, occupancy) that disagrees.
pub fn find_table_mismatch() -> Option<(Slider, usize, u64)> {
    for slider in [Slider::Rook, Slider::Bishop] {
        for sq in 0..64 {
            let mask = relevant_mask(slider, sq);
            for occ in blocker_subsets(mask) {
                if slider_attacks(slider, sq, occ) != ray_attacks(slider, sq, occ) {
                    return Some((slider, sq, occ));
                }
            }
        }
    }
    None
}

/// Table size of one family, summed over all squares.
pub fn table_len(slider: Slider) -> usize {
    match slider {
        Slider::Rook => tables().rook_attacks.len(),
        Slider::Bishop => tables().bishop_attacks.len(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_sizes() {
        // a1 rook: 6 + 6 relevant squares, d4 rook: 10
        assert_eq!(count_bits(relevant_mask(Slider::Rook, 0)), 12);
        assert_eq!(count_bits(relevant_mask(Slider::Rook, 27)), 10);
        // bishop a1 = 6, d4 = 9
        assert_eq!(count_bits(relevant_mask(Slider::Bishop, 0)), 6);
        assert_eq!(count_bits(relevant_mask(Slider::Bishop, 27)), 9);
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(table_len(Slider::Rook), 102_400);
        assert_eq!(table_len(Slider::Bishop), 5_248);
    }

    #[test]
    fn test_subset_enumeration() {
        let subsets = blocker_subsets(0b1011);
        assert_eq!(subsets.len(), 8);
        assert!(subsets.iter().all(|s| s & !0b1011 == 0));
    }

    #[test]
    fn test_rook_attacks_corner() {
        // Rook on a1, empty board: a2-a8 and b1-h1
        assert_eq!(rook_attacks(0, 0).count_ones(), 14);
    }

    #[test]
    fn test_rook_attacks_with_blocker() {
        // Rook on a1, blocker on a4: a2, a3, a4 (stopped) + b1-h1
        let blocker = 1u64 << 24;
        assert_eq!(rook_attacks(0, blocker).count_ones(), 10);
    }

    #[test]
    fn test_bishop_attacks_center() {
        assert_eq!(bishop_attacks(27, 0).count_ones(), 13);
    }

    #[test]
    fn test_irrelevant_occupancy_is_ignored() {
        // A piece on h8 (edge) never changes d4's bishop attacks
        assert_eq!(bishop_attacks(27, 1u64 << 63), bishop_attacks(27, 0));
    }

    #[test]
    fn test_queen_attacks() {
        let occ = (1u64 << 35) | (1u64 << 29);
        assert_eq!(queen_attacks(27, occ), rook_attacks(27, occ) | bishop_attacks(27, occ));
    }
}

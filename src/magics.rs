//! Magic bitboard generation for sliding pieces.
//!
//! This module generates and stores all data required to compute rook and bishop
//! attacks in O(1) time using magic bitboards. At startup, it:
//!
//! - Computes relevant occupancy masks for each square
//! - Enumerates all possible blocker configurations
//! - Searches for collision-free magic multipliers
//! - Builds flat attack tables indexed via magic hashing
//!
//! Once initialized, attack lookup requires only:
//!     - masking the occupancy
//!     - a 64-bit multiplication
//!     - a shift
//!     - a table lookup
//!
//! The generated tables are read-only after initialization and contain no runtime
//! branches, locks, or collision checks.

use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::bitboard::Bitboard;

const ROOK_DELTAS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_DELTAS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Total number of rook magic attack entries: Σ over sq=0..63 of 2^(relevant rook bits on sq).
/// Central squares have up to 12 relevant bits, edge squares fewer. Exact total is 102,400.
const ROOK_MAP_SIZE: usize = 102400;
/// Total number of bishop magic attack entries, same derivation. Exact total is 5,248.
const BISHOP_MAP_SIZE: usize = 5248;

/// Precomputed magic bitboard data for sliding piece attack generation.
///
/// All tables are generated once at startup and are read-only thereafter.
pub struct MagicTables {
    pub rook_masks: [Bitboard; 64],
    pub bishop_masks: [Bitboard; 64],

    pub rook_magics: [u64; 64],
    pub bishop_magics: [u64; 64],

    pub rook_attacks: [Bitboard; ROOK_MAP_SIZE],
    pub bishop_attacks: [Bitboard; BISHOP_MAP_SIZE],
    pub rook_offsets: [usize; 64],
    pub bishop_offsets: [usize; 64],
}

impl MagicTables {
    pub fn new() -> Self {
        Self {
            rook_masks: [Bitboard::default(); 64],
            bishop_masks: [Bitboard::default(); 64],
            rook_magics: [0; 64],
            bishop_magics: [0; 64],
            rook_attacks: [Bitboard::default(); ROOK_MAP_SIZE],
            bishop_attacks: [Bitboard::default(); BISHOP_MAP_SIZE],
            rook_offsets: [0; 64],
            bishop_offsets: [0; 64],
        }
    }

    /// Generates magic numbers and populates flat attack tables for rooks and bishops.
    ///
    /// For each square: enumerates all relevant occupancies, searches for a
    /// collision-free magic number, and stores the magic, offset, and corresponding
    /// attack table entries. Intended to run once at startup.
    pub fn generate_magics(&mut self) {
        self.init_relevant_occupancy_masks();

        let rook_attacks = self.generate_all_rook_attacks();
        let bishop_attacks = self.generate_all_bishop_attacks();

        let mut rook_offset = 0usize;
        let mut bishop_offset = 0usize;

        let mut rng = SmallRng::seed_from_u64(0xD10FAu64);

        for sq in 0..64 {
            let mask = self.rook_masks[sq];
            let relevant_bits = mask.0.count_ones() as usize;
            let table_size = 1 << relevant_bits;

            let occupancies = Self::enumerate_occupancies(mask);
            let attacks = &rook_attacks[sq];

            let shift = 64 - relevant_bits;

            'search: for _attempt in 0..10_000_000 {
                let magic = Self::sparse_random(&mut rng);

                // Quick entropy rejection (Stockfish's approach): if the high byte of
                // mask*magic is mostly zero, the candidate is far more likely to collide.
                if (mask.0.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 6 {
                    continue;
                }

                let mut used = vec![None; table_size];

                for i in 0..occupancies.len() {
                    let occ = occupancies[i].0;
                    let index = ((occ & mask.0).wrapping_mul(magic) >> shift) as usize;

                    match used[index] {
                        None => used[index] = Some(attacks[i]),
                        Some(existing) if existing == attacks[i] => {}
                        _ => continue 'search,
                    }
                }

                self.rook_magics[sq] = magic;
                self.rook_offsets[sq] = rook_offset;

                for i in 0..table_size {
                    self.rook_attacks[rook_offset + i] = used[i].unwrap_or_default();
                }

                rook_offset += table_size;
                break;
            }
        }

        for sq in 0..64 {
            let mask = self.bishop_masks[sq];
            let relevant_bits = mask.0.count_ones() as usize;
            let table_size = 1 << relevant_bits;

            let occupancies = Self::enumerate_occupancies(mask);
            let attacks = &bishop_attacks[sq];

            let shift = 64 - relevant_bits;

            'search: for _attempt in 0..10_000_000 {
                let magic = Self::sparse_random(&mut rng);

                if (mask.0.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 6 {
                    continue;
                }

                let mut used = vec![None; table_size];

                for i in 0..occupancies.len() {
                    let occ = occupancies[i].0;
                    let index = ((occ & mask.0).wrapping_mul(magic) >> shift) as usize;

                    match used[index] {
                        None => used[index] = Some(attacks[i]),
                        Some(existing) if existing == attacks[i] => {}
                        _ => continue 'search,
                    }
                }

                self.bishop_magics[sq] = magic;
                self.bishop_offsets[sq] = bishop_offset;

                for i in 0..table_size {
                    self.bishop_attacks[bishop_offset + i] = used[i].unwrap_or_default();
                }

                bishop_offset += table_size;
                break;
            }
        }

        debug_assert_eq!(rook_offset, ROOK_MAP_SIZE);
        debug_assert_eq!(bishop_offset, BISHOP_MAP_SIZE);
    }

    /// Looks up the rook attack set for `sq` given the current `occupancy`.
    #[inline(always)]
    pub fn rook_attacks(&self, sq: u8, occupancy: Bitboard) -> Bitboard {
        let mask = self.rook_masks[sq as usize];
        let relevant_bits = mask.0.count_ones();
        let shift = 64 - relevant_bits;
        let index = ((occupancy.0 & mask.0).wrapping_mul(self.rook_magics[sq as usize]) >> shift) as usize;
        self.rook_attacks[self.rook_offsets[sq as usize] + index]
    }

    /// Looks up the bishop attack set for `sq` given the current `occupancy`.
    #[inline(always)]
    pub fn bishop_attacks(&self, sq: u8, occupancy: Bitboard) -> Bitboard {
        let mask = self.bishop_masks[sq as usize];
        let relevant_bits = mask.0.count_ones();
        let shift = 64 - relevant_bits;
        let index = ((occupancy.0 & mask.0).wrapping_mul(self.bishop_magics[sq as usize]) >> shift) as usize;
        self.bishop_attacks[self.bishop_offsets[sq as usize] + index]
    }

    /// Looks up the queen attack set (rook | bishop) for `sq`.
    #[inline(always)]
    pub fn queen_attacks(&self, sq: u8, occupancy: Bitboard) -> Bitboard {
        self.rook_attacks(sq, occupancy) | self.bishop_attacks(sq, occupancy)
    }

    /// Generates a candidate magic number with sparse bits set, inspired by
    /// Stockfish's sparse_rand. Sparse numbers reduce collisions in magic bitboards.
    #[inline(always)]
    fn sparse_random(seed: &mut SmallRng) -> u64 {
        let mut r = 0u64;
        for _ in 0..3 {
            r |= seed.next_u64() & seed.next_u64() & seed.next_u64();
        }
        r
    }

    fn init_relevant_occupancy_masks(&mut self) {
        for sq in 0u8..64 {
            self.rook_masks[sq as usize] = Self::relevant_occupancy_mask(sq, &ROOK_DELTAS);
            self.bishop_masks[sq as usize] = Self::relevant_occupancy_mask(sq, &BISHOP_DELTAS);
        }
    }

    // Generic relevant occupancy mask generator for sliding pieces. Excludes the
    // board edge (rank/file 0 or 7) since a blocker there never changes the attack set.
    #[inline(always)]
    fn relevant_occupancy_mask(square: u8, deltas: &[(i8, i8)]) -> Bitboard {
        let mut mask = Bitboard::default();
        let from_rank = (square / 8) as i8;
        let from_file = (square % 8) as i8;

        for &(delta_rank, delta_file) in deltas {
            let mut to_rank = from_rank + delta_rank;
            let mut to_file = from_file + delta_file;

            while (1..=6).contains(&to_rank) && (1..=6).contains(&to_file) {
                mask |= Bitboard::from_square((to_rank * 8 + to_file) as u8);
                to_rank += delta_rank;
                to_file += delta_file;
            }
        }
        mask
    }

    fn generate_all_rook_attacks(&self) -> Vec<Vec<Bitboard>> {
        (0u8..64).map(|sq| Self::attacks_for_square(sq, &ROOK_DELTAS)).collect()
    }

    fn generate_all_bishop_attacks(&self) -> Vec<Vec<Bitboard>> {
        (0u8..64).map(|sq| Self::attacks_for_square(sq, &BISHOP_DELTAS)).collect()
    }

    fn attacks_for_square(square: u8, deltas: &[(i8, i8)]) -> Vec<Bitboard> {
        let mask = Self::relevant_occupancy_mask(square, deltas);
        let occupancies = Self::enumerate_occupancies(mask);
        occupancies.iter().map(|occ| Self::sliding_attack(square, deltas, *occ)).collect()
    }

    /// Enumerates all possible occupancies for a given relevant mask.
    fn enumerate_occupancies(mask: Bitboard) -> Vec<Bitboard> {
        let num_relevant_bits = mask.0.count_ones() as usize;
        let mut occupancies = Vec::with_capacity(1 << num_relevant_bits);

        let mut relevant_square_indices = Vec::with_capacity(num_relevant_bits);
        for square in 0u8..64 {
            if mask.test(square) {
                relevant_square_indices.push(square);
            }
        }

        for subset in 0u32..(1 << num_relevant_bits) {
            let mut occ = 0u64;
            for (i, &square) in relevant_square_indices.iter().enumerate() {
                if subset & (1 << i) != 0 {
                    occ |= 1u64 << square;
                }
            }
            occupancies.push(Bitboard(occ));
        }
        occupancies
    }

    fn sliding_attack(square: u8, deltas: &[(i8, i8)], occupancy: Bitboard) -> Bitboard {
        let mut attacks = Bitboard::default();
        let from_rank = (square / 8) as i8;
        let from_file = (square % 8) as i8;

        for &(delta_rank, delta_file) in deltas {
            let mut to_rank = from_rank + delta_rank;
            let mut to_file = from_file + delta_file;

            while to_rank >= 0 && to_rank < 8 && to_file >= 0 && to_file < 8 {
                let sq = (to_rank * 8 + to_file) as u8;
                attacks |= Bitboard::from_square(sq);
                if occupancy.test(sq) {
                    break;
                }
                to_rank += delta_rank;
                to_file += delta_file;
            }
        }
        attacks
    }

    pub fn print(&self) {
        println!("=== Rook Magics ===");
        for sq in 0..64 {
            let mask = self.rook_masks[sq];
            let magic = self.rook_magics[sq];
            let offset = self.rook_offsets[sq];
            let num_bits = mask.0.count_ones();
            println!(
                "Square {:2}: Magic = 0x{:016X}, Offset = {:5}, Mask bits = {:2}, Mask = 0x{:016X}",
                sq, magic, offset, num_bits, mask.0
            );
        }

        println!("\n=== Bishop Magics ===");
        for sq in 0..64 {
            let mask = self.bishop_masks[sq];
            let magic = self.bishop_magics[sq];
            let offset = self.bishop_offsets[sq];
            let num_bits = mask.0.count_ones();
            println!(
                "Square {:2}: Magic = 0x{:016X}, Offset = {:5}, Mask bits = {:2}, Mask = 0x{:016X}",
                sq, magic, offset, num_bits, mask.0
            );
        }
    }
}

impl Default for MagicTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn central_rook_mask_has_ten_relevant_bits() {
        // d4-equivalent square under a8=0 numbering: sq = 4*8+3 = 35.
        let mask = MagicTables::relevant_occupancy_mask(35, &ROOK_DELTAS);
        assert_eq!(mask.popcnt(), 10);
    }

    #[test]
    fn corner_rook_mask_has_twelve_relevant_bits() {
        let mask = MagicTables::relevant_occupancy_mask(0, &ROOK_DELTAS);
        assert_eq!(mask.popcnt(), 12);
    }

    #[test]
    fn sliding_attack_stops_at_blocker() {
        // Rook on a8 (sq 0), blocker on a5 (sq 24): attack set should include a5
        // but not squares past it.
        let occ = Bitboard::from_square(24);
        let attacks = MagicTables::sliding_attack(0, &ROOK_DELTAS, occ);
        assert!(attacks.test(24));
        assert!(!attacks.test(32));
    }

    #[test]
    fn generated_magics_reproduce_classical_attacks() {
        let mut tables = MagicTables::new();
        tables.generate_magics();

        let occ = Bitboard::from_square(24) | Bitboard::from_square(3);
        let expected = MagicTables::sliding_attack(0, &ROOK_DELTAS, occ);
        assert_eq!(tables.rook_attacks(0, occ), expected);

        let bocc = Bitboard::from_square(18);
        let expected_b = MagicTables::sliding_attack(0, &BISHOP_DELTAS, bocc);
        assert_eq!(tables.bishop_attacks(0, bocc), expected_b);
    }
}

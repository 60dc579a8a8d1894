// Bitboard masks, iterators and ray helpers for attack and move generation

// File masks (A is column 0, H column 7)
pub const FILE_A: u64 = 0x0101010101010101;
pub const FILE_H: u64 = 0x8080808080808080;

pub const NOT_FILE_A: u64 = !FILE_A;
pub const NOT_FILE_H: u64 = !FILE_H;

// Rank masks (A1 is square 0)
pub const RANK_1: u64 = 0x00000000000000FF;
pub const RANK_2: u64 = 0x000000000000FF00;
pub const RANK_3: u64 = 0x0000000000FF0000;
pub const RANK_6: u64 = 0x0000FF0000000000;
pub const RANK_7: u64 = 0x00FF000000000000;
pub const RANK_8: u64 = 0xFF00000000000000;

// Direction deltas for sliding pieces
pub const NORTH: i8 = 8;
pub const SOUTH: i8 = -8;
pub const EAST: i8 = 1;
pub const WEST: i8 = -1;
pub const NORTH_EAST: i8 = 9;
pub const NORTH_WEST: i8 = 7;
pub const SOUTH_EAST: i8 = -7;
pub const SOUTH_WEST: i8 = -9;

pub const STRAIGHT_DIRECTIONS: [i8; 4] = [NORTH, SOUTH, EAST, WEST];
pub const DIAGONAL_DIRECTIONS: [i8; 4] = [NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST];

// Bit operations
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
pub fn square_mask(sq: usize) -> u64 {
    1u64 << sq
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

/// Algebraic name of a square index (0 -> "a1", 63 -> "h8")
pub fn square_name(sq: usize) -> String {
    let file = (b'a' + (sq % 8) as u8) as char;
    let rank = (b'1' + (sq / 8) as u8) as char;
    format!("{}{}", file, rank)
}

// Ray marching ----------------------------------------------------

/// One step from `sq` in direction `dir`, or None when the step would leave
/// the board or wrap around the A/H file edge.
#[inline]
pub fn step(sq: usize, dir: i8) -> Option<usize> {
    let file = sq % 8;
    let wraps = match dir {
        EAST | NORTH_EAST | SOUTH_EAST => file == 7,
        WEST | NORTH_WEST | SOUTH_WEST => file == 0,
        _ => false,
    };
    if wraps {
        return None;
    }
    let next = sq as i8 + dir;
    if (0..64).contains(&next) {
        Some(next as usize)
    } else {
        None
    }
}

/// Squares attacked from `sq` along `dir`. The first occupied square is
/// included, nothing beyond it.
#[inline]
pub fn ray_attacks(sq: usize, dir: i8, occ: u64) -> u64 {
    let mut attacks = 0u64;
    let mut cur = sq;
    while let Some(next) = step(cur, dir) {
        let bit = 1u64 << next;
        attacks |= bit;
        if occ & bit != 0 {
            break;
        }
        cur = next;
    }
    attacks
}

pub fn straight_attacks(sq: usize, occ: u64) -> u64 {
    STRAIGHT_DIRECTIONS
        .iter()
        .fold(0, |acc, &dir| acc | ray_attacks(sq, dir, occ))
}

pub fn diagonal_attacks(sq: usize, occ: u64) -> u64 {
    DIAGONAL_DIRECTIONS
        .iter()
        .fold(0, |acc, &dir| acc | ray_attacks(sq, dir, occ))
}

/// Direction leading from `from` to `to` if both lie on a common rank, file or diagonal
pub fn direction_between(from: usize, to: usize) -> Option<i8> {
    if from == to {
        return None;
    }
    let df = (to % 8) as i8 - (from % 8) as i8;
    let dr = (to / 8) as i8 - (from / 8) as i8;
    if df != 0 && dr != 0 && df.abs() != dr.abs() {
        return None;
    }
    Some(dr.signum() * 8 + df.signum())
}

/// Squares strictly between two aligned squares (0 when not aligned)
pub fn ray_between(from: usize, to: usize) -> u64 {
    let Some(dir) = direction_between(from, to) else {
        return 0;
    };
    let mut between = 0u64;
    let mut cur = from;
    while let Some(next) = step(cur, dir) {
        if next == to {
            return between;
        }
        between |= 1u64 << next;
        cur = next;
    }
    0
}

// Precomputed attack tables using OnceLock for thread safety
use std::sync::OnceLock;

static KNIGHT_ATTACKS: OnceLock<[u64; 64]> = OnceLock::new();
static KING_ATTACKS: OnceLock<[u64; 64]> = OnceLock::new();

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn offset_table(offsets: &[(i8, i8); 8]) -> [u64; 64] {
    let mut attacks = [0u64; 64];

    for (sq, mask) in attacks.iter_mut().enumerate() {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;

        for (dx, dy) in offsets {
            let new_file = file + dx;
            let new_rank = rank + dy;
            if (0..8).contains(&new_file) && (0..8).contains(&new_rank) {
                *mask |= 1u64 << (new_rank as usize * 8 + new_file as usize);
            }
        }
    }
    attacks
}

#[inline(always)]
pub fn init_attack_tables() {
    KNIGHT_ATTACKS.get_or_init(|| offset_table(&KNIGHT_OFFSETS));
    KING_ATTACKS.get_or_init(|| offset_table(&KING_OFFSETS));
}

#[inline]
pub fn knight_attacks(sq: usize) -> u64 {
    KNIGHT_ATTACKS.get_or_init(|| offset_table(&KNIGHT_OFFSETS))[sq]
}

#[inline]
pub fn king_attacks(sq: usize) -> u64 {
    KING_ATTACKS.get_or_init(|| offset_table(&KING_OFFSETS))[sq]
}

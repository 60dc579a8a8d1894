// Zobrist hashing with precomputed tables
use crate::board::{piece_index, Color, PieceKind, Position};
use std::sync::OnceLock;

pub struct ZobristKeys {
    pub piece: [[u64; 64]; 12],
    pub side: u64,
    pub castling: [u64; 16],
    pub ep_file: [u64; 8],
}

static KEYS: OnceLock<ZobristKeys> = OnceLock::new();

fn split_mix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

fn build_keys() -> ZobristKeys {
    let mut keys = ZobristKeys {
        piece: [[0; 64]; 12],
        side: split_mix64(0xdeadbeefdeadbeef),
        castling: [0; 16],
        ep_file: [0; 8],
    };
    for (i, row) in keys.piece.iter_mut().enumerate() {
        for (j, key) in row.iter_mut().enumerate() {
            *key = split_mix64((i as u64).wrapping_mul(0xad3) + (j as u64).wrapping_mul(0x47a1));
        }
    }
    // Castling rights index 0..15 (K, Q, k, q as bits); index 0 hashes to 0 so
    // a position without rights carries no castling term
    for (i, key) in keys.castling.iter_mut().enumerate().skip(1) {
        *key = split_mix64((i as u64).wrapping_mul(0x1234_abcd));
    }
    for (i, key) in keys.ep_file.iter_mut().enumerate() {
        *key = split_mix64((i as u64 + 1).wrapping_mul(0x3333_5555));
    }
    keys
}

pub fn init_zobrist() {
    KEYS.get_or_init(build_keys);
}

#[inline]
pub fn keys() -> &'static ZobristKeys {
    KEYS.get_or_init(build_keys)
}

pub fn recalc_zobrist_full(pos: &Position) -> u64 {
    let keys = keys();
    let mut h = 0u64;
    for kind in PieceKind::ALL {
        for color in [Color::White, Color::Black] {
            let mut bb = pos.pieces(kind, color);
            while let Some(sq) = crate::utils::pop_lsb(&mut bb) {
                h ^= keys.piece[piece_index(kind, color)][sq];
            }
        }
    }
    if pos.side_to_move() == Color::Black {
        h ^= keys.side;
    }
    h ^= keys.castling[pos.castling_rights() as usize];
    if let Some(ep_sq) = pos.en_passant() {
        h ^= keys.ep_file[ep_sq % 8];
    }
    h
}

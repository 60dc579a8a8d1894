//! Static evaluation: material plus piece-square tables.
//!
//! The score is always from white's point of view (positive favours white).
//! Every piece contributes `material + table[square]`, signed by its color, so
//! the total can be maintained incrementally by make/unmake.

use crate::board::{Color, PieceKind, Position};

pub type Score = i32;

// ============================================================================
// MATERIAL VALUES (centipawns)
// ============================================================================
pub const PAWN_VALUE: Score = 100;
pub const KNIGHT_VALUE: Score = 300;
pub const BISHOP_VALUE: Score = 300;
pub const ROOK_VALUE: Score = 500;
pub const QUEEN_VALUE: Score = 900;
pub const KING_VALUE: Score = 20000;

#[inline]
pub fn material_value(kind: PieceKind) -> Score {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::King => KING_VALUE,
    }
}

// ============================================================================
// PIECE-SQUARE TABLES (white's point of view)
// ============================================================================
// Tables are written as seen from white: first row is rank 8, last row rank 1.
// A white piece on `sq` reads index `sq ^ 56`; a black piece reads `sq`
// (the vertical mirror).

#[rustfmt::skip]
const PAWN_PSQT: [Score; 64] = [
     0,  0,   0,   0,   0,   0,  0,  0,
    50, 50,  50,  50,  50,  50, 50, 50,
    10, 10,  20,  30,  30,  20, 10, 10,
     5,  5,  10,  25,  25,  10,  5,  5,
     0,  0,   0,  20,  20,   0,  0,  0,
     5, -5, -10,   0,   0, -10, -5,  5,
     5, 10,  10, -20, -20,  10, 10,  5,
     0,  0,   0,   0,   0,   0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_PSQT: [Score; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_PSQT: [Score; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_PSQT: [Score; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_PSQT: [Score; 64] = [
    -20, -10, -10, -5, -5, -10, -10, -20,
    -10,   0,   0,  0,  0,   0,   0, -10,
    -10,   0,   5,  5,  5,   5,   0, -10,
     -5,   0,   5,  5,  5,   5,   0,  -5,
      0,   0,   5,  5,  5,   5,   0,  -5,
    -10,   5,   5,  5,  5,   5,   0, -10,
    -10,   0,   5,  0,  0,   0,   0, -10,
    -20, -10, -10, -5, -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_MIDDLEGAME_PSQT: [Score; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

#[inline]
fn psqt(kind: PieceKind) -> &'static [Score; 64] {
    match kind {
        PieceKind::Pawn => &PAWN_PSQT,
        PieceKind::Knight => &KNIGHT_PSQT,
        PieceKind::Bishop => &BISHOP_PSQT,
        PieceKind::Rook => &ROOK_PSQT,
        PieceKind::Queen => &QUEEN_PSQT,
        PieceKind::King => &KING_MIDDLEGAME_PSQT,
    }
}

/// Signed contribution of one piece standing on `sq`
#[inline]
pub fn piece_value(kind: PieceKind, color: Color, sq: usize) -> Score {
    match color {
        Color::White => material_value(kind) + psqt(kind)[sq ^ 56],
        Color::Black => -(material_value(kind) + psqt(kind)[sq]),
    }
}

/// Full evaluation from scratch. The incremental score kept by `Position`
/// must always equal this.
pub fn evaluate(pos: &Position) -> Score {
    let mut score = 0;
    for kind in PieceKind::ALL {
        for color in [Color::White, Color::Black] {
            for sq in crate::utils::iter_bits(pos.pieces(kind, color)) {
                score += piece_value(kind, color, sq);
            }
        }
    }
    score
}

//! FEN reading and writing
//!
//! `Position::from_layout` accepts anything; `parse_fen` is the strict front
//! door for user input. Half-move and full-move counters are validated but
//! not stored.

use crate::board::{
    Color, PieceKind, Position, BLACK_KINGSIDE, BLACK_QUEENSIDE, WHITE_KINGSIDE, WHITE_QUEENSIDE,
};
use crate::error::FenError;
use crate::utils::{self, square_mask};

pub use crate::board::START_FEN;

/// Parse a full FEN string. Castling rights whose king or rook is not on its
/// home square are dropped.
pub fn parse_fen(fen: &str) -> Result<Position, FenError> {
    let mut fields = fen.split_whitespace();
    let placement = fields.next().ok_or(FenError::Empty)?;
    validate_placement(placement)?;

    let mut pos = Position::from_layout(placement);

    let white_kings = pos.pieces(PieceKind::King, Color::White).count_ones();
    let black_kings = pos.pieces(PieceKind::King, Color::Black).count_ones();
    if white_kings != 1 || black_kings != 1 {
        return Err(FenError::KingCount {
            white: white_kings,
            black: black_kings,
        });
    }

    let side = match fields.next() {
        None | Some("w") => Color::White,
        Some("b") => Color::Black,
        Some(other) => {
            return Err(FenError::InvalidSide {
                field: other.to_string(),
            })
        }
    };
    pos.set_side_to_move(side);

    if let Some(field) = fields.next() {
        pos.set_castling_rights(parse_castling(field)?);
    }

    if let Some(field) = fields.next() {
        pos.set_en_passant(parse_en_passant(field, side)?);
    }

    for counter in fields.take(2) {
        if counter.parse::<u32>().is_err() {
            return Err(FenError::InvalidCounter {
                field: counter.to_string(),
            });
        }
    }

    Ok(pos)
}

fn validate_placement(placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount { found: ranks.len() });
    }
    for (i, rank) in ranks.iter().enumerate() {
        let mut squares = 0usize;
        for ch in rank.chars() {
            if let Some(skip) = ch.to_digit(10) {
                squares += skip as usize;
            } else if PieceKind::from_char(ch).is_some() {
                squares += 1;
            } else {
                return Err(FenError::InvalidPiece { ch });
            }
        }
        if squares != 8 {
            return Err(FenError::RankLength {
                rank: 8 - i,
                squares,
            });
        }
    }
    Ok(())
}

fn parse_castling(field: &str) -> Result<u8, FenError> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights = 0u8;
    for ch in field.chars() {
        rights |= match ch {
            'K' => WHITE_KINGSIDE,
            'Q' => WHITE_QUEENSIDE,
            'k' => BLACK_KINGSIDE,
            'q' => BLACK_QUEENSIDE,
            _ => {
                return Err(FenError::InvalidCastling {
                    field: field.to_string(),
                })
            }
        };
    }
    Ok(rights)
}

fn parse_en_passant(field: &str, side: Color) -> Result<Option<usize>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let invalid = || FenError::InvalidEnPassant {
        field: field.to_string(),
    };
    let sq = parse_square(field).ok_or_else(invalid)?;
    let expected_rank = match side {
        Color::White => 5,
        Color::Black => 2,
    };
    if sq / 8 != expected_rank {
        return Err(invalid());
    }
    Ok(Some(sq))
}

/// Square index from algebraic name (`"e4"` -> 28)
pub fn parse_square(name: &str) -> Option<usize> {
    let mut chars = name.chars();
    let file = chars.next()?;
    let rank = chars.next()?;
    if chars.next().is_some() || !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
        return None;
    }
    Some((rank as usize - '1' as usize) * 8 + (file as usize - 'a' as usize))
}

/// Piece placement field only
pub fn to_layout(pos: &Position) -> String {
    let mut out = String::with_capacity(64);
    for rank in (0..8).rev() {
        let mut empty = 0;
        for file in 0..8 {
            match pos.piece_at(rank * 8 + file) {
                Some((color, kind)) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(kind.to_char(color));
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
        if rank > 0 {
            out.push('/');
        }
    }
    out
}

/// Placement, side, castling and en-passant fields
pub fn to_fen(pos: &Position) -> String {
    let side = match pos.side_to_move() {
        Color::White => "w",
        Color::Black => "b",
    };

    let rights = pos.castling_rights();
    let mut castling: String = [
        (WHITE_KINGSIDE, 'K'),
        (WHITE_QUEENSIDE, 'Q'),
        (BLACK_KINGSIDE, 'k'),
        (BLACK_QUEENSIDE, 'q'),
    ]
    .iter()
    .filter(|(bit, _)| rights & bit != 0)
    .map(|&(_, ch)| ch)
    .collect();
    if castling.is_empty() {
        castling.push('-');
    }

    let ep = pos
        .en_passant()
        .filter(|&sq| pos.en_passant_mask() & square_mask(sq) != 0)
        .map_or_else(|| "-".to_string(), utils::square_name);

    format!("{} {} {} {}", to_layout(pos), side, castling, ep)
}

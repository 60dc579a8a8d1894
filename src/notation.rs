//! Coordinate move notation (`e2e4`, `e7e8q`)

use crate::board::Move;
use crate::error::NotationError;
use crate::fen::parse_square;

/// Parse a move in coordinate notation. The result is only well formed, not
/// necessarily legal; check it with `Position::is_legal`.
pub fn parse_move(input: &str) -> Result<Move, NotationError> {
    let text = input.trim();
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(NotationError::Length {
            input: text.to_string(),
        });
    }

    let square = |name: &str| {
        parse_square(name).ok_or_else(|| NotationError::InvalidSquare {
            square: name.to_string(),
        })
    };
    let from = square(&text[0..2])?;
    let to = square(&text[2..4])?;

    if let Some(piece) = text[4..].chars().next() {
        if !piece.eq_ignore_ascii_case(&'q') {
            return Err(NotationError::Promotion { piece });
        }
    }

    Ok(Move::new(from, to))
}

//! Error types for ferz
//!
//! The engine core never fails: illegal moves are a `false` from
//! `is_legal`/`process_move` and terminal positions are a `None` from the
//! search. Errors only come from parsing text input.

use thiserror::Error;

/// Errors from parsing a FEN string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("empty FEN string")]
    Empty,

    /// Placement field does not have exactly 8 ranks
    #[error("expected 8 ranks in piece placement, found {found}")]
    RankCount { found: usize },

    /// A rank describes more or fewer than 8 squares
    #[error("rank {rank} covers {squares} squares (must be 8)")]
    RankLength { rank: usize, squares: usize },

    #[error("invalid piece character '{ch}'")]
    InvalidPiece { ch: char },

    #[error("each side needs exactly one king (white {white}, black {black})")]
    KingCount { white: u32, black: u32 },

    #[error("invalid side to move '{field}' (must be 'w' or 'b')")]
    InvalidSide { field: String },

    #[error("invalid castling field '{field}'")]
    InvalidCastling { field: String },

    #[error("invalid en-passant square '{field}'")]
    InvalidEnPassant { field: String },

    #[error("invalid move counter '{field}'")]
    InvalidCounter { field: String },
}

/// Errors from parsing coordinate move notation such as `e2e4`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("move '{input}' must be 4 or 5 characters long")]
    Length { input: String },

    #[error("invalid square '{square}'")]
    InvalidSquare { square: String },

    /// Only queen promotion exists on this board
    #[error("unsupported promotion piece '{piece}' (only 'q' is allowed)")]
    Promotion { piece: char },
}

/// Crate-level error
#[derive(Error, Debug)]
pub enum Error {
    #[error("FEN error: {0}")]
    Fen(#[from] FenError),

    #[error("Notation error: {0}")]
    Notation(#[from] NotationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("perft mismatch at depth {depth}: ferz {ours}, reference {reference}")]
    PerftMismatch {
        depth: u32,
        ours: u64,
        reference: u64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod board;
pub mod error;
pub mod eval;
pub mod fen;
pub mod legal;
pub mod notation;
pub mod perft;
pub mod search;
pub mod utils;
pub mod zobrist;

pub use board::{Color, Move, PieceKind, Position};
pub use error::{Error, FenError, NotationError, Result};
pub use search::{Engine, EngineConfig, SearchOutcome, SearchParams};

/// Build the process-wide lookup tables up front instead of on first use
pub fn init() {
    utils::init_attack_tables();
    zobrist::init_zobrist();
}

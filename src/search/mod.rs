//! Search for ferz
//!
//! `worker` searches one root move on a private position, `engine` spreads
//! the root moves over a thread pool and picks the result.

pub mod engine;
pub mod params;
pub mod stats;
pub mod worker;

pub use self::engine::{best_move, Engine, SearchOutcome};
pub use self::params::{EngineConfig, SearchParams};
pub use self::stats::SearchStats;
pub use self::worker::{is_mate_score, SearchResult, Worker, DRAW_SCORE, INFINITE, MATE_SCORE};
pub use crate::board::Move;

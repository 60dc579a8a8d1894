//! Single-threaded alpha-beta search of one root move.
//!
//! A `Worker` owns a private `Position`. `search` plays the root move on it,
//! searches the reply tree with fail-soft alpha-beta (white maximizes, black
//! minimizes) and takes the move back, leaving the position as it found it.

use std::collections::HashMap;

use super::params::SearchParams;
use super::stats::SearchStats;
use crate::board::{Color, Move, Position};
use crate::eval::Score;
use crate::legal::generate_legal_moves;

/// Magnitude of a mate found at ply 0; a mate at ply `p` scores `MATE_SCORE - p`
pub const MATE_SCORE: Score = 1_000_000;
pub const DRAW_SCORE: Score = 0;
/// Outside every reachable score
pub const INFINITE: Score = 2_000_000;

/// Whether `score` announces a forced mate
#[inline]
pub fn is_mate_score(score: Score) -> bool {
    score.abs() > MATE_SCORE - 1000
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Value of the root move, white positive
    pub eval: Score,
    /// Alpha after folding in `eval` (raised when white made the root move)
    pub alpha: Score,
    /// Beta after folding in `eval` (lowered when black made the root move)
    pub beta: Score,
    pub nodes: u64,
    pub memo_hits: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Exact,
    /// True value is at least the stored one
    Lower,
    /// True value is at most the stored one
    Upper,
}

#[derive(Debug, Clone, Copy)]
struct MemoEntry {
    depth: i32,
    value: Score,
    bound: Bound,
}

pub struct Worker {
    pos: Position,
    params: SearchParams,
    memo: HashMap<u64, MemoEntry>,
    stats: SearchStats,
}

impl Worker {
    pub fn new(pos: Position, params: SearchParams) -> Self {
        Self {
            pos,
            params,
            memo: HashMap::new(),
            stats: SearchStats::new(),
        }
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    pub fn set_position(&mut self, pos: Position) {
        self.pos = pos;
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Statistics of the last `search` call
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Value of playing `mv` in the worker's position, searched
    /// `remaining_depth` plies below it inside the window `(alpha, beta)`.
    ///
    /// `mv` must be legal in the current position. The memo is cleared first,
    /// so results never depend on earlier calls.
    pub fn search(
        &mut self,
        mv: Move,
        remaining_depth: i32,
        alpha: Score,
        beta: Score,
    ) -> SearchResult {
        self.memo.clear();
        self.stats.reset();
        self.stats.start_timing();

        let mover = self.pos.side_to_move();
        let eval = self.visit(mv, remaining_depth, 1, alpha, beta);

        let (alpha, beta) = match mover {
            Color::White => (alpha.max(eval), beta),
            Color::Black => (alpha, beta.min(eval)),
        };

        self.stats.update_timing();
        tracing::trace!(mv = %mv, eval, "root move done");
        self.stats.log_summary();

        SearchResult {
            eval,
            alpha,
            beta,
            nodes: self.stats.nodes,
            memo_hits: self.stats.memo_hits,
        }
    }

    // Play `mv`, score the resulting node, take `mv` back
    fn visit(&mut self, mv: Move, depth: i32, ply: i32, alpha: Score, beta: Score) -> Score {
        let undo = self.pos.make_move(mv);
        self.stats.inc_node();
        let value = self.node_value(undo.captured.is_some(), depth, ply, alpha, beta);
        self.pos.unmake_move(undo);
        value
    }

    fn node_value(
        &mut self,
        was_capture: bool,
        depth: i32,
        ply: i32,
        mut alpha: Score,
        mut beta: Score,
    ) -> Score {
        if depth <= 0 {
            let quiet = !was_capture && !self.pos.in_check();
            if quiet || -depth >= self.params.max_extension {
                return self.pos.evaluation();
            }
            self.stats.inc_extended_node();
        }

        // depth + ply is constant within one search, so equal depth also
        // means equal ply and mate distances agree
        let key = self.pos.hash();
        if self.params.use_memo {
            if let Some(entry) = self.memo.get(&key) {
                let usable = entry.depth == depth
                    && match entry.bound {
                        Bound::Exact => true,
                        Bound::Lower => entry.value >= beta,
                        Bound::Upper => entry.value <= alpha,
                    };
                if usable {
                    self.stats.inc_memo_hit();
                    return entry.value;
                }
            }
        }

        let side = self.pos.side_to_move();
        let moves = generate_legal_moves(&self.pos);
        if moves.is_empty() {
            return if self.pos.in_check() {
                match side {
                    Color::White => -(MATE_SCORE - ply),
                    Color::Black => MATE_SCORE - ply,
                }
            } else {
                DRAW_SCORE
            };
        }

        let (alpha_in, beta_in) = (alpha, beta);
        let mut best = match side {
            Color::White => -INFINITE,
            Color::Black => INFINITE,
        };

        for mv in moves {
            let value = self.visit(mv, depth - 1, ply + 1, alpha, beta);
            match side {
                Color::White => {
                    best = best.max(value);
                    alpha = alpha.max(value);
                    if best >= beta {
                        self.stats.inc_cutoff();
                        break;
                    }
                }
                Color::Black => {
                    best = best.min(value);
                    beta = beta.min(value);
                    if best <= alpha {
                        self.stats.inc_cutoff();
                        break;
                    }
                }
            }
        }

        if self.params.use_memo {
            let bound = if best <= alpha_in {
                Bound::Upper
            } else if best >= beta_in {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.memo.insert(
                key,
                MemoEntry {
                    depth,
                    value: best,
                    bound,
                },
            );
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(layout: &str, side: Color) -> Worker {
        let mut pos = Position::from_layout(layout);
        pos.set_side_to_move(side);
        Worker::new(pos, SearchParams::new())
    }

    #[test]
    fn search_restores_position() {
        let mut w = worker(crate::board::START_LAYOUT, Color::White);
        let before = w.position().clone();
        let mv = Move::new(12, 28); // e2e4
        let result = w.search(mv, 2, -INFINITE, INFINITE);
        assert_eq!(w.position(), &before);
        assert!(result.nodes > 20);
        assert_eq!(result.alpha, result.eval);
        assert_eq!(result.beta, INFINITE);
    }

    #[test]
    fn back_rank_mate_scores_sentinel() {
        // Ra1-a8 mates the king boxed in by its own pawns
        let mut w = worker("6k1/5ppp/8/8/8/8/8/R5K1", Color::White);
        let result = w.search(Move::new(0, 56), 1, -INFINITE, INFINITE);
        assert_eq!(result.eval, MATE_SCORE - 1);
        assert!(is_mate_score(result.eval));
    }

    #[test]
    fn stalemate_scores_draw() {
        // Qb6 leaves the king on a8 without a move
        let mut w = worker("k7/8/2K5/8/8/8/8/1Q6", Color::White);
        let result = w.search(Move::new(1, 41), 1, -INFINITE, INFINITE);
        assert_eq!(result.eval, DRAW_SCORE);
    }

    #[test]
    fn black_root_lowers_beta() {
        let mut w = worker("4k3/8/8/8/8/8/3q4/4K3", Color::Black);
        // Qd1+ hangs the queen to Kxd1
        let result = w.search(Move::new(11, 3), 0, -INFINITE, INFINITE);
        assert_eq!(result.beta, result.eval);
        assert_eq!(result.alpha, -INFINITE);
    }
}

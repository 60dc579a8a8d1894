//! Perft: count leaf nodes of the legal move tree to verify move generation

use crate::board::{Move, Position};
use crate::legal::generate_legal_into;

/// Number of leaf nodes `depth` plies below `pos`
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = Vec::with_capacity(64);
    generate_legal_into(pos, &mut moves);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for mv in moves {
        let undo = pos.make_move(mv);
        nodes += perft(pos, depth - 1);
        pos.unmake_move(undo);
    }
    nodes
}

/// Perft split by root move, in generation order
pub fn divide(pos: &mut Position, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    pos.generate_moves()
        .into_iter()
        .map(|mv| {
            let undo = pos.make_move(mv);
            let nodes = perft(pos, depth - 1);
            pos.unmake_move(undo);
            (mv, nodes)
        })
        .collect()
}

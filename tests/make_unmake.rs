use ferz::board::{Color, PieceKind, Position};
use ferz::eval::evaluate;
use ferz::fen::parse_fen;
use ferz::zobrist::recalc_zobrist_full;

const POSITIONS: [&str; 5] = [
    ferz::fen::START_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
];

fn assert_consistent(pos: &Position, context: &str) {
    let white = pos.occupancy(Color::White);
    let black = pos.occupancy(Color::Black);
    assert_eq!(white & black, 0, "{context}: colors overlap");

    let mut seen = 0u64;
    for color in [Color::White, Color::Black] {
        let mut union = 0u64;
        for kind in PieceKind::ALL {
            let bb = pos.pieces(kind, color);
            assert_eq!(seen & bb, 0, "{context}: square claimed twice");
            seen |= bb;
            union |= bb;
        }
        assert_eq!(union, pos.occupancy(color), "{context}: aggregate mask");
        assert_eq!(
            pos.pieces(PieceKind::King, color).count_ones(),
            1,
            "{context}: king count"
        );
    }
    assert_eq!(pos.evaluation(), evaluate(pos), "{context}: incremental eval");
    assert_eq!(pos.hash(), recalc_zobrist_full(pos), "{context}: incremental hash");
}

// Make and unmake every move two plies deep, checking state after each step
fn walk(pos: &mut Position, depth: u32) {
    if depth == 0 {
        return;
    }
    for mv in pos.generate_moves() {
        let before = pos.clone();
        let undo = pos.make_move(mv);
        assert_consistent(pos, &format!("after {mv}"));
        walk(pos, depth - 1);
        pos.unmake_move(undo);
        assert_eq!(*pos, before, "Mismatched state after make/unmake for move {mv}");
    }
}

#[test]
fn make_unmake_restores_everything() {
    ferz::init();
    for fen in POSITIONS {
        let mut pos = parse_fen(fen).expect("Valid FEN");
        assert_consistent(&pos, fen);
        walk(&mut pos, 2);
    }
}

#[test]
fn incremental_state_survives_long_games() {
    ferz::init();
    // deterministic pseudo-random playout from every test position
    for fen in POSITIONS {
        let mut pos = parse_fen(fen).expect("Valid FEN");
        let mut seed = 0x2545_f491_4f6c_dd1du64;
        for ply in 0..120 {
            let moves = pos.generate_moves();
            if moves.is_empty() {
                break;
            }
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let mv = moves[(seed % moves.len() as u64) as usize];
            pos.process_move(mv);
            assert_consistent(&pos, &format!("{fen} ply {ply}"));
        }
    }
}

#[test]
fn castling_rights_follow_king_and_rooks() {
    ferz::init();
    let mut pos = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("Valid FEN");
    pos.process_move(ferz::Move::new(0, 8)); // Ra1-a2
    assert_eq!(pos.castling_rights(), 0b1011);
    pos.process_move(ferz::Move::new(63, 7)); // Rh8xh1
    assert_eq!(pos.castling_rights(), 0b0001);
    pos.process_move(ferz::Move::new(4, 12)); // Ke1-e2
    assert_eq!(pos.castling_rights(), 0b0001);
}

#[test]
fn double_push_sets_en_passant_square() {
    ferz::init();
    let mut pos = Position::start();
    pos.process_move(ferz::Move::new(12, 28)); // e2e4
    assert_eq!(pos.en_passant(), Some(20));
    pos.process_move(ferz::Move::new(57, 42)); // Nb8c6
    assert_eq!(pos.en_passant(), None);
}

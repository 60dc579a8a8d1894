use ferz::fen::parse_fen;
use ferz::perft::{divide, perft};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

fn shakmaty_perft(pos: &Chess, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0u64;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += shakmaty_perft(&new_pos, depth - 1);
    }
    nodes
}

fn run_perft_check(fen_str: &str, max_depth: u32, name: &str) {
    ferz::init();
    let mut pos = parse_fen(fen_str).expect("Valid FEN");

    let fen: Fen = fen_str.parse().expect("shakmaty parses FEN");
    let reference: Chess = fen
        .into_position(CastlingMode::Standard)
        .expect("Shakmaty should accept FEN");

    for depth in 1..=max_depth {
        let got = perft(&mut pos, depth);
        let expected = shakmaty_perft(&reference, depth);
        assert_eq!(got, expected, "Mismatch in {name} at depth {depth}");
    }
}

#[test]
fn perft_start_position_known_counts() {
    ferz::init();
    let mut pos = ferz::Position::start();
    assert_eq!(perft(&mut pos, 1), 20);
    assert_eq!(perft(&mut pos, 2), 400);
    assert_eq!(perft(&mut pos, 3), 8902);
    assert_eq!(perft(&mut pos, 4), 197_281);
}

#[test]
fn perft_start_position_matches_shakmaty() {
    run_perft_check(ferz::fen::START_FEN, 4, "start position");
}

#[test]
fn perft_kiwipete_matches_shakmaty() {
    run_perft_check(KIWIPETE, 3, "kiwipete");
}

#[test]
fn perft_kiwipete_known_counts() {
    ferz::init();
    let mut pos = parse_fen(KIWIPETE).expect("Valid FEN");
    assert_eq!(perft(&mut pos, 1), 48);
    assert_eq!(perft(&mut pos, 2), 2039);
    assert_eq!(perft(&mut pos, 3), 97_862);
}

#[test]
fn perft_position_3_matches_shakmaty() {
    run_perft_check(POSITION_3, 4, "position 3");
    let mut pos = parse_fen(POSITION_3).expect("Valid FEN");
    assert_eq!(perft(&mut pos, 4), 43_238);
}

#[test]
fn perft_castling_only() {
    run_perft_check("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", 3, "castling");
}

#[test]
fn perft_en_passant_available() {
    run_perft_check("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", 4, "en passant");
}

#[test]
fn perft_en_passant_discovered_check() {
    // exd3 would open the fourth rank between the queen and the king on a4
    run_perft_check("8/8/8/8/k2Pp2Q/8/8/3K4 b - d3 0 1", 4, "en passant pin");
}

#[test]
fn divide_matches_perft_per_move() {
    ferz::init();
    let mut pos = parse_fen(KIWIPETE).expect("Valid FEN");
    let split = divide(&mut pos, 2);
    assert_eq!(split.len(), 48);
    assert_eq!(split.iter().map(|(_, n)| *n).sum::<u64>(), 2039);
}

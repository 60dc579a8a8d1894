use ferz::board::{Color, PieceKind, Position};
use ferz::utils::{self, iter_bits, square_mask};

fn brute_force(sq: usize, offsets: &[(i32, i32)]) -> u64 {
    let file = (sq % 8) as i32;
    let rank = (sq / 8) as i32;
    offsets
        .iter()
        .filter_map(|(df, dr)| {
            let (f, r) = (file + df, rank + dr);
            ((0..8).contains(&f) && (0..8).contains(&r)).then(|| square_mask((r * 8 + f) as usize))
        })
        .fold(0, |acc, bit| acc | bit)
}

#[test]
fn knight_table_matches_brute_force() {
    let offsets = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
    for sq in 0..64 {
        assert_eq!(utils::knight_attacks(sq), brute_force(sq, &offsets), "square {sq}");
    }
}

#[test]
fn king_table_matches_brute_force() {
    let offsets = [(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)];
    for sq in 0..64 {
        assert_eq!(utils::king_attacks(sq), brute_force(sq, &offsets), "square {sq}");
    }
}

#[test]
fn slider_attacks_on_empty_board() {
    for sq in 0..64 {
        assert_eq!(utils::straight_attacks(sq, 0).count_ones(), 14, "rook on {sq}");
    }
    // bishop on d4 sees 13 squares, in the corner 7
    assert_eq!(utils::diagonal_attacks(27, 0).count_ones(), 13);
    assert_eq!(utils::diagonal_attacks(0, 0).count_ones(), 7);
}

#[test]
fn slider_attacks_stop_at_blockers() {
    // rook d4, own pawn d6, enemy knight f4
    let pos = Position::from_layout("4k3/8/3P4/8/3R1n2/8/8/4K3");
    let attacks = pos.rook_attacks(Color::White);
    assert!(attacks & square_mask(43) != 0, "blocker square d6 is attacked");
    assert!(attacks & square_mask(51) == 0, "d7 lies behind the blocker");
    assert!(attacks & square_mask(29) != 0, "f4 is attacked");
    assert!(attacks & square_mask(30) == 0, "g4 lies behind the knight");
    assert_eq!(iter_bits(attacks).count(), 10);
}

#[test]
fn pawn_attacks_do_not_wrap() {
    // white pawns a2 and h2, black pawns a7 and h7
    let pos = Position::from_layout("4k3/p6p/8/8/8/8/P6P/4K3");
    assert_eq!(pos.pawn_attacks(Color::White), square_mask(17) | square_mask(22));
    assert_eq!(pos.pawn_attacks(Color::Black), square_mask(41) | square_mask(46));
}

#[test]
fn attack_unions_are_consistent() {
    ferz::init();
    let pos = ferz::fen::parse_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    )
    .expect("valid FEN");
    for color in [Color::White, Color::Black] {
        let union = pos.pawn_attacks(color)
            | pos.knight_attacks(color)
            | pos.bishop_attacks(color)
            | pos.rook_attacks(color)
            | pos.queen_attacks(color)
            | pos.king_attacks(color);
        assert_eq!(pos.attacks(color), union);
        assert_eq!(
            pos.sliding_attacks(color, pos.occupied()) | pos.non_sliding_attacks(color),
            union
        );
        for sq in 0..64 {
            assert_eq!(
                pos.is_square_attacked(sq, color),
                union & square_mask(sq) != 0,
                "square {sq}"
            );
        }
    }
    assert!(pos.pieces(PieceKind::King, Color::White) & pos.attacks(Color::Black) == 0);
}

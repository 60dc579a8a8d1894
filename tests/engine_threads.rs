use ferz::fen::parse_fen;
use ferz::search::{Engine, EngineConfig, SearchOutcome, SearchParams};

const POSITIONS: [&str; 3] = [
    ferz::fen::START_FEN,
    "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
    "r2qkb1r/ppp2ppp/2n1bn2/3pp3/4P3/2NP1N2/PPP1BPPP/R1BQK2R b KQkq - 1 6",
];

fn run(fen: &str, threads: usize, iterative: bool, use_memo: bool) -> SearchOutcome {
    let pos = parse_fen(fen).expect("Valid FEN");
    let config = EngineConfig::new()
        .threads(threads)
        .iterative(iterative)
        .search_params(SearchParams::new().depth(3).use_memo(use_memo));
    Engine::new(pos, config)
        .find_best_move()
        .expect("position has moves")
}

#[test]
fn thread_count_does_not_change_result() {
    ferz::init();
    for fen in POSITIONS {
        let single = run(fen, 1, false, true);
        for threads in [2, 4, 7] {
            let multi = run(fen, threads, false, true);
            assert_eq!(multi.eval, single.eval, "{fen} with {threads} threads");
            assert_eq!(multi.mv, single.mv, "{fen} with {threads} threads");
        }
    }
}

#[test]
fn iterative_mode_matches_fixed_depth() {
    ferz::init();
    for fen in POSITIONS {
        let fixed = run(fen, 3, false, true);
        let iterative = run(fen, 3, true, true);
        assert_eq!(iterative.eval, fixed.eval, "{fen}");
        assert_eq!(iterative.mv, fixed.mv, "{fen}");
        assert_eq!(iterative.depth, 3);
    }
}

#[test]
fn memo_does_not_change_result() {
    ferz::init();
    for fen in POSITIONS {
        let with = run(fen, 2, false, true);
        let without = run(fen, 2, false, false);
        assert_eq!(with.eval, without.eval, "{fen}");
        assert_eq!(with.mv, without.mv, "{fen}");
        assert_eq!(without.memo_hits, 0);
    }
}

#[test]
fn engine_follows_the_game() {
    ferz::init();
    let config = EngineConfig::new().threads(3).depth(2);
    let mut engine = Engine::new(ferz::Position::start(), config);

    for _ in 0..6 {
        let outcome = engine.find_best_move().expect("game is not over");
        assert!(engine.position().is_legal(outcome.mv));
        assert!(outcome.nodes > 0);
        assert!(engine.process_move(outcome.mv));
    }
    assert_eq!(engine.position().side_to_move(), ferz::Color::White);

    let replay = {
        let pos = engine.position().clone();
        Engine::new(pos, EngineConfig::new().threads(1).depth(2)).find_best_move()
    };
    assert_eq!(engine.find_best_move().map(|o| o.eval), replay.map(|o| o.eval));
}

#[test]
fn repeated_engines_shut_down() {
    ferz::init();
    for threads in 1..=4 {
        let engine = Engine::new(ferz::Position::start(), EngineConfig::new().threads(threads).depth(1));
        assert_eq!(engine.num_threads(), threads);
        drop(engine);
    }
}

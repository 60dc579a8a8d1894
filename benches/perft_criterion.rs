use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ferz::fen::parse_fen;
use ferz::perft::perft;
use ferz::search::best_move;

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    fen: &'static str,
    expected_nodes: &'static [u64],
}

// Promotion-free within the listed depths
const CASES: &[BenchCase] = &[
    BenchCase {
        name: "position_1",
        fen: ferz::fen::START_FEN,
        expected_nodes: &[20, 400, 8902],
    },
    BenchCase {
        name: "position_2",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        expected_nodes: &[48, 2039],
    },
    BenchCase {
        name: "position_3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        expected_nodes: &[14, 191, 2812, 43_238],
    },
];

fn bench_perft(c: &mut Criterion) {
    ferz::init();
    let mut group = c.benchmark_group("perft");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    for case in CASES {
        let pos = parse_fen(case.fen).expect("benchmark FEN should parse");

        for (depth_idx, expected_nodes) in case.expected_nodes.iter().enumerate() {
            let depth = (depth_idx + 1) as u32;

            let mut warmup = pos.clone();
            assert_eq!(
                perft(&mut warmup, depth),
                *expected_nodes,
                "node mismatch in warmup for {} depth {}",
                case.name,
                depth
            );

            group.throughput(Throughput::Elements(*expected_nodes));
            let mut bench_pos = pos.clone();
            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{}_d{}", case.name, depth)),
                expected_nodes,
                |b, expected| {
                    b.iter(|| {
                        let nodes = perft(black_box(&mut bench_pos), black_box(depth));
                        assert_eq!(nodes, *expected);
                        black_box(nodes)
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    ferz::init();
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    let pos = parse_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
        .expect("benchmark FEN should parse");
    for threads in [1usize, 2, 4] {
        group.bench_with_input(BenchmarkId::new("depth_4", threads), &threads, |b, &threads| {
            b.iter(|| black_box(best_move(&pos, 4, threads)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_search);
criterion_main!(benches);

use clap::Parser;
use ferz::board::START_FEN;
use ferz::perft::{divide, perft};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = String::from(START_FEN))]
    fen: String,

    #[arg(short, long, default_value_t = 4)]
    depth: u32,

    /// Print node counts per root move
    #[arg(long)]
    divide: bool,

    /// Cross-check every depth up to --depth against shakmaty.
    /// Under-promotions make counts differ once a pawn can promote.
    #[arg(long)]
    verify: bool,
}

fn main() -> Result<(), ferz::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    ferz::init();

    let args = Args::parse();
    let mut pos = ferz::fen::parse_fen(&args.fen)?;

    println!("Running perft on FEN: '{}' at depth {}", args.fen, args.depth);

    if args.divide {
        for (mv, nodes) in divide(&mut pos, args.depth) {
            println!("{}: {}", mv, nodes);
        }
    }

    let start = std::time::Instant::now();
    let nodes = perft(&mut pos, args.depth);
    let duration = start.elapsed();
    println!(
        "perft({}) = {} nodes ({} ms, {:.2} Mnps)",
        args.depth,
        nodes,
        duration.as_millis(),
        nodes as f64 / (duration.as_micros().max(1) as f64)
    );

    if args.verify {
        let reference: Option<Chess> = args
            .fen
            .parse::<Fen>()
            .ok()
            .and_then(|fen| fen.into_position(CastlingMode::Standard).ok());
        let Some(reference) = reference else {
            tracing::warn!(fen = %args.fen, "shakmaty rejected the position, skipping verification");
            return Ok(());
        };
        for depth in 1..=args.depth {
            let ours = perft(&mut pos, depth);
            let expected = perft_shakmaty(&reference, depth);
            tracing::info!(depth, ours, expected, "verify");
            if ours != expected {
                return Err(ferz::Error::PerftMismatch {
                    depth,
                    ours,
                    reference: expected,
                });
            }
        }
        println!("shakmaty agrees up to depth {}", args.depth);
    }

    Ok(())
}

fn perft_shakmaty(pos: &Chess, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}

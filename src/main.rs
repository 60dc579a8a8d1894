//! ferz console game: play coordinate moves against the engine.

use std::io::{self, BufRead, Write};

use clap::{Parser, ValueEnum};
use ferz::search::{EngineConfig, SearchParams};
use ferz::{fen, notation, Color, Engine, Position};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Worker threads
    #[arg(short, long, default_value_t = ferz::search::params::DEFAULT_THREADS)]
    threads: usize,

    /// Search depth in plies
    #[arg(short, long, default_value_t = ferz::search::params::DEFAULT_DEPTH)]
    depth: u8,

    /// Starting position as FEN
    #[arg(short, long, default_value_t = String::from(fen::START_FEN))]
    start: String,

    /// Search depth 1, 2, ... up to --depth for every root move
    #[arg(long)]
    iterative: bool,

    /// Disable the per-search memo
    #[arg(long)]
    no_memo: bool,

    /// Color played by the engine
    #[arg(long, value_enum, default_value_t = Side::Black)]
    engine_plays: Side,
}

fn main() -> Result<(), ferz::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    ferz::init();

    let args = Args::parse();
    let position = fen::parse_fen(&args.start)?;
    let config = EngineConfig::new()
        .threads(args.threads)
        .iterative(args.iterative)
        .search_params(
            SearchParams::new()
                .depth(args.depth)
                .use_memo(!args.no_memo),
        );
    let engine_color = Color::from(args.engine_plays);

    let mut engine = Engine::new(position, config);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        if engine.position().side_to_move() == engine_color {
            let Some(outcome) = engine.find_best_move() else {
                println!("{}", engine.position());
                println!("{}", game_over_message(engine.position()));
                break;
            };
            println!(
                "ferz plays {} (eval {}, depth {}, {} nodes, {} ms)",
                outcome.mv,
                outcome.eval,
                outcome.depth,
                outcome.nodes,
                outcome.elapsed.as_millis()
            );
            engine.process_move(outcome.mv);
            continue;
        }

        println!("{}", engine.position());
        if engine.position().generate_moves().is_empty() {
            println!("{}", game_over_message(engine.position()));
            break;
        }

        print!("your move> ");
        io::stdout().flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();
        if text == "quit" {
            break;
        }

        match notation::parse_move(text) {
            Ok(mv) => {
                if !engine.process_move(mv) {
                    println!("illegal move: {}", mv);
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}

fn game_over_message(pos: &Position) -> &'static str {
    match (pos.in_check(), pos.side_to_move()) {
        (true, Color::White) => "checkmate, black wins",
        (true, Color::Black) => "checkmate, white wins",
        (false, _) => "stalemate",
    }
}

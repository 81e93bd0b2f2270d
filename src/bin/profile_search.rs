// Profiling binary: raw costs of the hot primitives, then one timed search
use std::hint::black_box;
use std::time::Instant;

use clap::Parser;
use gambit::board::{Color, Position};
use gambit::movegen::{perft, pseudo_legal_moves};
use gambit::search::{Search, SearchParams};
use tracing_subscriber::EnvFilter;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = String::from(KIWIPETE))]
    fen: String,

    /// Depth of the profiled search
    #[arg(short, long, default_value_t = 5)]
    depth: u8,

    /// Time limit for the profiled search in milliseconds (0 = none)
    #[arg(short, long, default_value_t = 0)]
    time: u64,
}

fn report(name: &str, iterations: u32, start: Instant) {
    let elapsed = start.elapsed();
    let per_call = (elapsed.as_nanos() / iterations as u128).max(1);
    println!("{}:", name);
    println!("  Total time: {:?}", elapsed);
    println!("  Per call: {} ns", per_call);
    println!("  Calls/sec: {:.0}", 1_000_000_000.0 / per_call as f64);
    println!();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let args = Args::parse();
    gambit::init();
    let pos = match Position::from_fen(&args.fen) {
        Ok(pos) => pos,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    println!("=== GAMBIT PROFILING ===\n");

    let iterations = 100_000;
    let start = Instant::now();
    for _ in 0..iterations {
        black_box(pseudo_legal_moves(black_box(&pos)));
    }
    report("pseudo_legal_moves()", iterations, start);

    let moves = pseudo_legal_moves(&pos);
    if let Some(&mv) = moves.first() {
        let iterations = 1_000_000;
        let start = Instant::now();
        for _ in 0..iterations {
            black_box(black_box(&pos).make(mv));
        }
        report("make()", iterations, start);
    }

    let iterations = 1_000_000;
    let start = Instant::now();
    for _ in 0..iterations {
        black_box(black_box(&pos).is_square_attacked(4, Color::Black));
    }
    report("is_square_attacked()", iterations, start);

    println!("Running perft depth 4...");
    let start = Instant::now();
    let nodes = perft(&pos, 4);
    let elapsed = start.elapsed();
    println!("  Nodes: {}", nodes);
    println!("  Time: {:?}", elapsed);
    println!("  Nodes/sec: {:.0}", nodes as f64 / elapsed.as_secs_f64());
    println!();

    println!("Searching to depth {}...", args.depth);
    let params = SearchParams::new().max_depth(args.depth).time_limit(args.time);
    let mut search = Search::new(params);
    let results = search.search(&pos);
    let pv: Vec<String> = results
        .principal_variation()
        .iter()
        .map(|m| m.to_string())
        .collect();
    println!("  PV: {}", pv.join(" "));
    search.stats().print_summary();
}

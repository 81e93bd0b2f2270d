use std::collections::BTreeMap;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use gambit::board::{Position, START_FEN};
use gambit::movegen::{perft, perft_divide};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position as _};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Count leaf nodes of the legal move tree", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = String::from(START_FEN))]
    fen: String,

    #[arg(short, long, default_value_t = 4)]
    depth: u32,

    /// Print the node count below each root move
    #[arg(long)]
    divide: bool,

    /// Cross-check every root move against shakmaty
    #[arg(long)]
    verify: bool,
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

fn divide_shakmaty(pos: &Chess, depth: u32) -> BTreeMap<String, u64> {
    pos.legal_moves()
        .into_iter()
        .map(|m| {
            let mut new_pos = pos.clone();
            new_pos.play_unchecked(&m);
            (
                m.to_uci(CastlingMode::Standard).to_string(),
                perft_shakmaty(&new_pos, depth.saturating_sub(1)),
            )
        })
        .collect()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    gambit::init();

    let pos = match Position::from_fen(&args.fen) {
        Ok(pos) => pos,
        Err(e) => {
            error!(fen = %args.fen, "{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Running perft on FEN: '{}' at depth {}", args.fen, args.depth);

    let start = Instant::now();
    let divided = if args.divide || args.verify {
        perft_divide(&pos, args.depth)
    } else {
        Vec::new()
    };
    let nodes = if args.divide || args.verify {
        if args.depth == 0 {
            1
        } else {
            divided.iter().map(|&(_, n)| n).sum()
        }
    } else {
        perft(&pos, args.depth)
    };
    let duration = start.elapsed();

    if args.divide {
        for (mv, n) in &divided {
            println!("{}: {}", mv, n);
        }
        println!();
    }
    println!(
        "perft({}) = {} nodes ({} ms, {:.2} Mnps)",
        args.depth,
        nodes,
        duration.as_millis(),
        nodes as f64 / (duration.as_micros().max(1) as f64)
    );

    if args.verify {
        let oracle: Chess = match args
            .fen
            .parse::<Fen>()
            .map_err(|e| e.to_string())
            .and_then(|fen| fen.into_position(CastlingMode::Standard).map_err(|e| e.to_string()))
        {
            Ok(pos) => pos,
            Err(e) => {
                error!("shakmaty rejected the position: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let mut expected = divide_shakmaty(&oracle, args.depth);
        let mut mismatches = 0;
        for (mv, n) in &divided {
            match expected.remove(&mv.to_string()) {
                Some(want) if want == *n => {}
                Some(want) => {
                    mismatches += 1;
                    println!("{}: got {} expected {}", mv, n, want);
                }
                None => {
                    mismatches += 1;
                    println!("{}: generated but not legal", mv);
                }
            }
        }
        for mv in expected.keys() {
            mismatches += 1;
            println!("{}: legal but not generated", mv);
        }
        if mismatches > 0 {
            error!(mismatches, "perft disagrees with shakmaty");
            return ExitCode::FAILURE;
        }
        println!("verified against shakmaty");
    }
    ExitCode::SUCCESS
}

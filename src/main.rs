//! Gambit: play a game against the engine, or watch it play itself.

use std::cell::RefCell;
use std::io;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use gambit::board::{Position, START_FEN};
use gambit::game::{Computer, Decision, Game, GameError, Human, Player};
use gambit::search::SearchParams;
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_MOVE_TIME_MS: u64 = 3000;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Computer's time per move in milliseconds (default 3000 if no depth is set)
    #[arg(short, long)]
    time: Option<u64>,

    /// Search depth in plies
    #[arg(short, long)]
    depth: Option<u8>,

    /// FEN record of the starting position
    #[arg(short, long, default_value_t = String::from(START_FEN))]
    fen: String,

    /// User plays White
    #[arg(short = 'w')]
    white: bool,

    /// User plays Black
    #[arg(short = 'b')]
    black: bool,
}

impl Args {
    fn search_params(&self) -> SearchParams {
        let time = match (self.time, self.depth) {
            (Some(ms), _) => ms,
            (None, None) => DEFAULT_MOVE_TIME_MS,
            (None, Some(_)) => 0,
        };
        SearchParams::new()
            .max_depth(self.depth.filter(|&d| d > 0).unwrap_or(100))
            .time_limit(time)
    }
}

/// One human seat on each side reading the same terminal.
struct Shared<P>(Rc<RefCell<P>>);

impl<P: Player> Player for Shared<P> {
    fn play(&mut self, pos: &Position) -> Result<Decision, GameError> {
        self.0.borrow_mut().play(pos)
    }
}

fn run(args: Args) -> Result<(), GameError> {
    gambit::init();
    let start = Position::from_fen(&args.fen)?;
    let params = args.search_params();

    let human = Rc::new(RefCell::new(Human::new(io::stdin().lock(), io::stdout())));
    let seat = |is_human: bool| -> Box<dyn Player> {
        if is_human {
            Box::new(Shared(Rc::clone(&human)))
        } else {
            Box::new(Computer::new(params.clone()))
        }
    };

    let mut game = Game::new(start, seat(args.white), seat(args.black), io::stdout());
    game.play()?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

//! Game driver: alternates two players until the game is decided.

pub mod player;

pub use self::player::{parse_user_input, Computer, Decision, Human, Player, UserInput};

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::info;

use crate::board::{Color, Position};
use crate::eval::is_insufficient_material;
use crate::fen::FenError;
use crate::movegen::Move;
use crate::notation::{algebraic, move_number, move_text};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid FEN: {0}")]
    Fen(#[from] FenError),
    #[error("input closed")]
    InputClosed,
    #[error("search thread panicked")]
    SearchPanicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Resignation { winner: Color },
    Stalemate,
    ThreefoldRepetition,
    FiftyMoveRule,
    InsufficientMaterial,
}

impl Outcome {
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } | Outcome::Resignation { winner } => Some(winner),
            _ => None,
        }
    }

    /// "1-0", "0-1" or "1/2-1/2".
    pub fn result(self) -> &'static str {
        match self.winner() {
            Some(Color::White) => "1-0",
            Some(Color::Black) => "0-1",
            None => "1/2-1/2",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checkmate { .. } => write!(f, "checkmate"),
            Outcome::Resignation { .. } => write!(f, "resignation"),
            Outcome::Stalemate => write!(f, "stalemate"),
            Outcome::ThreefoldRepetition => write!(f, "threefold repetition"),
            Outcome::FiftyMoveRule => write!(f, "fifty-move rule"),
            Outcome::InsufficientMaterial => write!(f, "insufficient material"),
        }
    }
}

/// A finished game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub start: Position,
    pub moves: Vec<Move>,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

impl GameRecord {
    /// Numbered move text followed by the result.
    pub fn text(&self) -> String {
        let moves = move_text(&self.start, &self.moves);
        if moves.is_empty() {
            self.outcome.result().to_string()
        } else {
            format!("{} {}", moves, self.outcome.result())
        }
    }
}

pub struct Game<W> {
    start: Position,
    position: Position,
    players: [Box<dyn Player>; 2],
    moves: Vec<Move>,
    /// How often each position hash has occurred, the start included
    seen: HashMap<u64, u32>,
    out: W,
}

impl<W: Write> Game<W> {
    pub fn new(start: Position, white: Box<dyn Player>, black: Box<dyn Player>, out: W) -> Self {
        let mut seen = HashMap::new();
        seen.insert(start.hash(), 1);
        Self {
            start,
            position: start,
            players: [white, black],
            moves: Vec::new(),
            seen,
            out,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// The result the current position forces, if any.
    pub fn outcome(&self) -> Option<Outcome> {
        let pos = &self.position;
        if pos.is_terminal() {
            return Some(if pos.is_check() {
                Outcome::Checkmate {
                    winner: pos.side_to_move().opponent(),
                }
            } else {
                Outcome::Stalemate
            });
        }
        if self.seen.get(&pos.hash()).copied().unwrap_or(0) >= 3 {
            return Some(Outcome::ThreefoldRepetition);
        }
        if pos.halfmove_clock() >= 100 {
            return Some(Outcome::FiftyMoveRule);
        }
        if is_insufficient_material(pos) {
            return Some(Outcome::InsufficientMaterial);
        }
        None
    }

    /// Applies a move and records the position it leads to.
    pub fn push(&mut self, mv: Move) {
        self.position = self.position.make(mv);
        self.moves.push(mv);
        *self.seen.entry(self.position.hash()).or_insert(0) += 1;
    }

    /// Plays until the game ends, printing each move, its evaluation, the
    /// time taken and the board.
    pub fn play(&mut self) -> Result<GameRecord, GameError> {
        let started = Instant::now();
        let outcome = loop {
            if let Some(outcome) = self.outcome() {
                break outcome;
            }
            let side = self.position.side_to_move();
            let move_started = Instant::now();
            let (mv, score) = match self.players[side.index()].play(&self.position)? {
                Decision::Move { mv, score } => (mv, score),
                Decision::Resign => {
                    break Outcome::Resignation {
                        winner: side.opponent(),
                    }
                }
            };
            writeln!(
                self.out,
                "{}{} {} {}ms",
                move_number(&self.position),
                algebraic(&self.position, mv),
                score,
                move_started.elapsed().as_millis()
            )?;
            self.push(mv);
            writeln!(self.out, "{}", self.position)?;
        };

        let record = GameRecord {
            start: self.start,
            moves: self.moves.clone(),
            outcome,
            elapsed: started.elapsed(),
        };
        info!(%outcome, result = record.outcome.result(), moves = record.moves.len(), "game over");
        writeln!(self.out, "{} {}ms", record.text(), record.elapsed.as_millis())?;
        Ok(record)
    }
}

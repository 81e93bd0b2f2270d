//! Players: the engine, and a human typing coordinate moves while the engine
//! thinks in the background.

use std::io::{BufRead, Write};
use std::thread;

use tracing::debug;

use super::GameError;
use crate::board::Position;
use crate::eval::evaluate;
use crate::movegen::Move;
use crate::notation::{parse_user_move, MoveParseError};
use crate::search::{Abs, Results, Search, SearchParams};
use crate::time::Deadline;

/// What a player does on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Play `mv`; `score` is the engine's opinion of the position after it
    Move { mv: Move, score: Abs },
    Resign,
}

pub trait Player {
    fn play(&mut self, pos: &Position) -> Result<Decision, GameError>;
}

fn best_decision(pos: &Position, results: &Results) -> Decision {
    match results.best() {
        Some(best) => Decision::Move {
            mv: best.mv,
            score: best.score.to_abs(pos.side_to_move()),
        },
        None => Decision::Resign,
    }
}

/// Plays the engine's preferred move without user input.
pub struct Computer {
    params: SearchParams,
}

impl Computer {
    pub fn new(params: SearchParams) -> Self {
        Self { params }
    }
}

impl Player for Computer {
    fn play(&mut self, pos: &Position) -> Result<Decision, GameError> {
        let mut search = Search::new(self.params.clone());
        let results = search.search(pos);
        debug!(results = %results, "computer move");
        Ok(best_decision(pos, &results))
    }
}

/// A command or move typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInput {
    /// Play the engine's preferred move
    Go,
    Resign,
    Move(Move),
}

pub fn parse_user_input(pos: &Position, line: &str) -> Result<UserInput, MoveParseError> {
    match line.trim() {
        "go" => Ok(UserInput::Go),
        "resign" => Ok(UserInput::Resign),
        text => parse_user_move(pos, text).map(UserInput::Move),
    }
}

/// Reads moves such as `e2e4`, `e1g1` or `d7d8q` from `input`, plus the
/// commands `go` and `resign`.
pub struct Human<R, W> {
    input: R,
    output: W,
    params: SearchParams,
}

impl<R: BufRead, W: Write> Human<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            params: SearchParams::new(),
        }
    }

    fn read_line(&mut self) -> Result<String, GameError> {
        write!(self.output, "> ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(GameError::InputClosed);
        }
        Ok(line)
    }
}

// Cancels the background search and waits for its last complete iteration
fn finish(deadline: &Deadline, handle: thread::JoinHandle<Results>) -> Result<Results, GameError> {
    deadline.stop();
    handle.join().map_err(|_| GameError::SearchPanicked)
}

impl<R: BufRead, W: Write> Player for Human<R, W> {
    fn play(&mut self, pos: &Position) -> Result<Decision, GameError> {
        let deadline = Deadline::none();
        let handle = {
            let deadline = deadline.clone();
            let params = self.params.clone();
            let pos = *pos;
            thread::spawn(move || Search::with_deadline(params, deadline).search(&pos))
        };

        loop {
            let line = match self.read_line() {
                Ok(line) => line,
                Err(err) => {
                    finish(&deadline, handle)?;
                    return Err(err);
                }
            };
            match parse_user_input(pos, &line) {
                Ok(UserInput::Go) => {
                    let results = finish(&deadline, handle)?;
                    return Ok(best_decision(pos, &results));
                }
                Ok(UserInput::Resign) => {
                    finish(&deadline, handle)?;
                    return Ok(Decision::Resign);
                }
                Ok(UserInput::Move(mv)) => {
                    // The engine's opinion of the human's move
                    let results = finish(&deadline, handle)?;
                    let score = match results.find(mv) {
                        Some(r) => r.score.to_abs(pos.side_to_move()),
                        None => evaluate(&pos.make(mv)),
                    };
                    return Ok(Decision::Move { mv, score });
                }
                Err(err) => {
                    if let Err(io) = writeln!(self.output, "{}", err) {
                        finish(&deadline, handle)?;
                        return Err(io.into());
                    }
                }
            }
        }
    }
}

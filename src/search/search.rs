//! Main search engine implementation
//!
//! Iterative deepening negamax with alpha-beta windows over mate-aware
//! scores. Each iteration re-searches the ranked move tree produced by the
//! previous one, so earlier results order the moves of the next iteration.

use tracing::{debug, info};

use super::params::SearchParams;
use super::results::Results;
use super::score::{Rel, Window};
use super::stats::SearchStats;
use crate::board::Position;
use crate::eval::evaluate;
use crate::movegen::{has_legal_move, legal_moves};
use crate::time::Deadline;

/// Raised from deep inside the recursion when the deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Interrupted;

/// Main search engine
pub struct Search {
    /// Search parameters
    params: SearchParams,

    /// Search statistics
    stats: SearchStats,

    /// Time limit and stop flag
    deadline: Deadline,

    /// False while the first iteration runs
    interruptible: bool,
}

impl Search {
    pub fn new(params: SearchParams) -> Self {
        Self::with_deadline(params, Deadline::none())
    }

    /// Uses the stop flag of `deadline`; its clock is restarted on every search.
    pub fn with_deadline(params: SearchParams, deadline: Deadline) -> Self {
        Self {
            params,
            stats: SearchStats::new(),
            deadline,
            interruptible: false,
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Get search statistics
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn deadline(&self) -> &Deadline {
        &self.deadline
    }

    /// Search to the configured maximum depth.
    pub fn search(&mut self, pos: &Position) -> Results {
        self.search_position(pos, self.params.max_depth)
    }

    /// Iterative deepening from depth 1 to `max_depth`.
    ///
    /// The first iteration always completes. A later iteration cut short by
    /// the deadline is thrown away and the last complete one is returned.
    /// The result is empty only when the side to move has no legal move.
    pub fn search_position(&mut self, pos: &Position, max_depth: u8) -> Results {
        self.stats.reset();
        self.stats.start_timing();
        self.deadline.start(self.params.time_limit_ms);

        let mut results = Results::default();
        for depth in 1..=max_depth.max(1) {
            self.interruptible = depth > 1;
            match self.negamax(pos, results.clone(), Window::FULL, depth) {
                Ok((score, ranked)) => {
                    results = ranked;
                    self.stats.completed_depth = depth;
                    self.stats.update_timing();
                    debug!(
                        depth,
                        best = %results.best().map(|r| r.mv.to_string()).unwrap_or_default(),
                        %score,
                        nodes = self.stats.nodes,
                        elapsed_ms = self.stats.search_time.as_millis() as u64,
                        "iteration complete"
                    );
                }
                Err(Interrupted) => {
                    self.stats.inc_interrupted();
                    debug!(depth, kept = depth - 1, "deadline reached, iteration discarded");
                    break;
                }
            }
            if results.is_empty() || self.deadline.expired() {
                break;
            }
            // A mate found at this depth cannot be beaten by searching deeper
            if results.best().is_some_and(|r| matches!(r.score, Rel::WinIn(_))) {
                break;
            }
        }
        self.interruptible = false;

        self.stats.update_timing();
        info!(
            depth = self.stats.completed_depth,
            pv = %results
                .principal_variation()
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            score = %results.best().map(|r| r.score.to_string()).unwrap_or_default(),
            nodes = self.stats.nodes,
            nps = self.stats.nps,
            "search finished"
        );
        results
    }

    fn negamax(
        &mut self,
        pos: &Position,
        prior: Results,
        window: Window,
        depth: u8,
    ) -> Result<(Rel, Results), Interrupted> {
        self.stats.inc_node();

        let mut results = prior;
        if results.is_empty() {
            // At the horizon only the existence of a move matters
            let terminal = if depth == 0 {
                !has_legal_move(pos)
            } else {
                let moves = legal_moves(pos);
                results = Results::from_moves(&moves);
                moves.is_empty()
            };
            if terminal {
                let score = if pos.is_check() {
                    Rel::LossIn(0)
                } else {
                    Rel::Stalemate
                };
                return Ok((score, Results::default()));
            }
        }

        if pos.halfmove_clock() >= 100 {
            return Ok((Rel::FiftyMoveRule, results));
        }

        if depth == 0 {
            self.stats.inc_leaf_node();
            return Ok((evaluate(pos).to_rel(pos.side_to_move()), Results::default()));
        }

        if self.interruptible
            && depth >= self.params.deadline_check_depth
            && self.deadline.expired()
        {
            return Err(Interrupted);
        }

        let below = depth - 1;
        if results
            .iter()
            .all(|r| r.is_dead_end() || r.searched_to(below))
        {
            self.stats.inc_reused_list();
            let best = results.best().map_or(Rel::LossIn(0), |r| r.score);
            return Ok((best, results));
        }

        let mut window = window;
        let mut best = Rel::LossIn(0);
        for entry in results.iter_mut() {
            if entry.is_dead_end() {
                self.stats.inc_dead_end();
            } else {
                let child = pos.make(entry.mv);
                let replies = std::mem::take(&mut entry.replies);
                let (child_score, replies) = self.negamax(&child, replies, window.child(), below)?;
                entry.score = child_score.negate().next();
                entry.depth = Some(below);
                entry.replies = replies;
            }
            best = best.best_of(entry.score);
            window.raise(entry.score);
            if self.params.allow_cutoff && window.is_empty() {
                self.stats.inc_cutoff();
                break;
            }
        }

        results.sort();
        Ok((best, results))
    }
}

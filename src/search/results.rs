//! Ranked move lists produced by the search.

use std::cmp::Reverse;
use std::fmt;

use super::score::Rel;
use crate::movegen::Move;

/// One searched (or not yet searched) move and the subtree below it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub mv: Move,
    /// Score of the move for the side that plays it
    pub score: Rel,
    /// Depth searched below the move; `None` until first searched
    pub depth: Option<u8>,
    /// Ranked replies in the resulting position
    pub replies: Results,
}

impl SearchResult {
    pub fn new(mv: Move) -> Self {
        Self {
            mv,
            score: Rel::LossIn(0),
            depth: None,
            replies: Results::default(),
        }
    }

    /// A searched move whose outcome is settled: it ends the game, or leads to
    /// a forced mate or a draw with no replies left to examine.
    #[inline]
    pub fn is_dead_end(&self) -> bool {
        self.depth.is_some() && self.replies.is_empty() && !matches!(self.score, Rel::Value(_))
    }

    #[inline]
    pub fn searched_to(&self, depth: u8) -> bool {
        self.depth.is_some_and(|d| d >= depth)
    }
}

/// Move list kept sorted best-first after every search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Results(Vec<SearchResult>);

impl Results {
    pub fn from_moves(moves: &[Move]) -> Self {
        Results(moves.iter().map(|&mv| SearchResult::new(mv)).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, SearchResult> {
        self.0.iter_mut()
    }

    pub fn best(&self) -> Option<&SearchResult> {
        self.0.first()
    }

    pub fn find(&self, mv: Move) -> Option<&SearchResult> {
        self.0.iter().find(|r| r.mv == mv)
    }

    /// Stable sort, best score first.
    pub fn sort(&mut self) {
        self.0.sort_by_key(|r| Reverse(r.score.rank()));
    }

    /// Moves along the chain of best replies.
    pub fn principal_variation(&self) -> Vec<Move> {
        let mut pv = Vec::new();
        let mut current = self;
        while let Some(head) = current.best() {
            pv.push(head.mv);
            current = &head.replies;
        }
        pv
    }
}

impl<'a> IntoIterator for &'a Results {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Results {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}:{}", r.mv, r.score)?;
        }
        Ok(())
    }
}

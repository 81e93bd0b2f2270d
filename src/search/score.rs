//! Mate-aware scores and alpha-beta windows.
//!
//! `Rel` is seen from the side to move and is what the search works with.
//! `Abs` is seen from White and is what the evaluator and the players report.
//! Neither type derives `Ord`: the draw tags are distinct values but rank the
//! same as `Value(0)`, so comparisons go through `Rel::rank`.

use std::fmt;

use crate::board::Color;

/// Score from the perspective of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rel {
    /// Centipawns
    Value(i32),
    /// The side to move mates in this many plies
    WinIn(u16),
    /// The side to move is mated in this many plies
    LossIn(u16),
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
}

/// Score from White's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Abs {
    Value(i32),
    MateIn { plies: u16, winner: Color },
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
}

// Above any reachable material balance
const MATE_RANK: i64 = 1 << 40;

impl Rel {
    /// Total order key: wins above values above losses, quicker wins and
    /// slower losses first, draw tags level with `Value(0)`.
    #[inline]
    pub fn rank(self) -> i64 {
        match self {
            Rel::Value(v) => v as i64,
            Rel::WinIn(n) => MATE_RANK - n as i64,
            Rel::LossIn(n) => -MATE_RANK + n as i64,
            Rel::Stalemate | Rel::InsufficientMaterial | Rel::FiftyMoveRule => 0,
        }
    }

    #[inline]
    pub fn is_better_than(self, other: Rel) -> bool {
        self.rank() > other.rank()
    }

    /// The better of the two; `self` on a tie.
    #[inline]
    pub fn best_of(self, other: Rel) -> Rel {
        if other.is_better_than(self) {
            other
        } else {
            self
        }
    }

    /// The same score seen from the other side.
    #[inline]
    pub fn negate(self) -> Rel {
        match self {
            Rel::Value(v) => Rel::Value(-v),
            Rel::WinIn(n) => Rel::LossIn(n),
            Rel::LossIn(n) => Rel::WinIn(n),
            tag => tag,
        }
    }

    /// Adds one ply to a mate distance.
    #[inline]
    pub fn next(self) -> Rel {
        match self {
            Rel::WinIn(n) => Rel::WinIn(n.saturating_add(1)),
            Rel::LossIn(n) => Rel::LossIn(n.saturating_add(1)),
            other => other,
        }
    }

    /// Strips one ply from a mate distance, stopping at zero.
    #[inline]
    pub fn prev(self) -> Rel {
        match self {
            Rel::WinIn(n) => Rel::WinIn(n.saturating_sub(1)),
            Rel::LossIn(n) => Rel::LossIn(n.saturating_sub(1)),
            other => other,
        }
    }

    #[inline]
    pub fn is_mate(self) -> bool {
        matches!(self, Rel::WinIn(_) | Rel::LossIn(_))
    }

    #[inline]
    pub fn is_draw(self) -> bool {
        matches!(
            self,
            Rel::Stalemate | Rel::InsufficientMaterial | Rel::FiftyMoveRule
        )
    }

    pub fn to_abs(self, side: Color) -> Abs {
        match self {
            Rel::Value(v) => Abs::Value(if side == Color::White { v } else { -v }),
            Rel::WinIn(plies) => Abs::MateIn {
                plies,
                winner: side,
            },
            Rel::LossIn(plies) => Abs::MateIn {
                plies,
                winner: side.opponent(),
            },
            Rel::Stalemate => Abs::Stalemate,
            Rel::InsufficientMaterial => Abs::InsufficientMaterial,
            Rel::FiftyMoveRule => Abs::FiftyMoveRule,
        }
    }
}

impl Abs {
    pub fn to_rel(self, side: Color) -> Rel {
        match self {
            Abs::Value(v) => Rel::Value(if side == Color::White { v } else { -v }),
            Abs::MateIn { plies, winner } if winner == side => Rel::WinIn(plies),
            Abs::MateIn { plies, .. } => Rel::LossIn(plies),
            Abs::Stalemate => Rel::Stalemate,
            Abs::InsufficientMaterial => Rel::InsufficientMaterial,
            Abs::FiftyMoveRule => Rel::FiftyMoveRule,
        }
    }

    pub fn is_draw(self) -> bool {
        matches!(
            self,
            Abs::Stalemate | Abs::InsufficientMaterial | Abs::FiftyMoveRule
        )
    }
}

// Full moves until mate, counting the mating move
fn mate_moves(plies: u16) -> u16 {
    (plies + 1) / 2
}

impl fmt::Display for Rel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Rel::Value(v) => write!(f, "{:+.2}", v as f64 / 100.0),
            Rel::WinIn(n) => write!(f, "#{}", mate_moves(n)),
            Rel::LossIn(n) => write!(f, "#-{}", mate_moves(n)),
            Rel::Stalemate => write!(f, "stalemate"),
            Rel::InsufficientMaterial => write!(f, "insufficient material"),
            Rel::FiftyMoveRule => write!(f, "fifty-move rule"),
        }
    }
}

impl fmt::Display for Abs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Abs::Value(v) => write!(f, "{:+.2}", v as f64 / 100.0),
            Abs::MateIn {
                plies,
                winner: Color::White,
            } => write!(f, "+#{}", mate_moves(plies)),
            Abs::MateIn {
                plies,
                winner: Color::Black,
            } => write!(f, "-#{}", mate_moves(plies)),
            Abs::Stalemate => write!(f, "stalemate"),
            Abs::InsufficientMaterial => write!(f, "insufficient material"),
            Abs::FiftyMoveRule => write!(f, "fifty-move rule"),
        }
    }
}

/// Alpha-beta bounds, both in the perspective of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub lower: Rel,
    pub upper: Rel,
}

impl Window {
    /// Every reachable score lies inside.
    pub const FULL: Window = Window {
        lower: Rel::LossIn(0),
        upper: Rel::WinIn(0),
    };

    pub fn new(lower: Rel, upper: Rel) -> Self {
        Self { lower, upper }
    }

    /// The window of the opponent: bounds swapped and negated.
    #[inline]
    pub fn negate(self) -> Window {
        Window {
            lower: self.upper.negate(),
            upper: self.lower.negate(),
        }
    }

    #[inline]
    pub fn next(self) -> Window {
        Window {
            lower: self.lower.next(),
            upper: self.upper.next(),
        }
    }

    #[inline]
    pub fn prev(self) -> Window {
        Window {
            lower: self.lower.prev(),
            upper: self.upper.prev(),
        }
    }

    /// Window for the position after one more move.
    #[inline]
    pub fn child(self) -> Window {
        self.prev().negate()
    }

    /// Raises the lower bound to `score` if it is better.
    #[inline]
    pub fn raise(&mut self, score: Rel) {
        self.lower = self.lower.best_of(score);
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.lower.rank() >= self.upper.rank()
    }
}

impl Default for Window {
    fn default() -> Self {
        Window::FULL
    }
}

//! Search engine for the gambit chess engine
//!
//! Scores, windows, ranked result trees and the iterative deepening driver.

pub mod params;
pub mod results;
pub mod score;
pub mod search;
pub mod stats;

pub use self::params::SearchParams;
pub use self::results::{Results, SearchResult};
pub use self::score::{Abs, Rel, Window};
pub use self::search::Search;
pub use self::stats::SearchStats;
pub use crate::movegen::Move;

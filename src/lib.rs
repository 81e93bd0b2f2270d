pub mod board;
pub mod eval;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod search;
pub mod time;
pub mod utils;
pub mod zobrist;

pub use board::{Color, PieceKind, Position};
pub use movegen::Move;

/// Builds the attack tables up front. Optional: they are built on first use.
pub fn init() {
    utils::init_attack_tables();
}

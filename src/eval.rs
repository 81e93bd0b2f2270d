//! Static evaluation.
//!
//! The evaluator is deliberately plain: material balance in centipawns from
//! White's point of view, or a draw tag when neither side can ever mate.

use crate::board::{Color, PieceKind, Position};
use crate::search::Abs;
use crate::utils::{count_bits, DARK_SQUARES, LIGHT_SQUARES};

// ============================================================================
// MATERIAL VALUES (centipawns)
// ============================================================================
pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 320;
pub const BISHOP_VALUE: i32 = 333;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
struct MaterialCounts {
    pawns: u32,
    knights: u32,
    bishops: u32,
    rooks: u32,
    queens: u32,
}

impl MaterialCounts {
    fn of(pos: &Position, color: Color) -> Self {
        Self {
            pawns: count_bits(pos.pieces(color, PieceKind::Pawn)),
            knights: count_bits(pos.pieces(color, PieceKind::Knight)),
            bishops: count_bits(pos.pieces(color, PieceKind::Bishop)),
            rooks: count_bits(pos.pieces(color, PieceKind::Rook)),
            queens: count_bits(pos.pieces(color, PieceKind::Queen)),
        }
    }

    fn value(&self) -> i32 {
        self.pawns as i32 * PAWN_VALUE
            + self.knights as i32 * KNIGHT_VALUE
            + self.bishops as i32 * BISHOP_VALUE
            + self.rooks as i32 * ROOK_VALUE
            + self.queens as i32 * QUEEN_VALUE
    }

    fn has_heavy_or_pawn(&self) -> bool {
        self.pawns + self.rooks + self.queens != 0
    }

    fn minors(&self) -> u32 {
        self.knights + self.bishops
    }
}

/// True when neither side has mating material: no pawns, rooks or queens,
/// and either at most one minor piece on the board or only bishops that all
/// stand on squares of one color.
pub fn is_insufficient_material(pos: &Position) -> bool {
    let white = MaterialCounts::of(pos, Color::White);
    let black = MaterialCounts::of(pos, Color::Black);
    if white.has_heavy_or_pawn() || black.has_heavy_or_pawn() {
        return false;
    }
    if white.minors() + black.minors() <= 1 {
        return true;
    }
    if white.knights + black.knights != 0 {
        return false;
    }
    let bishops = pos.pieces(Color::White, PieceKind::Bishop) | pos.pieces(Color::Black, PieceKind::Bishop);
    bishops & LIGHT_SQUARES == 0 || bishops & DARK_SQUARES == 0
}

/// Material balance relative to White, or the insufficient-material draw tag.
pub fn evaluate(pos: &Position) -> Abs {
    if is_insufficient_material(pos) {
        return Abs::InsufficientMaterial;
    }
    let white = MaterialCounts::of(pos, Color::White);
    let black = MaterialCounts::of(pos, Color::Black);
    Abs::Value(white.value() - black.value())
}

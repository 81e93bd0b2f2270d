// Bitboard masks, shifts, attack generators and bit iteration helpers

use crate::board::Color;

pub type Bitboard = u64;

// File masks (A is column 0, H column 7)
pub const FILE_A: Bitboard = 0x0101010101010101;
pub const FILE_B: Bitboard = FILE_A << 1;
pub const FILE_C: Bitboard = FILE_A << 2;
pub const FILE_D: Bitboard = FILE_A << 3;
pub const FILE_E: Bitboard = FILE_A << 4;
pub const FILE_F: Bitboard = FILE_A << 5;
pub const FILE_G: Bitboard = FILE_A << 6;
pub const FILE_H: Bitboard = FILE_A << 7;

pub const NOT_FILE_A: Bitboard = !FILE_A;
pub const NOT_FILE_H: Bitboard = !FILE_H;

// Rank masks (A1 is square 0)
pub const RANK_1: Bitboard = 0x00000000000000FF;
pub const RANK_2: Bitboard = RANK_1 << 8;
pub const RANK_3: Bitboard = RANK_1 << 16;
pub const RANK_4: Bitboard = RANK_1 << 24;
pub const RANK_5: Bitboard = RANK_1 << 32;
pub const RANK_6: Bitboard = RANK_1 << 40;
pub const RANK_7: Bitboard = RANK_1 << 48;
pub const RANK_8: Bitboard = RANK_1 << 56;

pub const FILES: [Bitboard; 8] = [
    FILE_A, FILE_B, FILE_C, FILE_D, FILE_E, FILE_F, FILE_G, FILE_H,
];
pub const RANKS: [Bitboard; 8] = [
    RANK_1, RANK_2, RANK_3, RANK_4, RANK_5, RANK_6, RANK_7, RANK_8,
];

pub const DARK_SQUARES: Bitboard = 0xAA55AA55AA55AA55;
pub const LIGHT_SQUARES: Bitboard = !DARK_SQUARES;
pub const LONG_DIAGONAL: Bitboard = 0x8040201008040201; // a1-h8
pub const LONG_ANTI_DIAGONAL: Bitboard = 0x0102040810204080; // h1-a8

// Bit operations
#[inline]
pub fn pop_lsb(bb: &mut Bitboard) -> Option<usize> {
    if *bb == 0 {
        return None;
    }
    let lsb = bb.trailing_zeros() as usize;
    *bb &= *bb - 1;
    Some(lsb)
}

/// Isolates the least significant set bit. Panics on an empty board.
#[inline]
pub fn lsb(bb: Bitboard) -> Bitboard {
    assert!(bb != 0, "lsb of an empty bitboard");
    bb & bb.wrapping_neg()
}

/// Clears the least significant set bit. Panics on an empty board.
#[inline]
pub fn reset_lsb(bb: Bitboard) -> Bitboard {
    assert!(bb != 0, "reset_lsb of an empty bitboard");
    bb & (bb - 1)
}

#[inline]
pub fn lsb_index(bb: Bitboard) -> Option<usize> {
    if bb == 0 {
        None
    } else {
        Some(bb.trailing_zeros() as usize)
    }
}

#[inline]
pub fn count_bits(bb: Bitboard) -> u32 {
    bb.count_ones()
}

#[inline]
pub fn square_bb(sq: usize) -> Bitboard {
    1u64 << sq
}

pub struct BitIter {
    bb: Bitboard,
}

impl Iterator for BitIter {
    type Item = usize;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        pop_lsb(&mut self.bb)
    }
}

#[inline]
pub fn iter_bits(bb: Bitboard) -> BitIter {
    BitIter { bb }
}

// One-step shifts; east/west mask out the file that would wrap around
#[inline]
pub fn north(bb: Bitboard) -> Bitboard {
    bb << 8
}
#[inline]
pub fn south(bb: Bitboard) -> Bitboard {
    bb >> 8
}
#[inline]
pub fn east(bb: Bitboard) -> Bitboard {
    (bb << 1) & NOT_FILE_A
}
#[inline]
pub fn west(bb: Bitboard) -> Bitboard {
    (bb >> 1) & NOT_FILE_H
}
#[inline]
pub fn north_east(bb: Bitboard) -> Bitboard {
    east(north(bb))
}
#[inline]
pub fn north_west(bb: Bitboard) -> Bitboard {
    west(north(bb))
}
#[inline]
pub fn south_east(bb: Bitboard) -> Bitboard {
    east(south(bb))
}
#[inline]
pub fn south_west(bb: Bitboard) -> Bitboard {
    west(south(bb))
}

// Precomputed leaper tables using OnceLock for thread safety
use std::sync::OnceLock;

static KNIGHT_ATTACKS: OnceLock<[Bitboard; 64]> = OnceLock::new();
static KING_ATTACKS: OnceLock<[Bitboard; 64]> = OnceLock::new();

fn init_knight_attacks() -> [Bitboard; 64] {
    let mut attacks = [0u64; 64];
    for (sq, slot) in attacks.iter_mut().enumerate() {
        let b = square_bb(sq);
        *slot = south_west(south(b))
            | south_east(south(b))
            | south_west(west(b))
            | south_east(east(b))
            | north_west(west(b))
            | north_east(east(b))
            | north_west(north(b))
            | north_east(north(b));
    }
    attacks
}

fn init_king_attacks() -> [Bitboard; 64] {
    let mut attacks = [0u64; 64];
    for (sq, slot) in attacks.iter_mut().enumerate() {
        let b = square_bb(sq);
        *slot = south_west(b)
            | south(b)
            | south_east(b)
            | west(b)
            | east(b)
            | north_west(b)
            | north(b)
            | north_east(b);
    }
    attacks
}

#[inline(always)]
pub fn init_attack_tables() {
    KNIGHT_ATTACKS.get_or_init(init_knight_attacks);
    KING_ATTACKS.get_or_init(init_king_attacks);
}

#[inline]
pub fn knight_attacks(sq: usize) -> Bitboard {
    KNIGHT_ATTACKS.get_or_init(init_knight_attacks)[sq]
}

#[inline]
pub fn king_attacks(sq: usize) -> Bitboard {
    KING_ATTACKS.get_or_init(init_king_attacks)[sq]
}

/// Squares reached by sliding `piece` in one direction over `empty` squares,
/// including the first blocker and excluding the origin.
#[inline]
pub fn attack_fill(mut piece: Bitboard, empty: Bitboard, shift: fn(Bitboard) -> Bitboard) -> Bitboard {
    let mut fill = 0u64;
    while piece != 0 {
        fill |= piece;
        piece = shift(piece) & empty;
    }
    shift(fill)
}

#[inline]
pub fn bishop_attacks(sq: usize, occ: Bitboard) -> Bitboard {
    let b = square_bb(sq);
    let empty = !occ;
    attack_fill(b, empty, south_west)
        | attack_fill(b, empty, south_east)
        | attack_fill(b, empty, north_west)
        | attack_fill(b, empty, north_east)
}

#[inline]
pub fn rook_attacks(sq: usize, occ: Bitboard) -> Bitboard {
    let b = square_bb(sq);
    let empty = !occ;
    attack_fill(b, empty, south)
        | attack_fill(b, empty, west)
        | attack_fill(b, empty, east)
        | attack_fill(b, empty, north)
}

#[inline]
pub fn queen_attacks(sq: usize, occ: Bitboard) -> Bitboard {
    rook_attacks(sq, occ) | bishop_attacks(sq, occ)
}

/// Squares attacked by pawns of `color` standing on `pawns`, occupancy ignored.
#[inline]
pub fn pawn_attacks(pawns: Bitboard, color: Color) -> Bitboard {
    match color {
        Color::White => north_west(pawns) | north_east(pawns),
        Color::Black => south_west(pawns) | south_east(pawns),
    }
}

/// Squares pawns of `color` can advance to: one step if empty, two from the
/// start rank if both squares are empty.
#[inline]
pub fn pawn_advances(pawns: Bitboard, empty: Bitboard, color: Color) -> Bitboard {
    match color {
        Color::White => {
            let single = north(pawns) & empty;
            single | (north(single & RANK_3) & empty)
        }
        Color::Black => {
            let single = south(pawns) & empty;
            single | (south(single & RANK_6) & empty)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A1: usize = 0;
    const H1: usize = 7;
    const A8: usize = 56;
    const H8: usize = 63;

    fn sq(name: &str) -> Bitboard {
        let b = name.as_bytes();
        square_bb(((b[1] - b'1') * 8 + (b[0] - b'a')) as usize)
    }

    fn around_d4() -> Bitboard {
        ((FILE_C | FILE_D | FILE_E) & (RANK_3 | RANK_4 | RANK_5)) ^ sq("d4")
    }

    #[test]
    fn bit_primitives() {
        let b = sq("c3") | sq("f6");
        assert_eq!(lsb(b), sq("c3"));
        assert_eq!(reset_lsb(b), sq("f6"));
        assert_eq!(lsb_index(b), Some(18));
        assert_eq!(lsb_index(0), None);
        assert_eq!(count_bits(b), 2);
        assert_eq!(iter_bits(b).collect::<Vec<_>>(), vec![18, 45]);
    }

    #[test]
    #[should_panic]
    fn lsb_of_empty_board_panics() {
        lsb(0);
    }

    #[test]
    fn fill_along_files_and_ranks() {
        let a1 = square_bb(A1);
        let h8 = square_bb(H8);
        assert_eq!(attack_fill(a1, !a1, north), FILE_A ^ a1);
        assert_eq!(attack_fill(a1, !a1, south), 0);
        assert_eq!(attack_fill(a1, !a1, east), RANK_1 ^ a1);
        assert_eq!(attack_fill(a1, !a1, west), 0);
        assert_eq!(attack_fill(h8, !h8, south), FILE_H ^ h8);
        assert_eq!(attack_fill(h8, !h8, west), RANK_8 ^ h8);
        assert_eq!(attack_fill(square_bb(H1), !square_bb(H1), east), 0);
    }

    #[test]
    fn fill_along_diagonals() {
        let a1 = square_bb(A1);
        let h8 = square_bb(H8);
        let a8 = square_bb(A8);
        let h1 = square_bb(H1);
        assert_eq!(attack_fill(a1, !a1, north_east), LONG_DIAGONAL ^ a1);
        assert_eq!(attack_fill(h8, !h8, south_west), LONG_DIAGONAL ^ h8);
        assert_eq!(attack_fill(a8, !a8, south_east), LONG_ANTI_DIAGONAL ^ a8);
        assert_eq!(attack_fill(h1, !h1, north_west), LONG_ANTI_DIAGONAL ^ h1);
        assert_eq!(attack_fill(a1, !a1, north_west), 0);
    }

    #[test]
    fn fill_stops_on_first_blocker() {
        let d4 = sq("d4");
        assert_eq!(attack_fill(d4, 0, south), sq("d3"));
        assert_eq!(attack_fill(d4, around_d4(), south), sq("d3") | sq("d2"));
        assert_eq!(attack_fill(d4, around_d4(), north_east), sq("e5") | sq("f6"));
        assert_eq!(attack_fill(d4, around_d4(), west), sq("c4") | sq("b4"));
    }

    #[test]
    fn slider_attacks() {
        assert_eq!(rook_attacks(A1, square_bb(A1)), (FILE_A | RANK_1) ^ square_bb(A1));
        assert_eq!(bishop_attacks(A1, square_bb(A1)), LONG_DIAGONAL ^ square_bb(A1));

        let d4 = 27;
        assert_eq!(
            rook_attacks(d4, !0),
            sq("d3") | sq("c4") | sq("e4") | sq("d5")
        );
        assert_eq!(
            bishop_attacks(d4, !0),
            sq("c3") | sq("e3") | sq("c5") | sq("e5")
        );
        assert_eq!(queen_attacks(d4, !0), around_d4());
        let occ = !around_d4();
        assert_eq!(
            queen_attacks(d4, occ),
            around_d4()
                | sq("b2")
                | sq("d2")
                | sq("f2")
                | sq("b4")
                | sq("f4")
                | sq("b6")
                | sq("d6")
                | sq("f6")
        );
    }

    #[test]
    fn leaper_tables() {
        init_attack_tables();
        assert_eq!(knight_attacks(A1), sq("b3") | sq("c2"));
        assert_eq!(knight_attacks(H8), sq("g6") | sq("f7"));
        assert_eq!(count_bits(knight_attacks(27)), 8);
        assert_eq!(king_attacks(A1), sq("a2") | sq("b1") | sq("b2"));
        assert_eq!(count_bits(king_attacks(27)), 8);
        assert_eq!(king_attacks(H1), sq("g1") | sq("g2") | sq("h2"));
    }

    #[test]
    fn pawn_advances_by_color() {
        let e2 = sq("e2");
        assert_eq!(pawn_advances(e2, !e2, Color::White), sq("e3") | sq("e4"));
        assert_eq!(pawn_advances(e2, !(e2 | sq("e4")), Color::White), sq("e3"));
        assert_eq!(pawn_advances(e2, !(e2 | sq("e3")), Color::White), 0);
        assert_eq!(pawn_advances(sq("a5"), !sq("a5"), Color::White), sq("a6"));
        assert_eq!(pawn_advances(sq("h7"), !sq("h7"), Color::White), sq("h8"));

        let e7 = sq("e7");
        assert_eq!(pawn_advances(e7, !e7, Color::Black), sq("e6") | sq("e5"));
        assert_eq!(pawn_advances(e7, !(e7 | sq("e6")), Color::Black), 0);
        assert_eq!(pawn_advances(sq("h4"), !sq("h4"), Color::Black), sq("h3"));
        assert_eq!(pawn_advances(sq("a2"), !sq("a2"), Color::Black), sq("a1"));
    }

    #[test]
    fn pawn_attacks_by_color() {
        assert_eq!(pawn_attacks(sq("a2"), Color::White), sq("b3"));
        assert_eq!(pawn_attacks(sq("e5"), Color::White), sq("d6") | sq("f6"));
        assert_eq!(pawn_attacks(sq("h7"), Color::White), sq("g8"));
        assert_eq!(pawn_attacks(sq("a7"), Color::Black), sq("b6"));
        assert_eq!(pawn_attacks(sq("e2"), Color::Black), sq("d1") | sq("f1"));
        assert_eq!(pawn_attacks(sq("h4"), Color::Black), sq("g3"));
    }
}

// Move encoding and pseudo-legal / legal move generation

use std::fmt;

use crate::board::{
    square_name, Color, PieceKind, Position, CASTLE_BLACK_KING, CASTLE_BLACK_QUEEN,
    CASTLE_WHITE_KING, CASTLE_WHITE_QUEEN,
};
use crate::utils::{
    bishop_attacks, iter_bits, king_attacks, knight_attacks, pawn_advances, pawn_attacks,
    queen_attacks, rook_attacks, square_bb, Bitboard, RANK_1, RANK_8,
};

// 32-bit layout
// Bits 0-5: from (0-63)
// Bits 6-11: to (0-63)
// Bits 12-15: piece (0-5)
// Bits 16-19: captured (0-5, 0xF = none)
// Bits 20-23: promotion (0-5, 0xF = none)
// Bits 24-31: flags
pub const FLAG_NONE: u32 = 0;
pub const FLAG_EN_PASSANT: u32 = 1 << 24;
pub const FLAG_CASTLE_KING: u32 = 1 << 25;
pub const FLAG_CASTLE_QUEEN: u32 = 1 << 26;
pub const FLAG_PROMOTION: u32 = 1 << 27;
pub const FLAG_CAPTURE: u32 = 1 << 28;

const NO_KIND: u32 = 0xF;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    pub fn new(
        from: usize,
        to: usize,
        piece: PieceKind,
        captured: Option<PieceKind>,
        promotion: Option<PieceKind>,
        flags: u32,
    ) -> Move {
        debug_assert!(from != to);
        let cap = captured.map(|p| p as u32).unwrap_or(NO_KIND);
        let prom = promotion.map(|p| p as u32).unwrap_or(NO_KIND);
        let mut flags = flags;
        if captured.is_some() {
            flags |= FLAG_CAPTURE;
        }
        if promotion.is_some() {
            flags |= FLAG_PROMOTION;
        }
        Move(
            (from as u32 & 0x3F)
                | ((to as u32 & 0x3F) << 6)
                | ((piece as u32 & 0xF) << 12)
                | ((cap & 0xF) << 16)
                | ((prom & 0xF) << 20)
                | flags,
        )
    }

    #[inline]
    pub fn from(self) -> usize {
        (self.0 & 0x3F) as usize
    }

    #[inline]
    pub fn to(self) -> usize {
        ((self.0 >> 6) & 0x3F) as usize
    }

    #[inline]
    pub fn piece(self) -> PieceKind {
        match PieceKind::from_index(((self.0 >> 12) & 0xF) as usize) {
            Some(kind) => kind,
            None => unreachable!("move {:#x} has no moving piece", self.0),
        }
    }

    #[inline]
    pub fn captured(self) -> Option<PieceKind> {
        PieceKind::from_index(((self.0 >> 16) & 0xF) as usize)
    }

    #[inline]
    pub fn promotion(self) -> Option<PieceKind> {
        PieceKind::from_index(((self.0 >> 20) & 0xF) as usize)
    }

    #[inline]
    pub fn flag(self, flag: u32) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn is_capture(self) -> bool {
        self.flag(FLAG_CAPTURE)
    }

    #[inline]
    pub fn is_en_passant(self) -> bool {
        self.flag(FLAG_EN_PASSANT)
    }

    #[inline]
    pub fn is_castle_kingside(self) -> bool {
        self.flag(FLAG_CASTLE_KING)
    }

    #[inline]
    pub fn is_castle_queenside(self) -> bool {
        self.flag(FLAG_CASTLE_QUEEN)
    }

    #[inline]
    pub fn is_castle(self) -> bool {
        self.flag(FLAG_CASTLE_KING | FLAG_CASTLE_QUEEN)
    }

    /// Square of the captured piece; behind the destination for en passant.
    #[inline]
    pub fn capture_square(self) -> usize {
        if self.is_en_passant() {
            self.to() ^ 8
        } else {
            self.to()
        }
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// UCI coordinate form: "e2e4", "e7e8q".
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", square_name(self.from()), square_name(self.to()))?;
        if let Some(promo) = self.promotion() {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self)
    }
}

const PROMOTIONS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

// Opposing piece on `sq`; the king is never a capture target
#[inline]
fn victim_on(pos: &Position, them: Color, sq: usize) -> Option<PieceKind> {
    let bit = square_bb(sq);
    if pos.occupied_by(them) & bit == 0 {
        return None;
    }
    PieceKind::ALL[..5]
        .iter()
        .copied()
        .find(|&kind| pos.pieces(them, kind) & bit != 0)
}

fn push_pawn_move(from: usize, to: usize, captured: Option<PieceKind>, out: &mut Vec<Move>) {
    if square_bb(to) & (RANK_1 | RANK_8) != 0 {
        for promo in PROMOTIONS {
            out.push(Move::new(from, to, PieceKind::Pawn, captured, Some(promo), FLAG_NONE));
        }
    } else {
        out.push(Move::new(from, to, PieceKind::Pawn, captured, None, FLAG_NONE));
    }
}

pub fn generate_pawn_moves(pos: &Position, out: &mut Vec<Move>) {
    let us = pos.side_to_move();
    let them = us.opponent();
    let empty = !pos.occupied();
    let targets = pos.occupied_by(them) & !pos.pieces(them, PieceKind::King);
    let ep_capturers = pos.ep_capturers();

    for from in iter_bits(pos.pieces(us, PieceKind::Pawn)) {
        let origin = square_bb(from);
        for to in iter_bits(pawn_advances(origin, empty, us)) {
            push_pawn_move(from, to, None, out);
        }
        for to in iter_bits(pawn_attacks(origin, us) & targets) {
            push_pawn_move(from, to, victim_on(pos, them, to), out);
        }
        if ep_capturers & origin != 0 {
            if let Some(ep) = pos.en_passant() {
                out.push(Move::new(
                    from,
                    ep,
                    PieceKind::Pawn,
                    Some(PieceKind::Pawn),
                    None,
                    FLAG_EN_PASSANT,
                ));
            }
        }
    }
}

/// Non-pawn moves of one piece kind, castling excluded.
pub fn generate_piece_moves(pos: &Position, kind: PieceKind, out: &mut Vec<Move>) {
    let us = pos.side_to_move();
    let them = us.opponent();
    let occ = pos.occupied();
    let allowed = !pos.occupied_by(us) & !pos.pieces(them, PieceKind::King);

    for from in iter_bits(pos.pieces(us, kind)) {
        let attacks: Bitboard = match kind {
            PieceKind::Knight => knight_attacks(from),
            PieceKind::Bishop => bishop_attacks(from, occ),
            PieceKind::Rook => rook_attacks(from, occ),
            PieceKind::Queen => queen_attacks(from, occ),
            PieceKind::King => king_attacks(from),
            PieceKind::Pawn => unreachable!("pawns have their own generator"),
        };
        for to in iter_bits(attacks & allowed) {
            out.push(Move::new(from, to, kind, victim_on(pos, them, to), None, FLAG_NONE));
        }
    }
}

// Empty squares between king and rook, and squares the king stands on or crosses
const CASTLE_EMPTY_KING: [Bitboard; 2] = [0x60, 0x60 << 56];
const CASTLE_EMPTY_QUEEN: [Bitboard; 2] = [0x0E, 0x0E << 56];
const CASTLE_KING_PATH_KING: [Bitboard; 2] = [0x70, 0x70 << 56];
const CASTLE_KING_PATH_QUEEN: [Bitboard; 2] = [0x1C, 0x1C << 56];

fn can_castle(pos: &Position, right: u8, empty_squares: Bitboard, king_path: Bitboard, rook_sq: usize) -> bool {
    let us = pos.side_to_move();
    pos.castling_rights() & right != 0
        && pos.occupied() & empty_squares == 0
        && pos.pieces(us, PieceKind::Rook) & square_bb(rook_sq) != 0
        && !iter_bits(king_path).any(|sq| pos.is_square_attacked(sq, us.opponent()))
}

pub fn generate_castling_moves(pos: &Position, out: &mut Vec<Move>) {
    let us = pos.side_to_move();
    let (home, king_right, queen_right) = match us {
        Color::White => (4, CASTLE_WHITE_KING, CASTLE_WHITE_QUEEN),
        Color::Black => (60, CASTLE_BLACK_KING, CASTLE_BLACK_QUEEN),
    };
    if pos.king_square(us) != home {
        return;
    }
    let c = us.index();
    if can_castle(pos, queen_right, CASTLE_EMPTY_QUEEN[c], CASTLE_KING_PATH_QUEEN[c], home - 4) {
        out.push(Move::new(home, home - 2, PieceKind::King, None, None, FLAG_CASTLE_QUEEN));
    }
    if can_castle(pos, king_right, CASTLE_EMPTY_KING[c], CASTLE_KING_PATH_KING[c], home + 3) {
        out.push(Move::new(home, home + 2, PieceKind::King, None, None, FLAG_CASTLE_KING));
    }
}

const WINNING: usize = 0;
const EQUAL: usize = 1;
const LOSING: usize = 2;
const QUIET: usize = 3;

/// Ordering bucket, assuming the victim is defended.
fn capture_class(mv: Move) -> usize {
    let Some(victim) = mv.captured() else {
        return QUIET;
    };
    let attacker = mv.piece();
    let minor_trade = matches!(
        (attacker, victim),
        (PieceKind::Bishop, PieceKind::Knight) | (PieceKind::Knight, PieceKind::Bishop)
    );
    if attacker == victim || minor_trade {
        EQUAL
    } else if attacker < victim {
        WINNING
    } else {
        LOSING
    }
}

// Stable counting sort by capture class
fn order_moves(moves: Vec<Move>) -> Vec<Move> {
    let mut counts = [0usize; 4];
    for &mv in &moves {
        counts[capture_class(mv)] += 1;
    }
    let mut next = [0usize; 4];
    for class in 1..4 {
        next[class] = next[class - 1] + counts[class - 1];
    }
    let mut sorted = moves.clone();
    for mv in moves {
        let class = capture_class(mv);
        sorted[next[class]] = mv;
        next[class] += 1;
    }
    sorted
}

/// All pseudo-legal moves, winning captures first and quiet moves last.
pub fn pseudo_legal_moves(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    generate_pawn_moves(pos, &mut moves);
    for kind in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        generate_piece_moves(pos, kind, &mut moves);
    }
    generate_castling_moves(pos, &mut moves);
    order_moves(moves)
}

pub fn legal_moves(pos: &Position) -> Vec<Move> {
    pseudo_legal_moves(pos)
        .into_iter()
        .filter(|&mv| pos.make(mv).is_legal())
        .collect()
}

/// Stops at the first legal move found, one piece kind at a time.
pub fn has_legal_move(pos: &Position) -> bool {
    let mut moves = Vec::with_capacity(32);
    let legal_in = |moves: &[Move]| moves.iter().any(|&mv| pos.make(mv).is_legal());

    generate_pawn_moves(pos, &mut moves);
    if legal_in(&moves) {
        return true;
    }
    for kind in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        moves.clear();
        generate_piece_moves(pos, kind, &mut moves);
        if legal_in(&moves) {
            return true;
        }
    }
    // Castling is only reachable when a plain king move is legal too
    false
}

/// Number of leaf nodes of the legal move tree of the given depth.
pub fn perft(pos: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves(pos);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves.iter().map(|&mv| perft(&pos.make(mv), depth - 1)).sum()
}

/// Per-root-move perft counts, in generation order.
pub fn perft_divide(pos: &Position, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    legal_moves(pos)
        .into_iter()
        .map(|mv| (mv, perft(&pos.make(mv), depth - 1)))
        .collect()
}

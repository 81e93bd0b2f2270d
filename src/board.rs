// Position model: squares A1=0, B1=1, ..., H8=63 across every module.

use crate::movegen::{self, Move};
use crate::utils::{
    bishop_attacks, iter_bits, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
    square_bb, Bitboard,
};
use crate::zobrist;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<PieceKind> {
        PieceKind::ALL.get(i).copied()
    }

    /// Lowercase letter, as used by FEN for Black and by UCI promotions.
    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

// Castling rights: bit 3=K, bit 2=Q, bit 1=k, bit 0=q
pub const CASTLE_WHITE_KING: u8 = 0b1000;
pub const CASTLE_WHITE_QUEEN: u8 = 0b0100;
pub const CASTLE_BLACK_KING: u8 = 0b0010;
pub const CASTLE_BLACK_QUEEN: u8 = 0b0001;

#[inline]
pub fn castling_rights_of(color: Color) -> u8 {
    match color {
        Color::White => CASTLE_WHITE_KING | CASTLE_WHITE_QUEEN,
        Color::Black => CASTLE_BLACK_KING | CASTLE_BLACK_QUEEN,
    }
}

/// The right that is lost when the rook home square `sq` is vacated.
#[inline]
fn rook_home_right(sq: usize) -> u8 {
    match sq {
        7 => CASTLE_WHITE_KING,
        0 => CASTLE_WHITE_QUEEN,
        63 => CASTLE_BLACK_KING,
        56 => CASTLE_BLACK_QUEEN,
        _ => 0,
    }
}

// Square helpers
#[inline]
pub fn rank_of(sq: usize) -> usize {
    sq >> 3
}

#[inline]
pub fn file_of(sq: usize) -> usize {
    sq & 7
}

/// a1-h8 direction diagonals: 0 at h1, 14 at a8.
#[inline]
pub fn diagonal(sq: usize) -> usize {
    7 + rank_of(sq) - file_of(sq)
}

/// a8-h1 direction diagonals: 0 at a1, 14 at h8.
#[inline]
pub fn anti_diagonal(sq: usize) -> usize {
    rank_of(sq) + file_of(sq)
}

/// Convert a square index to coordinate notation (0 -> "a1", 63 -> "h8")
pub fn square_name(sq: usize) -> String {
    let file_char = (b'a' + file_of(sq) as u8) as char;
    let rank_char = (b'1' + rank_of(sq) as u8) as char;
    format!("{}{}", file_char, rank_char)
}

/// Convert coordinate notation to a square index ("e2" -> 12)
pub fn parse_square(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some(((rank - b'1') * 8 + (file - b'a')) as usize)
}

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A complete game state. Positions are values: `make` returns a new one and
/// leaves the original untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) king_sq: [u8; 2],
    pub(crate) castling: u8,
    /// En-passant target square (the square the double-pushed pawn skipped)
    pub(crate) ep: Option<u8>,
    pub(crate) halfmove: u16,
    pub(crate) fullmove: u16,
    pub(crate) side: Color,
    pub(crate) zobrist: u64,
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    /// Board with no pieces; filled by the FEN reader via `put_piece`.
    pub(crate) fn empty() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupied: [0; 2],
            king_sq: [0; 2],
            castling: 0,
            ep: None,
            halfmove: 0,
            fullmove: 1,
            side: Color::White,
            zobrist: 0,
        }
    }

    pub fn startpos() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut pos = Self::empty();
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            pos.put_piece(file, kind, Color::White);
            pos.put_piece(8 + file, PieceKind::Pawn, Color::White);
            pos.put_piece(48 + file, PieceKind::Pawn, Color::Black);
            pos.put_piece(56 + file, kind, Color::Black);
        }
        pos.castling = castling_rights_of(Color::White) | castling_rights_of(Color::Black);
        pos.zobrist = zobrist::recalc_zobrist(&pos);
        pos
    }

    // Places a piece without touching the hash; callers recompute it afterwards
    pub(crate) fn put_piece(&mut self, sq: usize, kind: PieceKind, color: Color) {
        let bit = square_bb(sq);
        self.pieces[color.index()][kind.index()] |= bit;
        self.occupied[color.index()] |= bit;
        if kind == PieceKind::King {
            self.king_sq[color.index()] = sq as u8;
        }
    }

    // Flips one piece on or off, keeping the aggregate and the hash in step
    #[inline]
    fn toggle(&mut self, color: Color, kind: PieceKind, sq: usize) {
        let bit = square_bb(sq);
        self.pieces[color.index()][kind.index()] ^= bit;
        self.occupied[color.index()] ^= bit;
        self.zobrist ^= zobrist::piece_key(color, kind, sq);
    }

    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied[0] | self.occupied[1]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> usize {
        self.king_sq[color.index()] as usize
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn castling_rights(&self) -> u8 {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<usize> {
        self.ep.map(|sq| sq as usize)
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.zobrist
    }

    /// Kind and color of the piece on `sq`, if any.
    pub fn piece_on(&self, sq: usize) -> Option<(PieceKind, Color)> {
        let bit = square_bb(sq);
        for color in [Color::White, Color::Black] {
            if self.occupied_by(color) & bit == 0 {
                continue;
            }
            for kind in PieceKind::ALL {
                if self.pieces(color, kind) & bit != 0 {
                    return Some((kind, color));
                }
            }
            unreachable!(
                "square {} set in the {:?} aggregate but in none of its piece sets",
                square_name(sq),
                color
            );
        }
        None
    }

    /// Pawns of the side to move standing next to the pawn that just made a
    /// double step, i.e. the pawns that may capture en passant.
    pub fn ep_capturers(&self) -> Bitboard {
        let Some(ep) = self.ep else {
            return 0;
        };
        let pawn_sq = (ep ^ 8) as usize;
        let mut adjacent = 0;
        if file_of(pawn_sq) != 0 {
            adjacent |= square_bb(pawn_sq - 1);
        }
        if file_of(pawn_sq) != 7 {
            adjacent |= square_bb(pawn_sq + 1);
        }
        adjacent & self.pieces(self.side, PieceKind::Pawn)
    }

    pub(crate) fn ep_hash(&self) -> u64 {
        iter_bits(self.ep_capturers()).fold(0, |h, sq| h ^ zobrist::ep_key(file_of(sq)))
    }

    /// Applies a pseudo-legal move and returns the resulting position. The
    /// result may leave the mover in check; see `is_legal`.
    pub fn make(&self, mv: Move) -> Position {
        let us = self.side;
        let them = us.opponent();
        let from = mv.from();
        let to = mv.to();
        let piece = mv.piece();
        debug_assert!(from != to, "null move {:?}", mv);
        debug_assert!(
            self.pieces(us, piece) & square_bb(from) != 0,
            "no {:?} {:?} on {} for {:?}",
            us,
            piece,
            square_name(from),
            mv
        );

        let mut next = *self;
        let mut castling = self.castling;

        // Capturers must be read before any pawn moves
        next.zobrist ^= self.ep_hash();

        next.toggle(us, piece, from);
        next.toggle(us, piece, to);

        if let Some(victim) = mv.captured() {
            let cap_sq = mv.capture_square();
            debug_assert!(self.pieces(them, victim) & square_bb(cap_sq) != 0);
            next.toggle(them, victim, cap_sq);
            castling &= !(rook_home_right(cap_sq) & castling_rights_of(them));
        }

        if mv.is_castle_kingside() {
            next.toggle(us, PieceKind::Rook, to + 1);
            next.toggle(us, PieceKind::Rook, to - 1);
        } else if mv.is_castle_queenside() {
            next.toggle(us, PieceKind::Rook, to - 2);
            next.toggle(us, PieceKind::Rook, to + 1);
        }

        if let Some(promo) = mv.promotion() {
            next.toggle(us, PieceKind::Pawn, to);
            next.toggle(us, promo, to);
        }

        match piece {
            PieceKind::King => {
                castling &= !castling_rights_of(us);
                next.king_sq[us.index()] = to as u8;
            }
            PieceKind::Rook => castling &= !(rook_home_right(from) & castling_rights_of(us)),
            _ => {}
        }
        next.zobrist ^= zobrist::castling_key(self.castling ^ castling);
        next.castling = castling;

        if piece == PieceKind::Pawn || mv.captured().is_some() {
            next.halfmove = 0;
        } else {
            next.halfmove = self.halfmove.saturating_add(1);
        }
        if us == Color::Black {
            next.fullmove = self.fullmove.saturating_add(1);
        }

        next.side = them;
        next.zobrist ^= zobrist::side_key();

        next.ep = None;
        if piece == PieceKind::Pawn && from ^ to == 16 {
            next.ep = Some(((from + to) / 2) as u8);
            next.zobrist ^= next.ep_hash();
        }

        next
    }

    // Legality helpers -------------------------------------------

    pub fn is_square_attacked(&self, sq: usize, by: Color) -> bool {
        let occ = self.occupied();
        let queens = self.pieces(by, PieceKind::Queen);
        // A `by` pawn attacks sq iff an opposing pawn on sq would attack it back
        pawn_attacks(square_bb(sq), by.opponent()) & self.pieces(by, PieceKind::Pawn) != 0
            || knight_attacks(sq) & self.pieces(by, PieceKind::Knight) != 0
            || king_attacks(sq) & self.pieces(by, PieceKind::King) != 0
            || bishop_attacks(sq, occ) & (self.pieces(by, PieceKind::Bishop) | queens) != 0
            || rook_attacks(sq, occ) & (self.pieces(by, PieceKind::Rook) | queens) != 0
    }

    /// True if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.is_square_attacked(self.king_square(self.side), self.side.opponent())
    }

    /// True if the side that just moved did not leave its own king attacked.
    pub fn is_legal(&self) -> bool {
        let mover = self.side.opponent();
        !self.is_square_attacked(self.king_square(mover), self.side)
    }

    /// True if the side to move has no legal move.
    pub fn is_terminal(&self) -> bool {
        !movegen::has_legal_move(self)
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.is_terminal()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.is_terminal()
    }
}

// Board diagram, rank 8 on top
impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                match self.piece_on(rank * 8 + file) {
                    Some((kind, Color::White)) => write!(f, "{} ", kind.to_char().to_ascii_uppercase())?,
                    Some((kind, Color::Black)) => write!(f, "{} ", kind.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

// FEN parsing and serialization for Position
use std::str::FromStr;

use thiserror::Error;

use crate::board::{
    parse_square, rank_of, square_name, Color, PieceKind, Position, CASTLE_BLACK_KING,
    CASTLE_BLACK_QUEEN, CASTLE_WHITE_KING, CASTLE_WHITE_QUEEN,
};
use crate::utils::square_bb;
use crate::zobrist;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("{0} fields (need 6)")]
    FieldCount(usize),
    #[error("{0} rows (need 8)")]
    RowCount(usize),
    #[error("{squares} squares in row {row:?} (need 8)")]
    RowLength { row: String, squares: usize },
    #[error("invalid character {ch:?} in row {row:?}")]
    InvalidPiece { row: String, ch: char },
    #[error("{count} {color:?} kings (need 1)")]
    KingCount { color: Color, count: usize },
    #[error("invalid active player field {0:?}")]
    InvalidSide(String),
    #[error("invalid character in castling field {0:?}")]
    InvalidCastling(String),
    #[error("invalid en passant square {0:?}")]
    InvalidEnPassant(String),
    #[error("invalid move counter {0:?}")]
    InvalidCounter(String),
}

fn parse_placement(placement: &str, pos: &mut Position) -> Result<(), FenError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::RowCount(rows.len()));
    }
    for (r, row) in rows.iter().enumerate() {
        // Validate the whole row before placing anything
        let mut squares = 0usize;
        for ch in row.chars() {
            match ch {
                '1'..='8' => squares += ch as usize - '0' as usize,
                _ if PieceKind::from_char(ch).is_some() => squares += 1,
                _ => {
                    return Err(FenError::InvalidPiece {
                        row: row.to_string(),
                        ch,
                    })
                }
            }
        }
        if squares != 8 {
            return Err(FenError::RowLength {
                row: row.to_string(),
                squares,
            });
        }

        let mut sq = 56 - 8 * r;
        for ch in row.chars() {
            if let Some(gap) = ch.to_digit(10) {
                sq += gap as usize;
                continue;
            }
            if let Some(kind) = PieceKind::from_char(ch) {
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                pos.put_piece(sq, kind, color);
                sq += 1;
            }
        }
    }
    for color in [Color::White, Color::Black] {
        let count = pos.pieces(color, PieceKind::King).count_ones() as usize;
        if count != 1 {
            return Err(FenError::KingCount { color, count });
        }
    }
    Ok(())
}

// Rights must appear at most once each, in KQkq order
fn parse_castling(field: &str) -> Result<u8, FenError> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights = 0u8;
    let mut last = u8::MAX;
    for ch in field.chars() {
        let right = match ch {
            'K' => CASTLE_WHITE_KING,
            'Q' => CASTLE_WHITE_QUEEN,
            'k' => CASTLE_BLACK_KING,
            'q' => CASTLE_BLACK_QUEEN,
            _ => return Err(FenError::InvalidCastling(field.to_string())),
        };
        // Each right is a lower bit than the one before it
        if right >= last {
            return Err(FenError::InvalidCastling(field.to_string()));
        }
        last = right;
        rights |= right;
    }
    Ok(rights)
}

/// The target must lie behind an enemy pawn that could just have made a
/// double step: third rank from the mover's point of view, the pawn in front
/// of it, and both the target and the pawn's start square empty.
fn parse_en_passant(field: &str, pos: &Position) -> Result<Option<u8>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let invalid = || FenError::InvalidEnPassant(field.to_string());
    let sq = parse_square(field).ok_or_else(invalid)?;
    let (target_rank, start_sq) = match pos.side {
        Color::White => (5, sq + 8),
        Color::Black => (2, sq.wrapping_sub(8)),
    };
    if rank_of(sq) != target_rank {
        return Err(invalid());
    }
    let them = pos.side.opponent();
    let pawn_sq = sq ^ 8;
    let occupied = pos.occupied();
    if pos.pieces(them, PieceKind::Pawn) & square_bb(pawn_sq) == 0
        || occupied & (square_bb(sq) | square_bb(start_sq)) != 0
    {
        return Err(invalid());
    }
    Ok(Some(sq as u8))
}

fn parse_counter(field: &str) -> Result<u16, FenError> {
    field
        .parse()
        .map_err(|_| FenError::InvalidCounter(field.to_string()))
}

impl Position {
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        let mut pos = Position::empty();
        parse_placement(fields[0], &mut pos)?;
        pos.side = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSide(other.to_string())),
        };
        pos.castling = parse_castling(fields[2])?;
        pos.ep = parse_en_passant(fields[3], &pos)?;
        pos.halfmove = parse_counter(fields[4])?;
        pos.fullmove = parse_counter(fields[5])?;
        pos.zobrist = zobrist::recalc_zobrist(&pos);
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut s = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut gap = 0;
            for file in 0..8 {
                match self.piece_on(rank * 8 + file) {
                    Some((kind, color)) => {
                        if gap != 0 {
                            s.push_str(&gap.to_string());
                            gap = 0;
                        }
                        let ch = kind.to_char();
                        s.push(if color == Color::White {
                            ch.to_ascii_uppercase()
                        } else {
                            ch
                        });
                    }
                    None => gap += 1,
                }
            }
            if gap != 0 {
                s.push_str(&gap.to_string());
            }
            if rank != 0 {
                s.push('/');
            }
        }

        s.push_str(match self.side {
            Color::White => " w ",
            Color::Black => " b ",
        });
        if self.castling == 0 {
            s.push('-');
        }
        for (right, ch) in [
            (CASTLE_WHITE_KING, 'K'),
            (CASTLE_WHITE_QUEEN, 'Q'),
            (CASTLE_BLACK_KING, 'k'),
            (CASTLE_BLACK_QUEEN, 'q'),
        ] {
            if self.castling & right != 0 {
                s.push(ch);
            }
        }
        s.push(' ');
        match self.ep {
            Some(sq) => s.push_str(&square_name(sq as usize)),
            None => s.push('-'),
        }
        s.push_str(&format!(" {} {}", self.halfmove, self.fullmove));
        s
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;
    use crate::utils::square_bb;

    #[test]
    fn parses_bare_kings() {
        let pos = Position::from_fen("8/8/8/8/8/8/8/K1k5 b - - 13 71").unwrap();
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.halfmove_clock(), 13);
        assert_eq!(pos.fullmove_number(), 71);
        assert_eq!(pos.king_square(Color::White), 0);
        assert_eq!(pos.king_square(Color::Black), 2);
        assert_eq!(pos.occupied(), square_bb(0) | square_bb(2));
        assert_eq!(
            pos.hash(),
            zobrist::piece_key(Color::White, PieceKind::King, 0)
                ^ zobrist::piece_key(Color::Black, PieceKind::King, 2)
                ^ zobrist::side_key()
        );
    }

    #[test]
    fn parses_rights_and_en_passant() {
        let pos = Position::from_fen("r3k2r/8/8/3p4/3P4/8/8/R3K2R w Qkq d6 0 1").unwrap();
        assert_eq!(
            pos.castling_rights(),
            CASTLE_WHITE_QUEEN | CASTLE_BLACK_KING | CASTLE_BLACK_QUEEN
        );
        assert_eq!(pos.en_passant(), Some(43));
        // No white pawn stands next to d5, so the target adds nothing to the hash
        assert_eq!(pos.ep_capturers(), 0);
        assert_eq!(pos.hash(), zobrist::recalc_zobrist(&pos));
    }

    #[test]
    fn round_trip_is_exact() {
        for fen in [
            START_FEN,
            "8/8/8/8/8/8/8/K1k5 b - - 13 71",
            "r3k2r/8/8/3p4/3P4/8/8/R3K2R w Qkq d6 0 1",
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "4k3/8/8/8/8/8/8/4K2R b K - 7 40",
        ] {
            assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn from_str_matches_from_fen() {
        let parsed: Position = START_FEN.parse().unwrap();
        assert_eq!(parsed, Position::startpos());
    }

    #[test]
    fn error_kinds() {
        assert_eq!(Position::from_fen(""), Err(FenError::FieldCount(0)));
        assert_eq!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQQBNR w KQkq - 0 1"),
            Err(FenError::KingCount {
                color: Color::White,
                count: 0
            })
        );
        assert!(matches!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e5 0 1"),
            Err(FenError::InvalidEnPassant(_))
        ));
        assert!(matches!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1"),
            Err(FenError::InvalidCounter(_))
        ));
    }
}

// Move notation: UCI coordinates, standard and long algebraic, user input
use thiserror::Error;

use crate::board::{file_of, parse_square, rank_of, square_name, Color, PieceKind, Position};
use crate::movegen::{legal_moves, Move};
use crate::utils::{count_bits, square_bb, Bitboard, FILES, RANKS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("length {0} input (want 4, or 5 with a promotion piece)")]
    Length(usize),
    #[error("no such square {0:?}")]
    Square(String),
    #[error("no piece on square {0}")]
    NoPiece(String),
    #[error("{color:?} piece on square {square}")]
    WrongColor { color: Color, square: String },
    #[error("no such promotion piece {0:?}")]
    PromotionPiece(char),
    #[error("promotion piece not specified")]
    MissingPromotion,
    #[error("illegal promotion")]
    IllegalPromotion,
    #[error("{0} is illegal")]
    Illegal(String),
}

/// UCI coordinate notation ("e2e4", "e7e8q").
pub fn move_to_uci(mv: Move) -> String {
    mv.to_string()
}

fn piece_letter(kind: PieceKind) -> char {
    kind.to_char().to_ascii_uppercase()
}

fn file_letter(sq: usize) -> char {
    (b'a' + file_of(sq) as u8) as char
}

fn rank_digit(sq: usize) -> char {
    (b'1' + rank_of(sq) as u8) as char
}

/// Long algebraic notation without check marks ("Ng1-f3", "b7xa8Q", "O-O").
pub fn long_algebraic(mv: Move) -> String {
    if mv.is_castle_kingside() {
        return "O-O".to_string();
    }
    if mv.is_castle_queenside() {
        return "O-O-O".to_string();
    }
    let mut s = String::with_capacity(8);
    if mv.piece() != PieceKind::Pawn {
        s.push(piece_letter(mv.piece()));
    }
    s.push_str(&square_name(mv.from()));
    s.push(if mv.is_capture() { 'x' } else { '-' });
    s.push_str(&square_name(mv.to()));
    if let Some(promo) = mv.promotion() {
        s.push(piece_letter(promo));
    }
    s
}

/// Standard algebraic notation of a legal move, with the minimum origin
/// information needed to tell it apart and a `+` or `#` suffix.
pub fn algebraic(pos: &Position, mv: Move) -> String {
    let mut s = String::with_capacity(8);
    if mv.is_castle_kingside() {
        s.push_str("O-O");
    } else if mv.is_castle_queenside() {
        s.push_str("O-O-O");
    } else {
        if mv.piece() == PieceKind::Pawn {
            if mv.is_capture() {
                s.push(file_letter(mv.from()));
            }
        } else {
            s.push(piece_letter(mv.piece()));
            let rivals: Bitboard = legal_moves(pos)
                .into_iter()
                .filter(|m| m.to() == mv.to() && m.piece() == mv.piece())
                .fold(0, |bb, m| bb | square_bb(m.from()));
            if count_bits(rivals) == 1 {
                // unambiguous
            } else if count_bits(rivals & FILES[file_of(mv.from())]) == 1 {
                s.push(file_letter(mv.from()));
            } else if count_bits(rivals & RANKS[rank_of(mv.from())]) == 1 {
                s.push(rank_digit(mv.from()));
            } else {
                s.push_str(&square_name(mv.from()));
            }
        }
        if mv.is_capture() {
            s.push('x');
        }
        s.push_str(&square_name(mv.to()));
        if let Some(promo) = mv.promotion() {
            s.push(piece_letter(promo));
        }
    }

    let next = pos.make(mv);
    if next.is_check() {
        s.push(if next.is_terminal() { '#' } else { '+' });
    }
    s
}

/// Number prefix of the next move: "12." for White, "12..." for Black.
pub fn move_number(pos: &Position) -> String {
    match pos.side_to_move() {
        Color::White => format!("{}.", pos.fullmove_number()),
        Color::Black => format!("{}...", pos.fullmove_number()),
    }
}

pub fn numbered_algebraic(pos: &Position, mv: Move) -> String {
    move_number(pos) + &algebraic(pos, mv)
}

/// Numbered algebraic text of a line of legal moves played from `pos`.
pub fn move_text(pos: &Position, moves: &[Move]) -> String {
    let mut s = String::new();
    let mut pos = *pos;
    if pos.side_to_move() == Color::Black && !moves.is_empty() {
        s.push_str(&move_number(&pos));
    }
    for (i, &mv) in moves.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        if pos.side_to_move() == Color::White {
            s.push_str(&move_number(&pos));
        }
        s.push_str(&algebraic(&pos, mv));
        pos = pos.make(mv);
    }
    s
}

/// Parses coordinate input such as "e2e4", "e1g1" (castling) or "d7d8q" into
/// a legal move of `pos`.
pub fn parse_user_move(pos: &Position, text: &str) -> Result<Move, MoveParseError> {
    let text = text.trim();
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(MoveParseError::Length(text.chars().count()));
    }
    let from = parse_square(&text[0..2]).ok_or_else(|| MoveParseError::Square(text[0..2].to_string()))?;
    let to = parse_square(&text[2..4]).ok_or_else(|| MoveParseError::Square(text[2..4].to_string()))?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(ch @ ('q' | 'r' | 'b' | 'n')) => PieceKind::from_char(ch),
        Some(ch) => return Err(MoveParseError::PromotionPiece(ch)),
    };

    let us = pos.side_to_move();
    let (kind, color) = pos
        .piece_on(from)
        .ok_or_else(|| MoveParseError::NoPiece(square_name(from)))?;
    if color != us {
        return Err(MoveParseError::WrongColor {
            color,
            square: square_name(from),
        });
    }
    if let Some((_, target)) = pos.piece_on(to) {
        if target == us {
            return Err(MoveParseError::WrongColor {
                color: target,
                square: square_name(to),
            });
        }
    }

    let reaches_last_rank = kind == PieceKind::Pawn && rank_of(to) == if us == Color::White { 7 } else { 0 };
    match (promotion, reaches_last_rank) {
        (Some(_), false) => return Err(MoveParseError::IllegalPromotion),
        (None, true) => return Err(MoveParseError::MissingPromotion),
        _ => {}
    }

    legal_moves(pos)
        .into_iter()
        .find(|m| m.from() == from && m.to() == to && m.promotion() == promotion)
        .ok_or_else(|| MoveParseError::Illegal(text.to_string()))
}

// Zobrist hashing with key tables evaluated at compile time
use crate::board::{Color, PieceKind, Position};
use crate::utils::iter_bits;

struct Keys {
    piece: [[[u64; 64]; 6]; 2],
    castling: [u64; 4],
    ep_file: [u64; 8],
    black_to_move: u64,
}

const SEED: u64 = 0x5eed_c4e5_5b0a_4d00;

// One SplitMix64 step: returns the next state and its output
const fn split_mix64(state: u64) -> (u64, u64) {
    let state = state.wrapping_add(0x9e3779b97f4a7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    (state, z ^ (z >> 31))
}

const fn generate_keys() -> Keys {
    let mut keys = Keys {
        piece: [[[0; 64]; 6]; 2],
        castling: [0; 4],
        ep_file: [0; 8],
        black_to_move: 0,
    };
    let mut state = SEED;
    let mut color = 0;
    while color < 2 {
        let mut kind = 0;
        while kind < 6 {
            let mut sq = 0;
            while sq < 64 {
                let (s, key) = split_mix64(state);
                state = s;
                keys.piece[color][kind][sq] = key;
                sq += 1;
            }
            kind += 1;
        }
        color += 1;
    }
    let mut i = 0;
    while i < 4 {
        let (s, key) = split_mix64(state);
        state = s;
        keys.castling[i] = key;
        i += 1;
    }
    let mut file = 0;
    while file < 8 {
        let (s, key) = split_mix64(state);
        state = s;
        keys.ep_file[file] = key;
        file += 1;
    }
    let (_, key) = split_mix64(state);
    keys.black_to_move = key;
    keys
}

static KEYS: Keys = generate_keys();

#[inline]
pub fn piece_key(color: Color, kind: PieceKind, sq: usize) -> u64 {
    KEYS.piece[color.index()][kind.index()][sq]
}

/// Combined key of every castling right set in `rights` (bit 3=K .. bit 0=q).
#[inline]
pub fn castling_key(rights: u8) -> u64 {
    iter_bits(rights as u64 & 0xF).fold(0, |h, bit| h ^ KEYS.castling[bit])
}

/// Key for a pawn on `file` that may capture en passant.
#[inline]
pub fn ep_key(file: usize) -> u64 {
    KEYS.ep_file[file]
}

#[inline]
pub fn side_key() -> u64 {
    KEYS.black_to_move
}

pub fn recalc_zobrist(pos: &Position) -> u64 {
    let mut h = 0u64;
    for color in [Color::White, Color::Black] {
        for kind in PieceKind::ALL {
            for sq in iter_bits(pos.pieces(color, kind)) {
                h ^= piece_key(color, kind, sq);
            }
        }
    }
    if pos.side_to_move() == Color::Black {
        h ^= side_key();
    }
    h ^= castling_key(pos.castling_rights());
    h ^ pos.ep_hash()
}

use gambit::board::{Position, START_FEN};
use gambit::movegen::{perft, perft_divide};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position as _};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POSITION_4: &str = "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1";
const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

fn check(fen: &str, expected: &[u64]) {
    gambit::init();
    let pos = Position::from_fen(fen).expect("valid FEN");
    for (i, &nodes) in expected.iter().enumerate() {
        let depth = i as u32 + 1;
        assert_eq!(perft(&pos, depth), nodes, "perft({}) of {}", depth, fen);
    }
}

fn perft_shakmaty(pos: &Chess, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0u64;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}

#[test]
fn perft_starting_position() {
    check(START_FEN, &[20, 400, 8902, 197_281]);
}

#[test]
fn perft_kiwipete() {
    check(KIWIPETE, &[48, 2039, 97_862]);
}

#[test]
fn perft_rook_endgame() {
    check(POSITION_3, &[14, 191, 2812, 43_238]);
}

#[test]
fn perft_promotions_and_castling() {
    check(POSITION_4, &[6, 264, 9467]);
}

#[test]
fn perft_checks_and_promotion_captures() {
    check(POSITION_5, &[44, 1486, 62_379]);
}

#[test]
fn perft_depth_zero_counts_the_root() {
    assert_eq!(perft(&Position::startpos(), 0), 1);
    assert!(perft_divide(&Position::startpos(), 0).is_empty());
}

#[test]
fn divide_matches_shakmaty_per_root_move() {
    gambit::init();
    for fen in [KIWIPETE, POSITION_3, POSITION_4, POSITION_5] {
        let pos = Position::from_fen(fen).unwrap();
        let oracle: Chess = fen
            .parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap();

        let mut ours: Vec<(String, u64)> = perft_divide(&pos, 2)
            .into_iter()
            .map(|(mv, n)| (mv.to_string(), n))
            .collect();
        let mut theirs: Vec<(String, u64)> = oracle
            .legal_moves()
            .into_iter()
            .map(|m| {
                let mut next = oracle.clone();
                next.play_unchecked(&m);
                (
                    m.to_uci(CastlingMode::Standard).to_string(),
                    perft_shakmaty(&next, 1),
                )
            })
            .collect();
        ours.sort();
        theirs.sort();
        assert_eq!(ours, theirs, "divide mismatch for {}", fen);
    }
}

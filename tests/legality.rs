use gambit::board::{Color, PieceKind, Position};
use gambit::movegen::{legal_moves, pseudo_legal_moves, Move};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position as _};

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).expect("valid FEN")
}

fn uci_moves(p: &Position) -> Vec<String> {
    let mut moves: Vec<String> = legal_moves(p).iter().map(|m| m.to_string()).collect();
    moves.sort();
    moves
}

fn castles(p: &Position) -> Vec<String> {
    let mut moves: Vec<String> = legal_moves(p)
        .into_iter()
        .filter(|m| m.is_castle())
        .map(|m| m.to_string())
        .collect();
    moves.sort();
    moves
}

#[test]
fn starting_position_has_twenty_moves() {
    assert_eq!(legal_moves(&Position::startpos()).len(), 20);
}

#[test]
fn legal_moves_are_the_safe_pseudo_legal_moves() {
    for fen in [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "1r2k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPB1PPP/R2BK2R w KQk - 2 2",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    ] {
        let p = pos(fen);
        let expected: Vec<Move> = pseudo_legal_moves(&p)
            .into_iter()
            .filter(|&mv| p.make(mv).is_legal())
            .collect();
        let legal = legal_moves(&p);
        assert_eq!(legal, expected);
        for mv in legal {
            let next = p.make(mv);
            assert!(
                !next.is_square_attacked(next.king_square(p.side_to_move()), next.side_to_move()),
                "{} leaves the king attacked in {}",
                mv,
                fen
            );
        }
    }
}

#[test]
fn legal_moves_agree_with_shakmaty() {
    for fen in [
        "1r2k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPB1PPP/R2BK2R w KQk - 2 2",
        "r3k2r/p1pp1pb1/bn2Qnp1/2qPN3/1p2P3/2N5/PPPBBPPP/R3K2R b KQkq - 3 2",
        "rnb2k1r/pp1Pbppp/2p5/q7/2B5/8/PPPQNnPP/RNB1K2R w KQ - 3 9",
        "8/8/8/2k5/2pP4/8/B7/4K3 b - d3 0 3",
        "4k3/8/8/KpP4r/8/8/8/8 w - b6 0 1",
    ] {
        let oracle: Chess = fen
            .parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap();
        let mut expected: Vec<String> = oracle
            .legal_moves()
            .into_iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .collect();
        expected.sort();
        assert_eq!(uci_moves(&pos(fen)), expected, "move sets differ for {}", fen);
    }
}

#[test]
fn castling_table() {
    // (FEN, castling moves expected for the side to move)
    let cases: &[(&str, &[&str])] = &[
        ("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", &["e1c1", "e1g1"]),
        ("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", &["e8c8", "e8g8"]),
        // Rooks unmoved but the right is gone
        ("r3k2r/8/8/8/8/8/8/R3K2R w Q - 0 1", &["e1c1"]),
        ("r3k2r/8/8/8/8/8/8/R3K2R w K - 0 1", &["e1g1"]),
        ("r3k2r/8/8/8/8/8/8/R3K2R b - - 0 1", &[]),
        // In check
        ("r3k2r/8/8/8/8/8/4r3/R3K2R w KQ - 0 1", &[]),
        // Passing through an attacked square
        ("r3k2r/8/8/8/8/8/5r2/R3K2R w KQ - 0 1", &["e1c1"]),
        ("r3k2r/8/8/8/8/8/3r4/R3K2R w KQ - 0 1", &["e1g1"]),
        // Landing on an attacked square
        ("r3k2r/8/8/8/8/8/6r1/R3K2R w KQ - 0 1", &["e1c1"]),
        // b1 attacked does not matter, b1 occupied does
        ("r3k2r/8/8/8/8/8/1r6/R3K2R w KQ - 0 1", &["e1c1", "e1g1"]),
        ("r3k2r/8/8/8/8/8/8/RN2K2R w KQ - 0 1", &["e1g1"]),
        ("r3k2r/8/8/8/8/8/8/R3K1NR w KQ - 0 1", &["e1c1"]),
        // Rook missing from its corner
        ("r3k2r/8/8/8/8/8/8/R3K3 w KQ - 0 1", &["e1c1"]),
    ];
    for (fen, expected) in cases {
        assert_eq!(&castles(&pos(fen)), expected, "castling moves for {}", fen);
    }
}

#[test]
fn castling_moves_the_rook_and_drops_rights() {
    let p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let castle = legal_moves(&p)
        .into_iter()
        .find(|m| m.to_string() == "e1g1")
        .unwrap();
    let next = p.make(castle);
    assert_eq!(next.piece_on(5), Some((PieceKind::Rook, Color::White)));
    assert_eq!(next.piece_on(7), None);
    assert_eq!(next.king_square(Color::White), 6);
    assert_eq!(next.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
}

#[test]
fn capturing_a_rook_on_its_corner_revokes_the_right() {
    let p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let capture = legal_moves(&p)
        .into_iter()
        .find(|m| m.to_string() == "h1h8")
        .unwrap();
    assert_eq!(capture.captured(), Some(PieceKind::Rook));
    assert_eq!(p.make(capture).to_fen(), "r3k2R/8/8/8/8/8/8/R3K3 b Qq - 0 1");
}

#[test]
fn en_passant_edge_cases() {
    // Capturing would expose the king along the rank
    assert!(!uci_moves(&pos("4k3/8/8/KpP4r/8/8/8/8 w - b6 0 1")).contains(&"c5b6".to_string()));

    // Capturing removes the checking pawn
    let p = pos("8/8/8/2k5/2pP4/8/B7/4K3 b - d3 0 3");
    let ep = legal_moves(&p)
        .into_iter()
        .find(|m| m.is_en_passant())
        .unwrap();
    assert_eq!(ep.to_string(), "c4d3");
    assert_eq!(ep.capture_square(), 27);
    let next = p.make(ep);
    assert_eq!(next.piece_on(27), None);
    assert_eq!(next.piece_on(19), Some((PieceKind::Pawn, Color::Black)));
}

#[test]
fn promotions_generate_four_pieces() {
    let p = pos("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
    let promos: Vec<String> = legal_moves(&p)
        .into_iter()
        .filter(|m| m.promotion().is_some())
        .map(|m| m.to_string())
        .collect();
    for expected in ["a7a8q", "a7a8r", "a7a8b", "a7a8n", "a7b8q", "a7b8r", "a7b8b", "a7b8n"] {
        assert!(promos.contains(&expected.to_string()), "missing {}", expected);
    }
    assert_eq!(promos.len(), 8);
}

#[test]
fn terminal_positions() {
    let mate = pos("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
    assert!(mate.is_check());
    assert!(mate.is_checkmate());
    assert!(!mate.is_stalemate());

    let stalemate = pos("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(!stalemate.is_check());
    assert!(stalemate.is_stalemate());
    assert!(stalemate.is_terminal());

    assert!(!Position::startpos().is_terminal());
}

use alfiere::perft::perft;
use alfiere::Board;
use shakmaty::fen::Fen;
use shakmaty::{Chess, Position};

fn run_perft_check(fen_str: &str, depth: u8, name: &str) {
    let mut board = Board::from_fen(fen_str).expect("Valid FEN");
    let ours = perft(&mut board, depth).expect("perft");

    let fen: Fen = fen_str.parse().expect("shakmaty FEN");
    let pos: Chess = fen
        .into_position(shakmaty::CastlingMode::Standard)
        .expect("Shakmaty should accept FEN");
    let theirs = shakmaty_perft(&pos, depth);

    assert_eq!(ours, theirs, "Mismatch in {name} at depth {depth}");
}

fn shakmaty_perft(pos: &Chess, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += shakmaty_perft(&new_pos, depth - 1);
    }
    nodes
}

#[test]
fn perft_en_passant_discovered_check() {
    alfiere::init();
    // black king shares the capture rank with both pawns
    run_perft_check("8/8/8/k1pP4/8/8/8/4K3 w - c6 0 1", 3, "En Passant Discovered Check");
}

#[test]
fn perft_en_passant_horizontal_pin() {
    alfiere::init();
    // exd6 would remove both pawns from the 5th rank and expose the white king
    run_perft_check("8/8/8/K2pP2r/8/8/8/4k3 w - d6 0 1", 3, "En Passant Horizontal Pin");
}

#[test]
fn perft_castling_prevented_by_attack() {
    alfiere::init();
    run_perft_check("4k3/8/8/8/8/8/8/R3K2r w Q - 0 1", 2, "Castling in Check (Illegal)");
}

#[test]
fn perft_castling_through_check() {
    alfiere::init();
    // f1 is attacked by the black rook
    run_perft_check("4k3/8/8/8/8/5r2/8/R3K2R w KQ - 0 1", 2, "Castling Through Check");
}

#[test]
fn perft_castling_rights_lost_by_rook_capture() {
    alfiere::init();
    run_perft_check("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", 3, "Rook Corner Captures");
}

#[test]
fn perft_promotion_capture() {
    alfiere::init();
    run_perft_check("n1n5/P5P1/8/2k5/8/8/8/4K3 w - - 0 1", 2, "Promotion Capture");
}

#[test]
fn perft_black_promotions() {
    alfiere::init();
    run_perft_check("4k3/8/8/8/8/8/1p4p1/R3K1N1 b - - 0 1", 3, "Black Promotions");
}

#[test]
fn perft_double_check_response() {
    alfiere::init();
    let fen = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    run_perft_check(fen, 3, "Complex Check Response");
}

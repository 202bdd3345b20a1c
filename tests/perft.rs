use alfiere::perft::{perft, perft_divide};
use alfiere::{Board, START_FEN};
use shakmaty::{Chess, Position};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn perft_shakmaty(pos: &Chess, depth: u8) -> u64 {
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

fn check_counts(fen: &str, expected: &[u64]) {
    let mut board = Board::from_fen(fen).expect("valid FEN");
    for (i, &want) in expected.iter().enumerate() {
        let depth = i as u8 + 1;
        let got = perft(&mut board, depth).expect("perft");
        assert_eq!(got, want, "perft({}) mismatch for {}", depth, fen);
    }
    assert_eq!(board, Board::from_fen(fen).expect("valid FEN"), "board not restored");
}

#[test]
fn perft_regression_starting_pos() {
    alfiere::init();

    let pos: Chess = Chess::default();
    let mut board = Board::from_fen(START_FEN).expect("from_fen");

    for depth in 1..=3u8 {
        let expected = perft_shakmaty(&pos, depth);
        let got = perft(&mut board, depth).expect("perft");
        assert_eq!(got, expected, "perft mismatch at depth {}: got {} expected {}", depth, got, expected);
    }
}

#[test]
fn perft_start_position_known_counts() {
    alfiere::init();
    check_counts(START_FEN, &[20, 400, 8_902, 197_281, 4_865_609]);
}

#[test]
fn perft_kiwipete() {
    alfiere::init();
    check_counts(KIWIPETE, &[48, 2_039, 97_862, 4_085_603]);
}

#[test]
fn perft_endgame_with_en_passant_pins() {
    alfiere::init();
    check_counts("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2_812, 43_238]);
}

#[test]
fn perft_promotions_and_checks() {
    alfiere::init();
    check_counts(
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        &[6, 264, 9_467],
    );
    check_counts(
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        &[44, 1_486, 62_379],
    );
}

#[test]
fn perft_divide_sums_to_total() {
    alfiere::init();
    let mut board = Board::from_fen(KIWIPETE).expect("valid FEN");
    let split = perft_divide(&mut board, 2).expect("divide");
    assert_eq!(split.len(), 48);
    assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 2_039);
}

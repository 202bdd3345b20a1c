use alfiere::eval::{Evaluator, MaterialEval, MaterialMobilityEval, MobilityEval};
use alfiere::search::{is_mate_score, OrderingStrategy, Search, SearchParams, CHECKMATE};
use alfiere::{choose_move, Board, ChessError, Move, SearchLimit, START_FEN};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

fn search(fen: &str, params: SearchParams) -> alfiere::search::SearchResult {
    let board = Board::from_fen(fen).expect("Invalid FEN");
    let mut search = Search::new(board, MaterialEval, params);
    search.search().expect("search")
}

#[test]
fn mate_in_1_scholars() {
    alfiere::init();
    let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
    let result = search(fen, SearchParams::new().max_depth(4));
    assert_eq!(result.best_move.to_string(), "h5f7");
    assert_eq!(result.score, CHECKMATE);
    assert_eq!(result.depth, 1, "search stops once a mate is proven");
}

#[test]
fn mate_in_2_rook_ladder() {
    alfiere::init();
    // 1. Ra7 Kg8 2. Rb8#  (or the mirror with the b-rook)
    let fen = "7k/8/8/8/8/8/R7/1R4K1 w - - 0 1";
    let result = search(fen, SearchParams::new().max_depth(5));
    assert!(is_mate_score(result.score), "score {} is not a mate", result.score);
    assert_eq!(result.depth, 3);

    let mut board = Board::from_fen(fen).expect("valid FEN");
    board.play_legal(result.best_move).expect("legal");
    assert!(!board.is_in_check(alfiere::Color::Black));
}

#[test]
fn prefers_quicker_mate() {
    alfiere::init();
    // generation order puts Ra8 late; the mate must still win over slower wins
    let fen = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
    let result = search(fen, SearchParams::new().max_depth(3).ordering(OrderingStrategy::None));
    assert_eq!(result.best_move, Move::new(0, 56));
}

#[test]
fn no_legal_moves_is_an_error() {
    alfiere::init();
    let stale = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("valid FEN");
    assert_eq!(
        choose_move(&stale, SearchLimit::Depth(3), MaterialEval),
        Err(ChessError::NoLegalMoves)
    );
}

#[test]
fn quiescence_avoids_poisoned_capture() {
    alfiere::init();
    // Qxd5 wins a pawn but the e6 pawn takes back the queen
    let fen = "4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1";
    let with_q = search(fen, SearchParams::new().max_depth(1));
    assert_ne!(with_q.best_move, Move::new(3, 35));
}

#[test]
fn time_budget_is_respected() {
    alfiere::init();
    let board = Board::start_position();
    let start = Instant::now();
    let mv = choose_move(&board, SearchLimit::Time(Duration::from_millis(100)), MaterialEval)
        .expect("a move");
    let elapsed = start.elapsed();
    assert!(elapsed < Duration::from_millis(2_000), "took {:?}", elapsed);

    let mut board = board;
    assert!(board.generate_moves().contains(&mv));
}

#[test]
fn external_stop_ends_search() {
    alfiere::init();
    let board = Board::from_fen(START_FEN).expect("valid FEN");
    let mut search = Search::new(board, MaterialEval, SearchParams::new().max_depth(u8::MAX));
    let stop = search.stop_handle();

    let stopper = thread::spawn(move || {
        for _ in 0..200 {
            thread::sleep(Duration::from_millis(10));
            stop.store(true, Ordering::Relaxed);
        }
    });

    let result = search.search().expect("search");
    assert!(result.depth < u8::MAX);
    assert_eq!(search.board(), &Board::start_position());
    stopper.join().expect("stopper thread");
}

#[test]
fn every_evaluator_and_ordering_returns_legal_move() {
    alfiere::init();
    let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";
    let mut board = Board::from_fen(fen).expect("valid FEN");
    let legal = board.generate_moves();

    for ordering in [OrderingStrategy::None, OrderingStrategy::MvvLva, OrderingStrategy::Aggressive] {
        let params = SearchParams::new().max_depth(3).ordering(ordering);
        let a = Search::new(board.clone(), MaterialEval, params.clone()).search().expect("material");
        let b = Search::new(board.clone(), MobilityEval, params.clone()).search().expect("mobility");
        let c = Search::new(board.clone(), MaterialMobilityEval, params).search().expect("mm");
        for r in [a, b, c] {
            assert!(legal.contains(&r.best_move));
            assert_eq!(r.depth, 3);
        }
    }
}

#[test]
fn closure_evaluator() {
    alfiere::init();
    let board = Board::start_position();
    let mv = choose_move(&board, SearchLimit::Depth(2), |_: &Board, _: alfiere::Color| 0).expect("move");
    let mut board = board;
    assert!(board.generate_moves().contains(&mv));
}

#[test]
fn aborted_iteration_keeps_previous_answer() {
    alfiere::init();
    let params = SearchParams::new().max_depth(8).poll_interval(1);

    for stop_after in [500usize, 3_000, 20_000] {
        let calls = Arc::new(AtomicUsize::new(0));
        let stop_slot: Arc<OnceLock<Arc<AtomicBool>>> = Arc::new(OnceLock::new());

        let counting = {
            let calls = Arc::clone(&calls);
            let stop_slot = Arc::clone(&stop_slot);
            move |board: &Board, color: alfiere::Color| {
                if calls.fetch_add(1, Ordering::Relaxed) + 1 >= stop_after {
                    if let Some(stop) = stop_slot.get() {
                        stop.store(true, Ordering::Relaxed);
                    }
                }
                MaterialEval.evaluate(board, color)
            }
        };

        let mut search = Search::new(Board::start_position(), counting, params.clone());
        stop_slot.set(search.stop_handle()).expect("slot set once");
        let stopped = search.search().expect("search");
        assert!(stopped.depth >= 1 && stopped.depth < 8, "depth {}", stopped.depth);

        let fixed = Search::new(
            Board::start_position(),
            MaterialEval,
            params.clone().max_depth(stopped.depth),
        )
        .search()
        .expect("fixed-depth search");
        assert_eq!(
            (stopped.best_move, stopped.score),
            (fixed.best_move, fixed.score),
            "stop after {} evaluations",
            stop_after
        );
        assert!(!search.stop_handle().load(Ordering::Relaxed));
    }
}

#[test]
fn stop_raised_before_search_is_honoured() {
    alfiere::init();
    let mut search = Search::new(
        Board::start_position(),
        MaterialEval,
        SearchParams::new().max_depth(4).poll_interval(1),
    );
    search.stop_handle().store(true, Ordering::Relaxed);

    let result = search.search().expect("search");
    assert_eq!(result.depth, 0);
    let mut board = Board::start_position();
    assert!(board.generate_moves().contains(&result.best_move));
    // flag is lowered again, so the next search runs normally
    assert!(!search.stop_handle().load(Ordering::Relaxed));
    assert_eq!(search.search().expect("search").depth, 4);
}

//! Main search engine implementation
//!
//! Iterative deepening over a negamax alpha-beta search, with a quiescence
//! extension at the horizon and a cooperative time-up flag. The board is
//! mutated in place: every `make_move` is paired with an `unmake_move` before
//! the frame returns, errors and aborts included.

use super::ordering::{is_tactical, order_moves};
use super::params::{OrderingStrategy, SearchLimit, SearchParams};
use super::stats::SearchStats;
use crate::board::{Board, Move};
use crate::error::{ChessError, Result};
use crate::eval::{Evaluator, MaterialEval};
use crate::time::SearchClock;
use log::{debug, info};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Base score of a checkmate. The side to move when mated with `d` plies of
/// depth left scores `-(CHECKMATE + d)`, so quicker mates rank higher.
pub const CHECKMATE: i32 = 1_000_000;

/// Window bound above every reachable score.
pub const INFINITY: i32 = 2_000_000;

/// Killer slots, one per ply.
const MAX_PLY: usize = 128;

/// True for scores that can only come from a forced mate.
#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= CHECKMATE
}

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Move,
    /// Score for the side to move at the root
    pub score: i32,
    /// Deepest fully completed iteration (0 when none completed)
    pub depth: u8,
    pub stats: SearchStats,
}

/// Main search engine
pub struct Search<E: Evaluator = MaterialEval> {
    /// The current board position (mutable during search)
    board: Board,

    evaluator: E,

    /// Search parameters
    params: SearchParams,

    /// Search statistics
    stats: SearchStats,

    /// Deadline plus the stop flag shared with `stop_handle`
    clock: SearchClock,

    /// Set at a poll once the stop flag is seen; unwinds the whole tree
    aborted: bool,

    /// Killer moves table [ply]
    killers: Vec<Option<Move>>,
}

impl<E: Evaluator> Search<E> {
    /// Create new search engine
    ///
    /// # Arguments
    /// * `board` - root position
    /// * `evaluator` - static evaluation used at leaves
    /// * `params` - search parameters
    pub fn new(board: Board, evaluator: E, params: SearchParams) -> Self {
        Self {
            board,
            evaluator,
            params,
            stats: SearchStats::new(),
            clock: SearchClock::unlimited(),
            aborted: false,
            killers: vec![None; MAX_PLY],
        }
    }

    /// Set new board position
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    /// Get current board position
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Get search statistics
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Handle to stop a running search from another thread.
    ///
    /// A stop raised before `search` is called is honoured at its first
    /// poll. The flag is lowered again when `search` returns.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.clock.stop_handle()
    }

    /// Iterative deepening from depth 1 up to `max_depth` or until the time budget runs out.
    ///
    /// Only fully completed iterations update the answer. If none completes
    /// the first ordered root move is returned with its static score at depth 0.
    ///
    /// # Returns
    /// `NoLegalMoves` when the root is checkmate or stalemate.
    pub fn search(&mut self) -> Result<SearchResult> {
        let result = self.iterate();
        self.clock.clear_stop();
        result
    }

    fn iterate(&mut self) -> Result<SearchResult> {
        self.stats.reset();
        self.stats.start_timing();
        self.clock = SearchClock::new(self.params.time_limit, self.clock.stop_handle());
        self.aborted = false;
        self.killers.fill(None);

        let side = self.board.side_to_move();
        let mut root_moves = self.board.legal_moves(side);
        if root_moves.is_empty() {
            return Err(ChessError::NoLegalMoves);
        }
        order_moves(&self.board, &mut root_moves, self.params.ordering, None);

        let mut best_move = root_moves[0];
        let mut best_score = self.evaluate();

        for depth in 1..=self.params.max_depth.max(1) {
            self.stats.inc_node();
            let Some((mv, score)) = self.search_root(depth, &root_moves)? else {
                debug!("depth {} aborted after {} nodes", depth, self.stats.nodes);
                break;
            };
            best_move = mv;
            best_score = score;
            self.stats.depth_reached = depth;
            debug!(
                "depth {} best {} score {} nodes {} time {:?}",
                depth,
                mv,
                score,
                self.stats.nodes,
                self.clock.elapsed()
            );

            // Il miglior risultato precedente viene cercato per primo
            if let Some(pos) = root_moves.iter().position(|&m| m == mv) {
                root_moves[..=pos].rotate_right(1);
            }

            if is_mate_score(score) || self.clock.expired() {
                break;
            }
        }

        self.stats.update_timing();
        info!(
            "bestmove {} score {} depth {} nodes {} nps {}",
            best_move, best_score, self.stats.depth_reached, self.stats.nodes, self.stats.nps
        );
        Ok(SearchResult {
            best_move,
            score: best_score,
            depth: self.stats.depth_reached,
            stats: self.stats.clone(),
        })
    }

    /// One full-width iteration at the root. None if it was aborted.
    fn search_root(&mut self, depth: u8, moves: &[Move]) -> Result<Option<(Move, i32)>> {
        let mut alpha = -INFINITY;
        let mut best: Option<(Move, i32)> = None;

        for &mv in moves {
            let undo = self.board.make_move(mv)?;
            let child = self.negamax(depth - 1, -INFINITY, -alpha, 1);
            self.board.unmake_move(undo);
            let score = -child?;

            if self.aborted {
                return Ok(None);
            }
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((mv, score));
            }
            if self.params.alpha_beta {
                alpha = alpha.max(score);
            }
        }
        Ok(best)
    }

    fn negamax(&mut self, depth: u8, mut alpha: i32, beta: i32, ply: usize) -> Result<i32> {
        self.stats.inc_node();
        self.poll();
        if self.aborted {
            return Ok(0);
        }

        let side = self.board.side_to_move();
        let mut moves = self.board.legal_moves(side);
        if moves.is_empty() {
            return Ok(if self.board.is_in_check(side) {
                -(CHECKMATE + depth as i32)
            } else {
                0
            });
        }
        if self.board.is_draw() {
            return Ok(0);
        }
        if depth == 0 {
            return if self.params.quiescence {
                self.quiescence(alpha, beta, 0)
            } else {
                Ok(self.evaluate())
            };
        }

        let killer = self.killer_at(ply);
        order_moves(&self.board, &mut moves, self.params.ordering, killer);

        let total = moves.len();
        let mut best = -INFINITY;
        for (i, mv) in moves.into_iter().enumerate() {
            let quiet = !is_tactical(&self.board, mv);
            let undo = self.board.make_move(mv)?;
            let child = self.negamax(depth - 1, -beta, -alpha, ply + 1);
            self.board.unmake_move(undo);
            let score = -child?;

            if self.aborted {
                return Ok(best.max(score));
            }
            best = best.max(score);
            alpha = alpha.max(score);
            if self.params.alpha_beta && alpha >= beta {
                self.stats.inc_cutoff(total - i - 1);
                if quiet {
                    self.store_killer(ply, mv);
                }
                break;
            }
        }
        Ok(best)
    }

    /// Capture/promotion-only search below the horizon.
    fn quiescence(&mut self, mut alpha: i32, beta: i32, qdepth: u8) -> Result<i32> {
        self.stats.inc_qsearch_node();
        self.poll();
        if self.aborted {
            return Ok(0);
        }

        let stand_pat = self.evaluate();
        if qdepth >= self.params.qsearch_depth {
            return Ok(stand_pat);
        }
        if self.params.alpha_beta && stand_pat >= beta {
            self.stats.inc_cutoff(0);
            return Ok(stand_pat);
        }
        alpha = alpha.max(stand_pat);

        let side = self.board.side_to_move();
        let mut moves: Vec<Move> = self
            .board
            .legal_moves(side)
            .into_iter()
            .filter(|&mv| is_tactical(&self.board, mv))
            .collect();
        order_moves(&self.board, &mut moves, OrderingStrategy::MvvLva, None);

        let total = moves.len();
        let mut best = stand_pat;
        for (i, mv) in moves.into_iter().enumerate() {
            let undo = self.board.make_move(mv)?;
            let child = self.quiescence(-beta, -alpha, qdepth + 1);
            self.board.unmake_move(undo);
            let score = -child?;

            if self.aborted {
                return Ok(best.max(score));
            }
            best = best.max(score);
            alpha = alpha.max(score);
            if self.params.alpha_beta && alpha >= beta {
                self.stats.inc_cutoff(total - i - 1);
                break;
            }
        }
        Ok(best)
    }

    #[inline]
    fn evaluate(&self) -> i32 {
        self.evaluator.evaluate(&self.board, self.board.side_to_move())
    }

    // Clock check every `poll_interval` nodes
    #[inline]
    fn poll(&mut self) {
        if self.stats.nodes % self.params.poll_interval.max(1) == 0 && self.clock.poll() {
            self.aborted = true;
        }
    }

    fn killer_at(&self, ply: usize) -> Option<Move> {
        if self.params.killer_moves {
            self.killers.get(ply).copied().flatten()
        } else {
            None
        }
    }

    fn store_killer(&mut self, ply: usize, mv: Move) {
        if let Some(slot) = self.killers.get_mut(ply) {
            *slot = Some(mv);
        }
    }
}

/// Pick a move for the side to move in `board`, searching to a fixed depth or for a time budget.
pub fn choose_move<E: Evaluator>(board: &Board, limit: SearchLimit, evaluator: E) -> Result<Move> {
    let mut search = Search::new(board.clone(), evaluator, SearchParams::for_limit(limit));
    Ok(search.search()?.best_move)
}

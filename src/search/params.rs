//! Search parameters and configuration
//!
//! Controls depth and time limits, pruning, quiescence and move ordering.

use std::time::Duration;

/// How far a search may go: a fixed number of plies or a wall-clock budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLimit {
    Depth(u8),
    Time(Duration),
}

/// Move ordering applied before expanding a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingStrategy {
    /// Generation order
    None,
    /// Captures by most valuable victim / least valuable attacker, then promotions
    #[default]
    MvvLva,
    /// MVV-LVA plus central control, development and pawn advancement bonuses
    Aggressive,
}

/// Search parameters for the engine
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Maximum search depth in plies
    pub max_depth: u8,

    /// Time limit (None = depth bound only)
    pub time_limit: Option<Duration>,

    /// Alpha-beta pruning; when off the search is plain minimax
    pub alpha_beta: bool,

    /// Extend horizon nodes with a capture/promotion search
    pub quiescence: bool,

    /// Maximum depth for quiescence search
    pub qsearch_depth: u8,

    /// Nodes between two clock checks
    pub poll_interval: u64,

    /// Move ordering strategy
    pub ordering: OrderingStrategy,

    /// Remember one quiet cutoff move per ply
    pub killer_moves: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_depth: 6,
            time_limit: None,
            alpha_beta: true,
            quiescence: true,
            qsearch_depth: 10,
            poll_interval: 1000,
            ordering: OrderingStrategy::MvvLva,
            killer_moves: true,
        }
    }
}

impl SearchParams {
    /// Create new search params with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for a `SearchLimit`: a depth limit keeps no deadline,
    /// a time limit searches as deep as the budget allows.
    pub fn for_limit(limit: SearchLimit) -> Self {
        match limit {
            SearchLimit::Depth(depth) => Self::new().max_depth(depth),
            SearchLimit::Time(budget) => Self::new().max_depth(u8::MAX).time_limit(budget),
        }
    }

    /// Set maximum depth in plies
    pub fn max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set time limit
    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Enable or disable alpha-beta pruning
    pub fn alpha_beta(mut self, enable: bool) -> Self {
        self.alpha_beta = enable;
        self
    }

    /// Enable or disable quiescence search
    pub fn quiescence(mut self, enable: bool) -> Self {
        self.quiescence = enable;
        self
    }

    /// Set quiescence search depth
    pub fn qsearch_depth(mut self, depth: u8) -> Self {
        self.qsearch_depth = depth;
        self
    }

    /// Set the node interval between clock checks (minimum 1)
    pub fn poll_interval(mut self, nodes: u64) -> Self {
        self.poll_interval = nodes.max(1);
        self
    }

    pub fn ordering(mut self, strategy: OrderingStrategy) -> Self {
        self.ordering = strategy;
        self
    }

    pub fn killer_moves(mut self, enable: bool) -> Self {
        self.killer_moves = enable;
        self
    }
}

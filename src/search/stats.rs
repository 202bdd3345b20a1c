//! Search statistics and performance metrics
//!
//! Tracks nodes searched, cutoffs, pruned siblings and timing.

use std::fmt;
use std::time::{Duration, Instant};

/// Search statistics
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Total nodes searched (main search and quiescence)
    pub nodes: u64,

    /// Quiescence nodes searched
    pub qsearch_nodes: u64,

    /// Alpha-beta cutoffs
    pub cutoffs: u64,

    /// Sibling moves skipped because of a cutoff
    pub pruned: u64,

    /// Deepest fully completed iteration
    pub depth_reached: u8,

    /// Search start time
    pub start_time: Option<Instant>,

    /// Time spent searching
    pub search_time: Duration,

    /// Nodes per second rate
    pub nps: u64,
}

impl SearchStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing
    pub fn start_timing(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Update elapsed time and NPS
    pub fn update_timing(&mut self) {
        if let Some(start) = self.start_time {
            self.search_time = start.elapsed();
            let elapsed_ms = self.search_time.as_millis() as u64;
            if elapsed_ms > 0 {
                self.nps = (self.nodes * 1000) / elapsed_ms;
            }
        }
    }

    #[inline]
    pub fn inc_node(&mut self) {
        self.nodes += 1;
    }

    #[inline]
    pub fn inc_qsearch_node(&mut self) {
        self.nodes += 1;
        self.qsearch_nodes += 1;
    }

    /// Record a cutoff that skipped `skipped` remaining siblings
    #[inline]
    pub fn inc_cutoff(&mut self, skipped: usize) {
        self.cutoffs += 1;
        self.pruned += skipped as u64;
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Search Statistics ===")?;
        writeln!(f, "Depth reached: {}", self.depth_reached)?;
        writeln!(f, "Nodes searched: {}", self.nodes)?;
        writeln!(f, "QSearch nodes: {}", self.qsearch_nodes)?;
        writeln!(f, "Alpha-Beta cutoffs: {}", self.cutoffs)?;
        writeln!(f, "Pruned siblings: {}", self.pruned)?;
        writeln!(f, "Search time: {} ms", self.search_time.as_millis())?;
        write!(f, "Nodes per second: {}", self.nps)
    }
}

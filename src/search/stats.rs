//! Search statistics
//!
//! Per-search counters plus timing. Workers fill one of these per root-move
//! search and the engine folds them into its atomic totals.

use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Positions entered (root move included)
    pub nodes: u64,

    /// Memo lookups that returned a stored value
    pub memo_hits: u64,

    /// Beta/alpha cutoffs
    pub cutoffs: u64,

    /// Nodes searched past the nominal depth
    pub extended_nodes: u64,

    pub start_time: Option<Instant>,

    pub search_time: Duration,

    /// Nodes per second
    pub nps: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_timing(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Update elapsed time and nodes per second
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
    pub fn inc_memo_hit(&mut self) {
        self.memo_hits += 1;
    }

    #[inline]
    pub fn inc_cutoff(&mut self) {
        self.cutoffs += 1;
    }

    #[inline]
    pub fn inc_extended_node(&mut self) {
        self.extended_nodes += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Emit a summary through `tracing` at trace level
    pub fn log_summary(&self) {
        tracing::trace!(
            nodes = self.nodes,
            memo_hits = self.memo_hits,
            cutoffs = self.cutoffs,
            extended_nodes = self.extended_nodes,
            time_ms = self.search_time.as_millis() as u64,
            nps = self.nps,
            "search statistics"
        );
    }
}

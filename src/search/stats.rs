//! Search statistics and performance metrics
//!
//! Tracks nodes searched, cutoffs, reused move lists and timing information.

use std::time::{Duration, Instant};

/// Search statistics
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Total nodes searched
    pub nodes: u64,

    /// Nodes scored by the evaluator
    pub leaf_nodes: u64,

    /// Alpha-beta cutoffs
    pub cutoffs: u64,

    /// Settled moves skipped without searching
    pub dead_ends: u64,

    /// Move lists returned unchanged because they were already deep enough
    pub reused_lists: u64,

    /// Deepest fully completed iteration
    pub completed_depth: u8,

    /// Iterations abandoned at the deadline
    pub interrupted: u64,

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

    /// Update elapsed time and calculate NPS
    pub fn update_timing(&mut self) {
        if let Some(start) = self.start_time {
            self.search_time = start.elapsed();
            let elapsed_ms = self.search_time.as_millis() as u64;
            if elapsed_ms > 0 {
                self.nps = (self.nodes * 1000) / elapsed_ms;
            }
        }
    }

    pub fn inc_node(&mut self) {
        self.nodes += 1;
    }

    pub fn inc_leaf_node(&mut self) {
        self.leaf_nodes += 1;
    }

    pub fn inc_cutoff(&mut self) {
        self.cutoffs += 1;
    }

    pub fn inc_dead_end(&mut self) {
        self.dead_ends += 1;
    }

    pub fn inc_reused_list(&mut self) {
        self.reused_lists += 1;
    }

    pub fn inc_interrupted(&mut self) {
        self.interrupted += 1;
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Print formatted summary
    pub fn print_summary(&self) {
        println!("=== Search Statistics ===");
        println!("Nodes searched: {}", self.nodes);
        println!("Leaf nodes: {}", self.leaf_nodes);
        println!("Alpha-Beta cutoffs: {}", self.cutoffs);
        println!("Dead ends skipped: {}", self.dead_ends);
        println!("Reused move lists: {}", self.reused_lists);
        println!("Completed depth: {}", self.completed_depth);
        println!("Interrupted iterations: {}", self.interrupted);
        println!("Search time: {} ms", self.search_time.as_millis());
        println!("Nodes per second: {}", self.nps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_and_reset() {
        let mut stats = SearchStats::new();
        stats.inc_node();
        stats.inc_node();
        stats.inc_leaf_node();
        stats.inc_cutoff();
        stats.completed_depth = 3;
        assert_eq!(stats.nodes, 2);
        assert_eq!(stats.leaf_nodes, 1);
        assert_eq!(stats.cutoffs, 1);
        stats.reset();
        assert_eq!(stats.nodes, 0);
        assert_eq!(stats.completed_depth, 0);
        assert!(stats.start_time.is_none());
    }

    #[test]
    fn timing_sets_elapsed() {
        let mut stats = SearchStats::new();
        stats.start_timing();
        stats.nodes = 10;
        std::thread::sleep(Duration::from_millis(2));
        stats.update_timing();
        assert!(stats.search_time >= Duration::from_millis(2));
    }
}

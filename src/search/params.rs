//! Search parameters and configuration
//!
//! Controls search behavior: depth and time limits, how often the deadline
//! is polled, and whether alpha-beta cutoffs are taken.

/// Search parameters for the engine
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Maximum search depth in plies
    pub max_depth: u8,

    /// Time limit in milliseconds (0 = unlimited)
    pub time_limit_ms: u64,

    /// The deadline is only polled at nodes with at least this much depth left
    pub deadline_check_depth: u8,

    /// Stop searching a node once its window is empty
    pub allow_cutoff: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_depth: 100,
            time_limit_ms: 0,
            deadline_check_depth: 2,
            allow_cutoff: true,
        }
    }
}

impl SearchParams {
    /// Create new search params with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum depth in plies
    pub fn max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set time limit in milliseconds
    pub fn time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Set the minimum remaining depth at which the deadline is polled
    pub fn deadline_check_depth(mut self, depth: u8) -> Self {
        self.deadline_check_depth = depth;
        self
    }

    /// Enable or disable alpha-beta cutoffs
    pub fn allow_cutoff(mut self, allow: bool) -> Self {
        self.allow_cutoff = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let params = SearchParams::new()
            .max_depth(4)
            .time_limit(250)
            .deadline_check_depth(3)
            .allow_cutoff(false);
        assert_eq!(params.max_depth, 4);
        assert_eq!(params.time_limit_ms, 250);
        assert_eq!(params.deadline_check_depth, 3);
        assert!(!params.allow_cutoff);

        let defaults = SearchParams::default();
        assert_eq!(defaults.deadline_check_depth, 2);
        assert!(defaults.allow_cutoff);
        assert_eq!(defaults.time_limit_ms, 0);
    }
}

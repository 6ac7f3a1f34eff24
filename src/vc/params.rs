use crate::DEFAULT_SOFT_LIMIT;

/// tunable knobs controlling how aggressively the builder searches for
/// connections. cloned cheaply; a solver may carry one instance per
/// search node depth if it wants depth-dependent tuning, though the
/// protocol only ever exposes a single shared instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    /// upper bound on how many semis an OR combination may draw from;
    /// above this the builder falls back to the enhanced algorithm
    /// instead of the bounded one regardless of `soft_limit`.
    pub max_ors: usize,
    /// whether an AND/OR carrier may include cells across the board's
    /// own edge row, i.e. whether the search considers connections that
    /// route through a player's own edge sentinel as an intermediate
    /// hop rather than only as a terminus.
    pub and_over_edge: bool,
    pub use_patterns: bool,
    /// whether pattern matching runs on pairs where neither cell sits on
    /// the board's physical edge.
    pub use_non_edge_patterns: bool,
    pub use_greedy_union: bool,
    /// stop a build call the instant a winning Full between a color's
    /// two edges appears.
    pub abort_on_winning_connection: bool,
    pub soft_limit: usize,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_ors: 4,
            and_over_edge: false,
            use_patterns: true,
            use_non_edge_patterns: true,
            use_greedy_union: true,
            abort_on_winning_connection: false,
            soft_limit: DEFAULT_SOFT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let params = Params::default();
        assert_eq!(params.max_ors, 4);
        assert!(!params.and_over_edge);
        assert!(params.use_patterns);
        assert!(params.use_non_edge_patterns);
        assert!(params.use_greedy_union);
        assert!(!params.abort_on_winning_connection);
        assert_eq!(params.soft_limit, DEFAULT_SOFT_LIMIT);
    }
}

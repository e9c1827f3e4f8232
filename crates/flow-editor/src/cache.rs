use crate::store::{GraphStats, Store};
use crate::versioned::Memoized;

pub struct Cache {
    pub stats: Memoized<Store, u64, GraphStats>,
}

impl Cache {
    pub fn new() -> Self {
        let stats = Memoized::new(
            |s: &Store| s.graph.version(),
            |s: &Store| s.graph_stats_uncached(),
        );

        Self { stats }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

//! Benchmark profiles for the Strata scope arena.
//!
//! - [`bench_config`]: an enabled arena sized for churn benchmarks
//! - [`open_chain`]: a nested chain of scopes, innermost last
//! - [`fragment`]: open `n` scopes and close every other one, leaving the
//!   id registry with many disjoint ranges

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata::{ArenaConfig, Scope, ScopeArena};

/// Config used by every benchmark: enabled, default id space, and a slot
/// table pre-sized for `initial_slots` scopes.
pub fn bench_config(initial_slots: usize) -> ArenaConfig {
    ArenaConfig {
        initial_slots,
        enabled: true,
        ..ArenaConfig::default()
    }
}

/// Open `depth` scopes, each nested under the previous one.
///
/// The returned scopes must be dropped innermost first to keep every
/// parent link live while its children exist; `Vec` drops front to back,
/// so callers should `reverse()` or drop explicitly when that matters.
pub fn open_chain(arena: &ScopeArena, depth: usize) -> Vec<Scope> {
    let mut chain: Vec<Scope> = Vec::with_capacity(depth);
    for level in 0..depth {
        let label = format!("level{level}");
        let scope = match chain.last() {
            Some(parent) => parent.child(&label),
            None => arena.open_labeled(&label),
        };
        chain.push(scope);
    }
    chain
}

/// Open `n` root scopes and close every second one.
///
/// Returns the survivors. With `n = 2k` the registry holds `k` ranges.
pub fn fragment(arena: &ScopeArena, n: usize) -> Vec<Scope> {
    let scopes: Vec<Scope> = (0..n).map(|_| arena.open()).collect();
    scopes
        .into_iter()
        .enumerate()
        .filter_map(|(i, scope)| (i % 2 == 0).then_some(scope))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_nests_every_level() {
        let arena = ScopeArena::new(bench_config(8)).unwrap();
        let chain = open_chain(&arena, 4);
        assert_eq!(chain[3].path(), "level0::level1::level2::level3");
        assert_eq!(arena.open_count(), 4);
    }

    #[test]
    fn fragment_leaves_disjoint_ranges() {
        let arena = ScopeArena::new(bench_config(16)).unwrap();
        let survivors = fragment(&arena, 10);
        assert_eq!(survivors.len(), 5);
        // Ids 1, 3, 5, 7, 9 survive; the fallback id 0 joins range [0, 2).
        let ranges = arena.inspect(|s| s.registry().range_count()).unwrap();
        assert_eq!(ranges, 5);
    }
}

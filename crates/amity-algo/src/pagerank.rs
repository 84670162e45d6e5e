//! PageRank via power iteration.

use std::collections::BTreeMap;
use std::time::Instant;

use amity_graph::{SocialGraph, UserId};
use tracing::debug;

use crate::error::AlgoError;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankConfig {
    /// Probability of following a friendship rather than teleporting. In (0, 1].
    pub damping_factor: f64,
    /// Exact number of iterations; there is no convergence check.
    pub iterations: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            iterations: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageRankResult {
    pub scores: BTreeMap<UserId, f64>,
    pub iterations: usize,
    pub duration_ms: u64,
}

impl PageRankResult {
    /// Scores sorted descending, ties by ascending user ID.
    pub fn ranked(&self) -> Vec<(UserId, f64)> {
        let mut ranked: Vec<(UserId, f64)> = self.scores.iter().map(|(&id, &s)| (id, s)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

/// PageRank via power iteration.
///
/// Every user starts at `1/N`. Each iteration, a friendless ("sink") user pours
/// its whole score into a pool shared uniformly by everyone; other users push
/// `score / degree` to each friend. The new score is
/// `(1-d)/N + d·(inflow + pool/N)`, so scores keep summing to 1.
///
/// An empty graph yields an empty map.
pub fn pagerank(graph: &SocialGraph, config: &PageRankConfig) -> Result<PageRankResult, AlgoError> {
    let d = config.damping_factor;
    if !(d > 0.0 && d <= 1.0) {
        return Err(AlgoError::InvalidDamping(d));
    }

    let start = Instant::now();
    let scores = power_iteration(graph, d, config.iterations);
    let duration_ms = start.elapsed().as_millis() as u64;

    debug!(
        nodes = scores.len(),
        iterations = config.iterations,
        duration_ms,
        "pagerank done"
    );

    Ok(PageRankResult {
        scores,
        iterations: config.iterations,
        duration_ms,
    })
}

/// Core iteration. `d` has already been validated.
pub(crate) fn power_iteration(graph: &SocialGraph, d: f64, iterations: usize) -> BTreeMap<UserId, f64> {
    let snap = Snapshot::new(graph);
    let n = snap.len();
    if n == 0 {
        return BTreeMap::new();
    }

    let n_f = n as f64;
    let base = (1.0 - d) / n_f;

    let mut scores = vec![1.0 / n_f; n];
    let mut inflow = vec![0.0_f64; n];

    for _ in 0..iterations {
        inflow.iter_mut().for_each(|s| *s = 0.0);
        let mut sink_pool = 0.0_f64;

        // Distribute rank
        for u in 0..n {
            let deg = snap.adj[u].len();
            if deg == 0 {
                sink_pool += scores[u];
            } else {
                let share = scores[u] / deg as f64;
                for &v in &snap.adj[u] {
                    inflow[v] += share;
                }
            }
        }

        let teleport = sink_pool / n_f;
        for (s, flow) in scores.iter_mut().zip(&inflow) {
            *s = base + d * (flow + teleport);
        }
    }

    snap.ids.into_iter().zip(scores).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(UserId, UserId)], isolated: &[UserId]) -> SocialGraph {
        let mut g = SocialGraph::new();
        for &(a, b) in edges {
            for id in [a, b] {
                if !g.user_exists(id) {
                    g.add_user(id, Vec::<String>::new());
                }
            }
            g.add_friendship(a, b).unwrap();
        }
        for &id in isolated {
            g.add_user(id, Vec::<String>::new());
        }
        g
    }

    fn total(result: &PageRankResult) -> f64 {
        result.scores.values().sum()
    }

    #[test]
    fn pagerank_empty_graph() {
        let result = pagerank(&SocialGraph::new(), &PageRankConfig::default()).unwrap();
        assert!(result.scores.is_empty());
    }

    #[test]
    fn pagerank_zero_iterations_is_uniform() {
        let g = graph(&[(1, 2), (2, 3), (3, 1), (3, 4)], &[]);
        let cfg = PageRankConfig { iterations: 0, ..Default::default() };
        let result = pagerank(&g, &cfg).unwrap();
        for score in result.scores.values() {
            assert!((score - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn pagerank_cycle_is_uniform() {
        let g = graph(&[(1, 2), (2, 3), (3, 4), (4, 1)], &[]);
        let result = pagerank(&g, &PageRankConfig::default()).unwrap();
        for score in result.scores.values() {
            assert!((score - 0.25).abs() < 1e-9, "score = {score}");
        }
    }

    #[test]
    fn pagerank_hub_outranks_leaves() {
        let g = graph(&[(1, 2), (1, 3), (1, 4), (1, 5)], &[]);
        let result = pagerank(&g, &PageRankConfig::default()).unwrap();
        let hub = result.scores[&1];
        for leaf in 2..=5 {
            assert!(hub > result.scores[&leaf]);
        }
        assert_eq!(result.ranked()[0].0, 1);
    }

    #[test]
    fn pagerank_sinks_redistribute_mass() {
        // 5 and 6 are isolated sinks.
        let g = graph(&[(1, 2), (2, 3)], &[5, 6]);
        let result = pagerank(&g, &PageRankConfig::default()).unwrap();

        assert!((total(&result) - 1.0).abs() < 1e-9);
        assert!((result.scores[&5] - result.scores[&6]).abs() < 1e-12);
        for score in result.scores.values() {
            assert!(*score >= 0.0);
        }
    }

    #[test]
    fn pagerank_non_negative_for_any_iteration_count() {
        let g = graph(&[(1, 2), (2, 3), (3, 4), (4, 2), (5, 6)], &[7]);
        for iterations in [0, 1, 2, 7, 50] {
            let cfg = PageRankConfig { iterations, ..Default::default() };
            let result = pagerank(&g, &cfg).unwrap();
            assert_eq!(result.iterations, iterations);
            assert!(result.scores.values().all(|s| *s >= 0.0));
            assert!((total(&result) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn pagerank_rejects_invalid_damping() {
        let g = graph(&[(1, 2)], &[]);
        for d in [0.0, -0.1, 1.5, f64::NAN] {
            let cfg = PageRankConfig { damping_factor: d, ..Default::default() };
            assert!(matches!(pagerank(&g, &cfg), Err(AlgoError::InvalidDamping(_))));
        }
        let cfg = PageRankConfig { damping_factor: 1.0, ..Default::default() };
        assert!(pagerank(&g, &cfg).is_ok());
    }
}

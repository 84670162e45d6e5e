//! Friend recommendation: Influence, Proximity and Hybrid top-K rankers.
//!
//! All three exclude the querying user and their direct friends, keep only
//! candidates with a positive score, and rank through [`top_k`].

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::num::NonZeroUsize;

use amity_graph::{AlgorithmRun, EventKind, EventSink, SocialGraph, TraceEvent, UserId};
use ordered_float::OrderedFloat;
use tracing::debug;

use crate::error::AlgoError;
use crate::pagerank::{power_iteration, PageRankConfig};
use crate::similarity::{accumulate_adamic_adar, jaccard_similarity};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    pub user:  UserId,
    pub score: f64,
}

/// Relative weight of each signal in [`recommend_by_hybrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridWeights {
    pub influence: f64,
    pub proximity: f64,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self { influence: 0.5, proximity: 0.5 }
    }
}

impl HybridWeights {
    /// Both weights must be finite and non-negative.
    pub fn validate(&self) -> Result<(), AlgoError> {
        for (name, value) in [("influence", self.influence), ("proximity", self.proximity)] {
            if !value.is_finite() || value < 0.0 {
                return Err(AlgoError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

// ── Top-K ────────────────────────────────────────────────────────────────────

/// The `k` highest-scoring candidates, descending.
///
/// Candidates scoring ≤ 0 (or NaN) are dropped. Equal scores pop in insertion
/// order, so callers feeding ascending IDs get the lower ID first.
pub fn top_k<I>(candidates: I, k: NonZeroUsize) -> Vec<Recommendation>
where
    I: IntoIterator<Item = (UserId, f64)>,
{
    let mut heap: BinaryHeap<(OrderedFloat<f64>, Reverse<usize>, UserId)> = BinaryHeap::new();
    for (seq, (user, score)) in candidates.into_iter().enumerate() {
        if score > 0.0 {
            heap.push((OrderedFloat(score), Reverse(seq), user));
        }
    }

    let mut out = Vec::with_capacity(k.get().min(heap.len()));
    while out.len() < k.get() {
        match heap.pop() {
            Some((OrderedFloat(score), _, user)) => out.push(Recommendation { user, score }),
            None => break,
        }
    }
    out
}

// ── Rankers ──────────────────────────────────────────────────────────────────

/// Rank by `pagerank(candidate) × jaccard(tags(user), tags(candidate))`.
///
/// PageRank runs once with default parameters. Untagged candidates of an
/// untagged user get Jaccard 1.0 and are ranked by PageRank alone.
pub fn recommend_by_influence(
    graph: &SocialGraph,
    user: UserId,
    k: NonZeroUsize,
    sink: &mut dyn EventSink,
) -> Vec<Recommendation> {
    sink.begin(
        AlgorithmRun::new(
            "Influence Recommendation",
            "Combines PageRank (importance) with Jaccard similarity (shared interests) to find influential users with similar tags.",
        )
        .target(user),
    );
    sink.record(TraceEvent::new(EventKind::Source, user));

    let pagerank = default_pagerank(graph);
    let my_friends = graph.friends_of(user);
    let my_tags = graph.tags_of(user);

    let mut scored = Vec::new();
    for &candidate in graph.all_users() {
        if candidate == user || my_friends.contains(&candidate) {
            continue;
        }
        let jaccard = jaccard_similarity(&*my_tags, &*graph.tags_of(candidate));
        sink.record(TraceEvent::new(EventKind::Scan, candidate).related(user));

        let score = pagerank.get(&candidate).copied().unwrap_or(0.0) * jaccard;
        if score > 0.0 {
            if jaccard > 0.0 {
                sink.record(TraceEvent::new(EventKind::Visit, candidate).related(user).value(jaccard));
            }
            scored.push((candidate, score));
        }
    }

    finish(scored, user, k, sink, true)
}

/// Rank friends-of-friends by Adamic-Adar score.
pub fn recommend_by_proximity(
    graph: &SocialGraph,
    user: UserId,
    k: NonZeroUsize,
    sink: &mut dyn EventSink,
) -> Vec<Recommendation> {
    sink.begin(
        AlgorithmRun::new(
            "Proximity Recommendation",
            "Uses Adamic-Adar to find friends-of-friends weighted by mutual connections.",
        )
        .target(user),
    );
    sink.record(TraceEvent::new(EventKind::Source, user));

    let mut scores = BTreeMap::new();
    accumulate_adamic_adar(graph, user, 1.0, &mut scores, sink, true);

    finish(scores, user, k, sink, false)
}

/// Additive blend: `w_influence · influence + w_proximity · adamic_adar`.
///
/// A candidate may collect from both signals. Weights are validated first.
pub fn recommend_by_hybrid(
    graph: &SocialGraph,
    user: UserId,
    k: NonZeroUsize,
    weights: &HybridWeights,
    sink: &mut dyn EventSink,
) -> Result<Vec<Recommendation>, AlgoError> {
    weights.validate()?;

    sink.begin(
        AlgorithmRun::new(
            "Hybrid Recommendation",
            "Blends Influence (PageRank + Jaccard) and Proximity (Adamic-Adar) with weighted scoring.",
        )
        .target(user),
    );
    sink.record(TraceEvent::new(EventKind::Source, user));

    let pagerank = default_pagerank(graph);
    let my_friends = graph.friends_of(user);
    let my_tags = graph.tags_of(user);
    let mut scores: BTreeMap<UserId, f64> = BTreeMap::new();

    // Influence signal
    for &candidate in graph.all_users() {
        if candidate == user || my_friends.contains(&candidate) {
            continue;
        }
        let jaccard = jaccard_similarity(&*my_tags, &*graph.tags_of(candidate));
        let influence = pagerank.get(&candidate).copied().unwrap_or(0.0) * jaccard;
        if influence > 0.0 {
            *scores.entry(candidate).or_default() += weights.influence * influence;
            sink.record(TraceEvent::new(EventKind::Scan, candidate).related(user).value(influence));
        }
    }

    // Proximity signal
    accumulate_adamic_adar(graph, user, weights.proximity, &mut scores, sink, false);

    Ok(finish(scores, user, k, sink, true))
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn default_pagerank(graph: &SocialGraph) -> BTreeMap<UserId, f64> {
    let cfg = PageRankConfig::default();
    power_iteration(graph, cfg.damping_factor, cfg.iterations)
}

/// Select the top `k` and emit one `match` per pick.
fn finish<I>(
    scored: I,
    user: UserId,
    k: NonZeroUsize,
    sink: &mut dyn EventSink,
    relate_matches: bool,
) -> Vec<Recommendation>
where
    I: IntoIterator<Item = (UserId, f64)>,
{
    let picks = top_k(scored, k);
    for rec in &picks {
        let event = TraceEvent::new(EventKind::Match, rec.user).value(rec.score);
        sink.record(if relate_matches { event.related(user) } else { event });
    }
    debug!(user, k = k.get(), returned = picks.len(), "recommendations ready");
    picks
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use amity_graph::{EventLog, NoopSink};

    fn k(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    /// Users 1..=6, everyone tagged "music" except 6.
    ///
    /// ```text
    /// 1 - 2 - 4
    /// |   |
    /// 3 - 5   6
    /// ```
    fn network() -> SocialGraph {
        let mut g = SocialGraph::new();
        for id in 1..=5 {
            g.add_user(id, ["music"]);
        }
        g.add_user(6, ["chess"]);
        for (a, b) in [(1, 2), (1, 3), (2, 4), (2, 5), (3, 5)] {
            g.add_friendship(a, b).unwrap();
        }
        g
    }

    fn assert_well_formed(g: &SocialGraph, user: UserId, limit: usize, recs: &[Recommendation]) {
        assert!(recs.len() <= limit);
        for rec in recs {
            assert_ne!(rec.user, user);
            assert!(!g.are_friends(user, rec.user), "{} is already a friend", rec.user);
            assert!(rec.score > 0.0);
        }
        for w in recs.windows(2) {
            assert!(w[0].score >= w[1].score);
        }
    }

    // ── Top-K ────────────────────────────────────────────

    #[test]
    fn top_k_orders_and_truncates() {
        let picks = top_k([(1, 0.2), (2, 0.9), (3, 0.5), (4, 0.7)], k(2));
        let ids: Vec<_> = picks.iter().map(|r| r.user).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn top_k_drops_non_positive_scores() {
        let picks = top_k([(1, 0.0), (2, -1.0), (3, f64::NAN), (4, 0.1)], k(10));
        assert_eq!(picks, vec![Recommendation { user: 4, score: 0.1 }]);
    }

    #[test]
    fn top_k_ties_keep_insertion_order() {
        let picks = top_k([(3, 1.0), (7, 1.0), (9, 1.0)], k(2));
        let ids: Vec<_> = picks.iter().map(|r| r.user).collect();
        assert_eq!(ids, vec![3, 7]);
    }

    // ── Influence ────────────────────────────────────────

    #[test]
    fn influence_excludes_self_friends_and_disjoint_tags() {
        let g = network();
        let recs = recommend_by_influence(&g, 1, k(10), &mut NoopSink);
        assert_well_formed(&g, 1, 10, &recs);

        let ids: Vec<_> = recs.iter().map(|r| r.user).collect();
        // 6 shares no tag with 1.
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&4) && ids.contains(&5));
        // 5 has degree 2, 4 has degree 1.
        assert_eq!(ids[0], 5);
    }

    #[test]
    fn influence_respects_k() {
        let g = network();
        let recs = recommend_by_influence(&g, 4, k(1), &mut NoopSink);
        assert_eq!(recs.len(), 1);
        assert_well_formed(&g, 4, 1, &recs);
    }

    #[test]
    fn influence_events() {
        let g = network();
        let mut log = EventLog::new();
        let recs = recommend_by_influence(&g, 1, k(10), &mut log);

        assert_eq!(log.run.target, Some(1));
        assert_eq!(log.events[0].kind, EventKind::Source);
        let scanned: Vec<_> = log.of_kind(EventKind::Scan).map(|e| e.node).collect();
        assert_eq!(scanned, vec![4, 5, 6]);
        let visited: Vec<_> = log.of_kind(EventKind::Visit).map(|e| e.node).collect();
        assert_eq!(visited, vec![4, 5]);
        let matched: Vec<_> = log.of_kind(EventKind::Match).map(|e| e.node).collect();
        assert_eq!(matched, recs.iter().map(|r| r.user).collect::<Vec<_>>());
    }

    // ── Proximity ────────────────────────────────────────

    #[test]
    fn proximity_prefers_more_mutual_friends() {
        let g = network();
        // 4 → friends {2}; fof via 2: 1, 5. 5 is reached only through 2.
        // 3 → friends {1, 5}; fof: 2 (via 1 and via 5).
        let recs = recommend_by_proximity(&g, 3, k(5), &mut NoopSink);
        assert_well_formed(&g, 3, 5, &recs);
        assert_eq!(recs[0].user, 2);
        let expected = 1.0 / 2f64.ln() + 1.0 / 2f64.ln();
        assert!((recs[0].score - expected).abs() < 1e-12);
    }

    #[test]
    fn proximity_empty_for_friendless_user() {
        let g = network();
        assert!(recommend_by_proximity(&g, 6, k(3), &mut NoopSink).is_empty());
    }

    #[test]
    fn proximity_matches_carry_no_related_node() {
        let g = network();
        let mut log = EventLog::new();
        recommend_by_proximity(&g, 4, k(3), &mut log);
        assert!(log.of_kind(EventKind::Match).all(|e| e.related.is_none()));
        assert!(log.of_kind(EventKind::Scan).all(|e| e.related == Some(2)));
    }

    // ── Hybrid ───────────────────────────────────────────

    #[test]
    fn hybrid_adds_both_signals() {
        let g = network();
        let w = HybridWeights::default();
        let hybrid = recommend_by_hybrid(&g, 1, k(10), &w, &mut NoopSink).unwrap();
        let influence = recommend_by_influence(&g, 1, k(10), &mut NoopSink);
        let proximity = recommend_by_proximity(&g, 1, k(10), &mut NoopSink);
        assert_well_formed(&g, 1, 10, &hybrid);

        let score_of = |recs: &[Recommendation], id: UserId| {
            recs.iter().find(|r| r.user == id).map_or(0.0, |r| r.score)
        };
        for id in [4, 5] {
            let expected = 0.5 * score_of(&influence, id) + 0.5 * score_of(&proximity, id);
            assert!((score_of(&hybrid, id) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn hybrid_with_zero_proximity_ranks_like_influence() {
        let g = network();
        let w = HybridWeights { influence: 1.0, proximity: 0.0 };
        let hybrid = recommend_by_hybrid(&g, 1, k(10), &w, &mut NoopSink).unwrap();
        let influence = recommend_by_influence(&g, 1, k(10), &mut NoopSink);
        assert_eq!(hybrid, influence);
    }

    #[test]
    fn hybrid_rejects_bad_weights() {
        let g = network();
        for w in [
            HybridWeights { influence: -0.1, proximity: 0.5 },
            HybridWeights { influence: 0.5, proximity: f64::INFINITY },
            HybridWeights { influence: f64::NAN, proximity: 0.5 },
        ] {
            let err = recommend_by_hybrid(&g, 1, k(3), &w, &mut NoopSink).unwrap_err();
            assert!(matches!(err, AlgoError::InvalidWeight { .. }));
        }
    }
}

//! Similarity primitives: Jaccard over tag sets, Adamic-Adar over mutual friends.

use std::collections::{BTreeMap, BTreeSet};

use amity_graph::{EventKind, EventSink, NoopSink, SocialGraph, TraceEvent, UserId};

/// Jaccard similarity: `|A ∩ B| / |A ∪ B|`.
///
/// Two empty sets are identical by vacuity and score 1.0.
pub fn jaccard_similarity<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union_size = a.len() + b.len() - intersection;
    if union_size == 0 {
        return 0.0;
    }
    intersection as f64 / union_size as f64
}

/// Adamic-Adar proximity of every friend-of-friend of `user`.
///
/// Each mutual friend `f` contributes `1 / ln(degree(f))`, so a well-connected
/// go-between is a weaker signal. `user` and its direct friends are never
/// scored, and friends with degree ≤ 1 contribute nothing.
pub fn adamic_adar_scores(graph: &SocialGraph, user: UserId) -> BTreeMap<UserId, f64> {
    let mut scores = BTreeMap::new();
    accumulate_adamic_adar(graph, user, 1.0, &mut scores, &mut NoopSink, false);
    scores
}

/// Add `weight`-scaled Adamic-Adar contributions into `scores`.
///
/// Emits `visit(friend, related=user)` per direct friend and, when
/// `scan_events` is set, `scan(candidate, related=friend)` per candidate reached.
pub(crate) fn accumulate_adamic_adar(
    graph: &SocialGraph,
    user: UserId,
    weight: f64,
    scores: &mut BTreeMap<UserId, f64>,
    sink: &mut dyn EventSink,
    scan_events: bool,
) {
    let my_friends = graph.friends_of(user);

    for &friend in my_friends.iter() {
        sink.record(TraceEvent::new(EventKind::Visit, friend).related(user));

        let degree = graph.degree(friend);
        for &fof in graph.friends_of(friend).iter() {
            if fof == user || my_friends.contains(&fof) {
                continue;
            }
            if scan_events {
                sink.record(TraceEvent::new(EventKind::Scan, fof).related(friend));
            }
            if degree > 1 {
                *scores.entry(fof).or_default() += weight / (degree as f64).ln();
            }
        }
    }
}

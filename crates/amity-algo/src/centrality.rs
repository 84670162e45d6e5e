//! Centrality algorithms: Betweenness (Brandes), Closeness, Degree.

use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;

use amity_graph::{AlgorithmRun, EventKind, EventSink, SocialGraph, TraceEvent, UserId};
use tracing::debug;

use crate::snapshot::Snapshot;

/// Closeness scores at or above this fraction of the maximum are reported as
/// `visit` events.
const CLOSENESS_HIGHLIGHT: f64 = 0.3;

// ── Betweenness ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BetweennessResult {
    pub scores: BTreeMap<UserId, f64>,
    pub duration_ms: u64,
}

impl BetweennessResult {
    /// Scores sorted descending, ties by ascending user ID.
    pub fn ranked(&self) -> Vec<(UserId, f64)> {
        let mut ranked: Vec<(UserId, f64)> = self.scores.iter().map(|(&id, &s)| (id, s)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    /// The `n` strongest bridge users.
    pub fn top(&self, n: usize) -> Vec<(UserId, f64)> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

/// Betweenness centrality via Brandes' algorithm, exact over every source.
///
/// Each unordered pair of endpoints is reached once from either side, so the
/// accumulated totals are halved.
pub fn betweenness_centrality(graph: &SocialGraph) -> BetweennessResult {
    let start = Instant::now();

    let snap = Snapshot::new(graph);
    let n = snap.len();
    let mut bc = vec![0.0_f64; n];

    // Scratch buffers reused across sources
    let mut stack: Vec<usize> = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0_f64; n]; // number of shortest paths
    let mut dist = vec![-1i64; n];
    let mut delta = vec![0.0_f64; n];
    let mut queue = VecDeque::new();

    for s in 0..n {
        stack.clear();
        for p in predecessors.iter_mut() {
            p.clear();
        }
        sigma.iter_mut().for_each(|x| *x = 0.0);
        dist.iter_mut().for_each(|x| *x = -1);
        delta.iter_mut().for_each(|x| *x = 0.0);

        sigma[s] = 1.0;
        dist[s] = 0;
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in &snap.adj[v] {
                if dist[w] < 0 {
                    queue.push_back(w);
                    dist[w] = dist[v] + 1;
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Back-propagation in reverse discovery order
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != s {
                bc[w] += delta[w];
            }
        }
    }

    let scores: BTreeMap<UserId, f64> = snap
        .ids
        .into_iter()
        .zip(bc.into_iter().map(|b| b / 2.0))
        .collect();
    let duration_ms = start.elapsed().as_millis() as u64;
    debug!(nodes = n, duration_ms, "betweenness done");

    BetweennessResult { scores, duration_ms }
}

// ── Closeness ────────────────────────────────────────────────────────────────

/// Closeness centrality, normalized for disconnected graphs.
///
/// For a user reaching `r` others at total distance `Σd`:
/// `(r / Σd) · (r / (N-1))`. The first factor is the inverse mean distance
/// within the reachable set, the second the fraction of the network reached.
/// Isolated users score 0. Fewer than two users yields an empty map.
pub fn closeness_centrality(graph: &SocialGraph, sink: &mut dyn EventSink) -> BTreeMap<UserId, f64> {
    let start = Instant::now();
    sink.begin(AlgorithmRun::new(
        "Closeness Centrality",
        "Scores each user by how quickly they can reach everyone else in the network.",
    ));

    let snap = Snapshot::new(graph);
    let n = snap.len();
    if n <= 1 {
        return BTreeMap::new();
    }

    let others = (n - 1) as f64;
    let mut dist = vec![-1i64; n];
    let mut queue = VecDeque::new();
    let mut scores = BTreeMap::new();

    for s in 0..n {
        dist.iter_mut().for_each(|d| *d = -1);
        dist[s] = 0;
        queue.push_back(s);
        let mut total_dist = 0i64;
        let mut reachable = 0usize;

        while let Some(v) = queue.pop_front() {
            for &w in &snap.adj[v] {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    total_dist += dist[w];
                    reachable += 1;
                    queue.push_back(w);
                }
            }
        }

        let closeness = if reachable > 0 && total_dist > 0 {
            let r = reachable as f64;
            (r / total_dist as f64) * (r / others)
        } else {
            0.0
        };
        scores.insert(snap.ids[s], closeness);
    }

    let max = scores.values().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        for (&user, &score) in &scores {
            if score >= CLOSENESS_HIGHLIGHT * max {
                sink.record(TraceEvent::new(EventKind::Visit, user).value(score));
            }
        }
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    debug!(nodes = n, max, duration_ms, "closeness done");
    scores
}

/// Highest-scoring user; ties go to the lowest ID. `None` for an empty map.
pub fn most_central_user(scores: &BTreeMap<UserId, f64>) -> Option<(UserId, f64)> {
    let mut best: Option<(UserId, f64)> = None;
    for (&user, &score) in scores {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((user, score)),
        }
    }
    best
}

// ── Degree ───────────────────────────────────────────────────────────────────

/// Normalized degree: `degree / (N-1)`. All zeros when `N <= 1`.
pub fn degree_centrality(graph: &SocialGraph) -> BTreeMap<UserId, f64> {
    let n = graph.user_count();
    if n <= 1 {
        return graph.all_users().iter().map(|&id| (id, 0.0)).collect();
    }

    let denom = (n - 1) as f64;
    graph
        .all_users()
        .iter()
        .map(|&id| (id, graph.degree(id) as f64 / denom))
        .collect()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

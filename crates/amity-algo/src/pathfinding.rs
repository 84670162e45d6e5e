//! Breadth-first traversal and unweighted shortest paths.
//!
//! Neighbors are expanded in ascending ID order, so discovery order, parent
//! pointers and therefore the returned path are deterministic. Among several
//! equal-length paths the one whose nodes were discovered first wins.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::time::Instant;

use amity_graph::{AlgorithmRun, EventKind, EventSink, SocialGraph, TraceEvent, UserId};
use tracing::debug;

// ─────────────────────────────────────────────
// BFS
// ─────────────────────────────────────────────

/// Hop distance from `start` to every reachable node, `start` included at 0.
pub fn bfs_distances(graph: &SocialGraph, start: UserId) -> BTreeMap<UserId, usize> {
    let mut dist = BTreeMap::from([(start, 0)]);
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        let next = dist[&node] + 1;
        for &neighbor in graph.friends_of(node).iter() {
            if !dist.contains_key(&neighbor) {
                dist.insert(neighbor, next);
                queue.push_back(neighbor);
            }
        }
    }

    dist
}

// ─────────────────────────────────────────────
// Shortest path
// ─────────────────────────────────────────────

/// One shortest hop-path from `source` to `target`, both inclusive.
///
/// - `source == target` → `[source]`
/// - `target` unreachable → empty
///
/// Emits `visit` when a node is dequeued, `scan` when a node is discovered and
/// `path` for each path node from `target` back to `source`.
pub fn shortest_path(
    graph: &SocialGraph,
    source: UserId,
    target: UserId,
    sink: &mut dyn EventSink,
) -> Vec<UserId> {
    let start = Instant::now();
    sink.begin(
        AlgorithmRun::new(
            "Shortest Path (BFS)",
            "Explores the network level by level to find the minimum number of hops between two users.",
        )
        .target(source),
    );

    if source == target {
        return vec![source];
    }

    let mut visited = HashSet::from([source]);
    let mut parent: HashMap<UserId, UserId> = HashMap::new();
    let mut queue = VecDeque::from([source]);
    let mut found = false;

    sink.record(TraceEvent::new(EventKind::Visit, source));

    while let Some(current) = queue.pop_front() {
        sink.record(TraceEvent::new(EventKind::Visit, current));

        if current == target {
            found = true;
            break;
        }

        for &neighbor in graph.friends_of(current).iter() {
            if visited.insert(neighbor) {
                parent.insert(neighbor, current);
                queue.push_back(neighbor);
                sink.record(TraceEvent::new(EventKind::Scan, neighbor).related(current));
            }
        }
    }

    if !found {
        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(source, target, explored = visited.len(), duration_ms, "no path");
        return Vec::new();
    }

    // Reconstruct by following parent pointers
    let mut path = vec![target];
    let mut cur = target;
    sink.record(TraceEvent::new(EventKind::Path, target));
    while let Some(&p) = parent.get(&cur) {
        path.push(p);
        sink.record(TraceEvent::new(EventKind::Path, p).related(cur));
        cur = p;
    }
    path.reverse();

    let duration_ms = start.elapsed().as_millis() as u64;
    debug!(source, target, hops = path.len() - 1, duration_ms, "shortest path found");
    path
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

//! Dense, index-based view of a [`SocialGraph`] for the all-pairs algorithms.

use std::collections::HashMap;

use amity_graph::{SocialGraph, UserId};

/// Users in ascending ID order plus index adjacency lists.
///
/// Neighbor lists keep the graph's ascending order, so traversals over the
/// snapshot visit nodes in the same order as traversals over the graph.
pub(crate) struct Snapshot {
    pub ids: Vec<UserId>,
    pub adj: Vec<Vec<usize>>,
}

impl Snapshot {
    pub fn new(graph: &SocialGraph) -> Self {
        let ids: Vec<UserId> = graph.all_users().iter().copied().collect();
        let id_to_idx: HashMap<UserId, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();

        let adj = ids
            .iter()
            .map(|id| {
                graph
                    .friends_of(*id)
                    .iter()
                    .filter_map(|f| id_to_idx.get(f).copied())
                    .collect()
            })
            .collect();

        Self { ids, adj }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

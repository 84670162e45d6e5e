//! Graph algorithm library for amity.
//!
//! Every entry point takes a read-only [`SocialGraph`](amity_graph::SocialGraph)
//! and recomputes from scratch against the current snapshot:
//!
//! - **Pathfinding**: BFS hop distances, shortest path
//! - **Centrality**: PageRank, Betweenness (Brandes), Closeness, Degree
//! - **Community**: synchronous Label Propagation
//! - **Similarity**: Jaccard, Adamic-Adar
//! - **Recommendation**: Influence, Proximity, Hybrid top-K rankers

pub mod centrality;
pub mod community;
pub mod error;
pub mod pagerank;
pub mod pathfinding;
pub mod recommend;
pub mod similarity;

mod snapshot;
#[cfg(test)]
mod test_support;

pub use centrality::{
    betweenness_centrality, closeness_centrality, degree_centrality, most_central_user,
    BetweennessResult,
};
pub use community::{label_propagation, LabelPropConfig, LabelPropResult, TieBreak};
pub use error::AlgoError;
pub use pagerank::{pagerank, PageRankConfig, PageRankResult};
pub use pathfinding::{bfs_distances, shortest_path};
pub use recommend::{
    recommend_by_hybrid, recommend_by_influence, recommend_by_proximity, top_k, HybridWeights,
    Recommendation,
};
pub use similarity::{adamic_adar_scores, jaccard_similarity};

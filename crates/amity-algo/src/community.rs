//! Community detection: synchronous Label Propagation.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use amity_graph::{AlgorithmRun, EventKind, EventSink, SocialGraph, TraceEvent, UserId};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::snapshot::Snapshot;

/// How a node chooses among labels that share the highest vote count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// The smallest label ID wins. Fully deterministic.
    #[default]
    LowestLabel,
    /// Uniform choice among the tied labels.
    /// `seed = None` draws from the thread RNG.
    Random { seed: Option<u64> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPropConfig {
    /// Exact number of synchronous rounds.
    pub iterations: usize,
    pub tie_break: TieBreak,
}

impl Default for LabelPropConfig {
    fn default() -> Self {
        Self { iterations: 10, tie_break: TieBreak::LowestLabel }
    }
}

#[derive(Debug, Clone)]
pub struct LabelPropResult {
    /// user → representative label (some user's ID, not a dense index)
    pub labels: BTreeMap<UserId, UserId>,
    pub community_count: usize,
    pub iterations: usize,
    pub duration_ms: u64,
}

impl LabelPropResult {
    /// Members grouped by label, each group ascending.
    pub fn communities(&self) -> BTreeMap<UserId, Vec<UserId>> {
        let mut groups: BTreeMap<UserId, Vec<UserId>> = BTreeMap::new();
        for (&user, &label) in &self.labels {
            groups.entry(label).or_default().push(user);
        }
        groups
    }
}

/// Label Propagation community detection.
///
/// Every user starts with its own ID as label. Each round computes all new
/// labels from the previous round's labels: a friendless user keeps its label,
/// everyone else adopts the most frequent label among its friends. Runs exactly
/// `config.iterations` rounds with no convergence check and no renumbering.
///
/// Emits `recolor` (value = new label) whenever a user's label changes.
pub fn label_propagation(
    graph: &SocialGraph,
    config: &LabelPropConfig,
    sink: &mut dyn EventSink,
) -> LabelPropResult {
    let start = Instant::now();
    sink.begin(AlgorithmRun::new(
        "Label Propagation",
        "Each user repeatedly adopts the label most common among their friends until groups emerge.",
    ));

    let snap = Snapshot::new(graph);
    let n = snap.len();

    let mut rng: Option<Box<dyn rand::RngCore>> = match config.tie_break {
        TieBreak::LowestLabel => None,
        TieBreak::Random { seed: Some(s) } => Some(Box::new(rand::rngs::StdRng::seed_from_u64(s))),
        TieBreak::Random { seed: None } => Some(Box::new(rand::thread_rng())),
    };

    let mut labels: Vec<UserId> = snap.ids.clone();
    let mut next = labels.clone();
    let mut tied: Vec<UserId> = Vec::new();

    for round in 0..config.iterations {
        let mut changed = 0usize;

        for i in 0..n {
            if snap.adj[i].is_empty() {
                next[i] = labels[i];
                continue;
            }

            // Count neighbor labels from the previous round only
            let mut votes: BTreeMap<UserId, usize> = BTreeMap::new();
            for &j in &snap.adj[i] {
                *votes.entry(labels[j]).or_default() += 1;
            }
            let top = votes.values().copied().max().unwrap_or(0);

            tied.clear();
            tied.extend(votes.iter().filter(|(_, &c)| c == top).map(|(&l, _)| l));

            let chosen = match rng.as_mut() {
                Some(rng) => tied.choose(rng).copied(),
                None => tied.first().copied(),
            };
            next[i] = chosen.unwrap_or(labels[i]);

            if next[i] != labels[i] {
                changed += 1;
                sink.record(TraceEvent::new(EventKind::Recolor, snap.ids[i]).value(next[i] as f64));
            }
        }

        std::mem::swap(&mut labels, &mut next);
        debug!(round, changed, "label propagation round");
    }

    let community_count = labels.iter().collect::<BTreeSet<_>>().len();
    let labels: BTreeMap<UserId, UserId> = snap.ids.into_iter().zip(labels).collect();
    let duration_ms = start.elapsed().as_millis() as u64;
    debug!(nodes = n, community_count, duration_ms, "label propagation done");

    LabelPropResult {
        labels,
        community_count,
        iterations: config.iterations,
        duration_ms,
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

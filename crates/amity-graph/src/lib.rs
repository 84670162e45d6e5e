//! # amity-graph
//!
//! Friendship graph engine for amity.
//!
//! Provides the data model that every amity algorithm reads from:
//! - [`graph::SocialGraph`]: undirected friendship adjacency + per-user tag sets
//! - [`model::Friendship`]: canonical `(min, max)` undirected edge
//! - [`events::EventSink`]: optional observer that algorithms notify of visitable steps
//! - [`io`]: whitespace-separated edge / tag file persistence

pub mod error;
pub mod events;
pub mod graph;
pub mod io;
pub mod model;

pub use error::GraphError;
pub use events::{AlgorithmRun, EventKind, EventLog, EventSink, NoopSink, TraceEvent};
pub use graph::SocialGraph;
pub use io::{FilePair, ImportReport, LoadOutcome, SaveOutcome};
pub use model::{Friendship, TagSet, UserId};

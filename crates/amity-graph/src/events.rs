//! Instrumentation sink: ordered, observational events emitted by algorithms.
//!
//! Events exist purely for external rendering (e.g. animating a BFS ripple).
//! Algorithms never read them back, and every call site works unchanged with
//! [`NoopSink`]. The sink is owned by the caller and passed into each
//! algorithm call; there is no global event buffer.

use serde::Serialize;

use crate::model::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// The querying user of a recommendation run.
    Source,
    /// A node being processed / expanded.
    Visit,
    /// A node being discovered or evaluated.
    Scan,
    /// A node selected into a final result.
    Match,
    /// A node on the reconstructed shortest path.
    Path,
    /// A node whose community label changed; `value` carries the new label.
    Recolor,
}

/// One observational step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    pub kind:    EventKind,
    pub node:    UserId,
    /// Parent / bridge node, so a renderer can light the connecting edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<UserId>,
    /// Score or label attached to the step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value:   Option<f64>,
}

impl TraceEvent {
    pub fn new(kind: EventKind, node: UserId) -> Self {
        Self { kind, node, related: None, value: None }
    }

    pub fn related(mut self, related: UserId) -> Self {
        self.related = Some(related);
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

/// Metadata describing the algorithm run that the following events belong to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlgorithmRun {
    pub name:        String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target:      Option<UserId>,
}

impl AlgorithmRun {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into(), target: None }
    }

    pub fn target(mut self, user: UserId) -> Self {
        self.target = Some(user);
        self
    }
}

// ─────────────────────────────────────────────
// EventSink
// ─────────────────────────────────────────────

pub trait EventSink {
    /// Called once when an algorithm run starts.
    fn begin(&mut self, _run: AlgorithmRun) {}

    fn record(&mut self, event: TraceEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    #[inline]
    fn record(&mut self, _event: TraceEvent) {}
}

/// Keeps the metadata and ordered events of the most recent run.
///
/// `begin` starts a fresh run and discards the previous one's events.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventLog {
    #[serde(flatten)]
    pub run:    AlgorithmRun,
    pub events: Vec<TraceEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events of one kind, in emission order.
    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &TraceEvent> + '_ {
        self.events.iter().filter(move |e| e.kind == kind)
    }
}

impl EventSink for EventLog {
    fn begin(&mut self, run: AlgorithmRun) {
        self.events.clear();
        self.run = run;
    }

    fn record(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

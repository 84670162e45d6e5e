use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Opaque positive integer identifying a user (graph vertex).
pub type UserId = u64;

/// Free-form labels attached to a user. Ordered so iteration is reproducible.
pub type TagSet = BTreeSet<String>;

// ─────────────────────────────────────────────
// Friendship
// ─────────────────────────────────────────────

/// An undirected friendship edge stored in canonical `(low, high)` order.
///
/// `Friendship::new(2, 1) == Friendship::new(1, 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Friendship {
    pub low:  UserId,
    pub high: UserId,
}

impl Friendship {
    pub fn new(a: UserId, b: UserId) -> Self {
        Self { low: a.min(b), high: a.max(b) }
    }
}

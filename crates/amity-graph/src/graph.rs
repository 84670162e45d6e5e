use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound::{Excluded, Unbounded};

use tracing::debug;

use crate::error::GraphError;
use crate::model::{Friendship, TagSet, UserId};

// ─────────────────────────────────────────────
// SocialGraph
// ─────────────────────────────────────────────

/// Undirected, tag-annotated friendship graph.
///
/// Single source of truth for every amity algorithm. All three maps are
/// ordered, so neighbor iteration (and with it BFS discovery order) is
/// ascending by user ID and fully reproducible.
///
/// Invariants maintained by every mutation:
/// - `b ∈ friends[a] ⇔ a ∈ friends[b]`
/// - every ID appearing in `friends` is in `users`
/// - no user is its own friend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialGraph {
    /// user → direct friends
    friends: BTreeMap<UserId, BTreeSet<UserId>>,
    /// user → tags (absent means empty, not unknown)
    tags: BTreeMap<UserId, TagSet>,
    /// authoritative membership list
    users: BTreeSet<UserId>,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ────────────────────────────────────

    pub fn user_exists(&self, id: UserId) -> bool {
        self.users.contains(&id)
    }

    /// Friends of `id`. Unknown and friendless users both yield an empty set.
    pub fn friends_of(&self, id: UserId) -> Cow<'_, BTreeSet<UserId>> {
        match self.friends.get(&id) {
            Some(set) => Cow::Borrowed(set),
            None => Cow::Owned(BTreeSet::new()),
        }
    }

    /// Tags of `id`. Unknown and untagged users both yield an empty set.
    pub fn tags_of(&self, id: UserId) -> Cow<'_, TagSet> {
        match self.tags.get(&id) {
            Some(set) => Cow::Borrowed(set),
            None => Cow::Owned(TagSet::new()),
        }
    }

    pub fn all_users(&self) -> &BTreeSet<UserId> {
        &self.users
    }

    pub fn degree(&self, id: UserId) -> usize {
        self.friends.get(&id).map_or(0, BTreeSet::len)
    }

    pub fn are_friends(&self, a: UserId, b: UserId) -> bool {
        self.friends.get(&a).is_some_and(|set| set.contains(&b))
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of undirected friendships.
    pub fn friendship_count(&self) -> usize {
        self.friends.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Every undirected friendship once, in ascending canonical order.
    pub fn friendships(&self) -> impl Iterator<Item = Friendship> + '_ {
        self.friends.iter().flat_map(|(&a, set)| {
            set.range((Excluded(a), Unbounded)).map(move |&b| Friendship::new(a, b))
        })
    }

    /// Users with at least one tag, ascending by ID.
    pub fn tag_entries(&self) -> impl Iterator<Item = (UserId, &TagSet)> + '_ {
        self.tags
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(&id, set)| (id, set))
    }

    // ── Mutations ──────────────────────────────────

    /// Register `id` and (re)set its tags.
    ///
    /// Overwrites the tags of an existing user. Afterwards the user always has
    /// a (possibly empty) friend-set entry. Returns `true` if the user is new.
    pub fn add_user<I, S>(&mut self, id: UserId, tags: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let is_new = self.users.insert(id);
        self.tags.insert(id, tags.into_iter().map(Into::into).collect());
        self.friends.entry(id).or_default();
        debug!(user = id, is_new, "user registered");
        is_new
    }

    /// Insert the undirected edge `a - b`.
    ///
    /// Refused if either endpoint is unregistered or `a == b`. Idempotent:
    /// returns `Ok(false)` when the friendship already existed.
    pub fn add_friendship(&mut self, a: UserId, b: UserId) -> Result<bool, GraphError> {
        self.check_endpoints(a, b)?;
        if a == b {
            return Err(GraphError::SelfFriendship(a));
        }
        Ok(self.link(a, b))
    }

    /// Remove the undirected edge `a - b`.
    ///
    /// Refused if either endpoint is unregistered. Idempotent: returns
    /// `Ok(false)` when there was no such friendship.
    pub fn remove_friendship(&mut self, a: UserId, b: UserId) -> Result<bool, GraphError> {
        self.check_endpoints(a, b)?;
        let removed = self.friends.get_mut(&a).is_some_and(|set| set.remove(&b));
        if let Some(set) = self.friends.get_mut(&b) {
            set.remove(&a);
        }
        if removed {
            debug!(a, b, "friendship removed");
        }
        Ok(removed)
    }

    // ── Loader hooks ───────────────────────────────

    /// Register `id` without touching its tags.
    pub(crate) fn register(&mut self, id: UserId) {
        self.users.insert(id);
        self.friends.entry(id).or_default();
    }

    /// Register both endpoints and link them. Caller guarantees `a != b`.
    pub(crate) fn link(&mut self, a: UserId, b: UserId) -> bool {
        debug_assert_ne!(a, b, "self-loop");
        self.register(a);
        self.register(b);
        let inserted = self.friends.entry(a).or_default().insert(b);
        self.friends.entry(b).or_default().insert(a);
        inserted
    }

    /// Register `id` and add `tags` to whatever it already has.
    pub(crate) fn extend_tags<I>(&mut self, id: UserId, tags: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.register(id);
        self.tags.entry(id).or_default().extend(tags);
    }

    fn check_endpoints(&self, a: UserId, b: UserId) -> Result<(), GraphError> {
        for id in [a, b] {
            if !self.user_exists(id) {
                debug!(user = id, "mutation refused: unknown user");
                return Err(GraphError::UnknownUser(id));
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

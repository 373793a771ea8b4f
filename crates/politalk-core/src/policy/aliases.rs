//! Anonymous name allocation
//!
//! Within a topic, anonymous commenters are numbered in the order of their
//! first comment: the earliest becomes `Anonymous1`, the next new author
//! `Anonymous2`, and so on. Comments are ordered by `(created_at, id)`, so
//! the result does not depend on how the input was sorted. Existing
//! assignments are never changed; new authors continue after the highest
//! ordinal already handed out.

use std::collections::{HashMap, HashSet};

use crate::entities::{AnonymousAlias, Comment};
use crate::value_objects::{AnonymousId, Snowflake};

#[derive(Debug, Clone)]
pub struct AliasAllocator {
    topic_id: Snowflake,
    assigned: HashMap<AnonymousId, i32>,
    last_ordinal: i32,
}

impl AliasAllocator {
    pub fn new(topic_id: Snowflake) -> Self {
        Self {
            topic_id,
            assigned: HashMap::new(),
            last_ordinal: 0,
        }
    }

    /// Start from assignments that were already persisted
    pub fn with_existing(
        topic_id: Snowflake,
        aliases: impl IntoIterator<Item = AnonymousAlias>,
    ) -> Self {
        let mut allocator = Self::new(topic_id);
        for alias in aliases {
            allocator.insert(alias);
        }
        allocator
    }

    /// Record an assignment made elsewhere (e.g. by the alias repository)
    pub fn insert(&mut self, alias: AnonymousAlias) {
        if alias.topic_id != self.topic_id {
            return;
        }
        self.last_ordinal = self.last_ordinal.max(alias.ordinal);
        self.assigned.insert(alias.anonymous_id, alias.ordinal);
    }

    pub fn ordinal(&self, id: &AnonymousId) -> Option<i32> {
        self.assigned.get(id).copied()
    }

    pub fn label(&self, id: &AnonymousId) -> Option<String> {
        self.ordinal(id)
            .map(|ordinal| AnonymousAlias::new(self.topic_id, *id, ordinal).label())
    }

    /// Anonymous authors in `comments` without a label, in first-comment order
    pub fn unassigned_in_order(&self, comments: &[Comment]) -> Vec<AnonymousId> {
        let mut ordered: Vec<&Comment> = comments
            .iter()
            .filter(|c| c.topic_id == self.topic_id)
            .collect();
        ordered.sort_by_key(|c| (c.created_at, c.id));

        let mut seen = HashSet::new();
        ordered
            .into_iter()
            .filter_map(|c| c.author.anonymous_id())
            .filter(|id| !self.assigned.contains_key(id) && seen.insert(*id))
            .collect()
    }

    /// Assign labels to every unlabelled anonymous author in `comments`.
    /// Returns only the new assignments.
    pub fn assign_in_order(&mut self, comments: &[Comment]) -> Vec<AnonymousAlias> {
        self.unassigned_in_order(comments)
            .into_iter()
            .map(|id| {
                self.last_ordinal += 1;
                let alias = AnonymousAlias::new(self.topic_id, id, self.last_ordinal);
                self.assigned.insert(id, alias.ordinal);
                alias
            })
            .collect()
    }

    pub fn into_map(self) -> HashMap<AnonymousId, i32> {
        self.assigned
    }
}

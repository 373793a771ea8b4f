//! Emoji reactions on comments and the score derived from them

use chrono::{DateTime, Utc};

use crate::value_objects::{Identity, Snowflake};

/// The five reaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionKind {
    ThumbsUp,
    ThumbsDown,
    Sad,
    Angry,
    Strong,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 5] = [
        Self::ThumbsUp,
        Self::ThumbsDown,
        Self::Sad,
        Self::Angry,
        Self::Strong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThumbsUp => "thumbs_up",
            Self::ThumbsDown => "thumbs_down",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Strong => "strong",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::ThumbsUp => "👍",
            Self::ThumbsDown => "👎",
            Self::Sad => "😢",
            Self::Angry => "😡",
            Self::Strong => "💪",
        }
    }

    /// Accepts either the name (`thumbs_up`) or the emoji itself
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s || kind.emoji() == s)
    }

    /// Contribution of one reaction to the comment score. Angry carries no weight.
    pub fn weight(&self) -> i64 {
        match self {
            Self::ThumbsUp => 3,
            Self::Strong => 2,
            Self::Sad => 1,
            Self::Angry => 0,
            Self::ThumbsDown => -2,
        }
    }
}

/// Per-kind reaction counts on one comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReactionTally {
    pub thumbs_up: i64,
    pub thumbs_down: i64,
    pub sad: i64,
    pub angry: i64,
    pub strong: i64,
}

impl ReactionTally {
    pub fn count(&self, kind: ReactionKind) -> i64 {
        match kind {
            ReactionKind::ThumbsUp => self.thumbs_up,
            ReactionKind::ThumbsDown => self.thumbs_down,
            ReactionKind::Sad => self.sad,
            ReactionKind::Angry => self.angry,
            ReactionKind::Strong => self.strong,
        }
    }

    fn count_mut(&mut self, kind: ReactionKind) -> &mut i64 {
        match kind {
            ReactionKind::ThumbsUp => &mut self.thumbs_up,
            ReactionKind::ThumbsDown => &mut self.thumbs_down,
            ReactionKind::Sad => &mut self.sad,
            ReactionKind::Angry => &mut self.angry,
            ReactionKind::Strong => &mut self.strong,
        }
    }

    /// `3*thumbs_up + 2*strong + sad - 2*thumbs_down`
    pub fn score(&self) -> i64 {
        ReactionKind::ALL
            .into_iter()
            .map(|kind| kind.weight() * self.count(kind))
            .sum()
    }

    /// Apply a change, never letting a count drop below zero
    pub fn apply(&mut self, change: ReactionChange) {
        match change {
            ReactionChange::Added(kind) => *self.count_mut(kind) += 1,
            ReactionChange::Removed(kind) => {
                let count = self.count_mut(kind);
                *count = (*count - 1).max(0);
            }
            ReactionChange::Switched { from, to } => {
                self.apply(ReactionChange::Removed(from));
                self.apply(ReactionChange::Added(to));
            }
        }
    }
}

/// What reacting with a kind does given the identity's previous reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionChange {
    Added(ReactionKind),
    Removed(ReactionKind),
    Switched { from: ReactionKind, to: ReactionKind },
}

impl ReactionChange {
    /// Same kind toggles off, a different kind switches, none adds
    pub fn resolve(previous: Option<ReactionKind>, requested: ReactionKind) -> Self {
        match previous {
            None => Self::Added(requested),
            Some(prev) if prev == requested => Self::Removed(requested),
            Some(prev) => Self::Switched {
                from: prev,
                to: requested,
            },
        }
    }

    /// The identity's reaction after this change
    pub fn current(&self) -> Option<ReactionKind> {
        match self {
            Self::Added(kind) | Self::Switched { to: kind, .. } => Some(*kind),
            Self::Removed(_) => None,
        }
    }
}

/// An identity's reaction on a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub comment_id: Snowflake,
    pub reactor: Identity,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(comment_id: Snowflake, reactor: Identity, kind: ReactionKind) -> Self {
        Self {
            comment_id,
            reactor,
            kind,
            created_at: Utc::now(),
        }
    }
}

/// Stored result of a reaction request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionOutcome {
    pub change: ReactionChange,
    pub tally: ReactionTally,
}

impl ReactionOutcome {
    #[inline]
    pub fn score(&self) -> i64 {
        self.tally.score()
    }
}

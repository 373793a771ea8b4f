//! Domain events - emitted when community state changes
//!
//! Services publish these on Redis pub/sub so listeners (live vote bars,
//! notification badges, moderation dashboards) can react without polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Identity, Snowflake};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Topic Events
    // =========================================================================
    TopicCreated(TopicCreatedEvent),
    TopicDeleted(TopicDeletedEvent),
    TopicPinned(TopicPinnedEvent),

    // =========================================================================
    // Vote Events
    // =========================================================================
    VoteCast(VoteChangedEvent),
    VoteCancelled(VoteChangedEvent),

    // =========================================================================
    // Comment Events
    // =========================================================================
    CommentCreated(CommentCreatedEvent),
    CommentDeleted(CommentDeletedEvent),
    CommentBlinded(CommentModeratedEvent),
    CommentRestored(CommentModeratedEvent),
    ReactionChanged(ReactionChangedEvent),

    // =========================================================================
    // Notification Events
    // =========================================================================
    NotificationCreated(NotificationCreatedEvent),
}

impl DomainEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TopicCreated(_) => "TOPIC_CREATED",
            Self::TopicDeleted(_) => "TOPIC_DELETED",
            Self::TopicPinned(_) => "TOPIC_PINNED",
            Self::VoteCast(_) => "VOTE_CAST",
            Self::VoteCancelled(_) => "VOTE_CANCELLED",
            Self::CommentCreated(_) => "COMMENT_CREATED",
            Self::CommentDeleted(_) => "COMMENT_DELETED",
            Self::CommentBlinded(_) => "COMMENT_BLINDED",
            Self::CommentRestored(_) => "COMMENT_RESTORED",
            Self::ReactionChanged(_) => "REACTION_CHANGED",
            Self::NotificationCreated(_) => "NOTIFICATION_CREATED",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::TopicCreated(e) => e.timestamp,
            Self::TopicDeleted(e) => e.timestamp,
            Self::TopicPinned(e) => e.timestamp,
            Self::VoteCast(e) | Self::VoteCancelled(e) => e.timestamp,
            Self::CommentCreated(e) => e.timestamp,
            Self::CommentDeleted(e) => e.timestamp,
            Self::CommentBlinded(e) | Self::CommentRestored(e) => e.timestamp,
            Self::ReactionChanged(e) => e.timestamp,
            Self::NotificationCreated(e) => e.timestamp,
        }
    }

    /// Topic the event belongs to
    pub fn topic_id(&self) -> Snowflake {
        match self {
            Self::TopicCreated(e) => e.topic_id,
            Self::TopicDeleted(e) => e.topic_id,
            Self::TopicPinned(e) => e.topic_id,
            Self::VoteCast(e) | Self::VoteCancelled(e) => e.topic_id,
            Self::CommentCreated(e) => e.topic_id,
            Self::CommentDeleted(e) => e.topic_id,
            Self::CommentBlinded(e) | Self::CommentRestored(e) => e.topic_id,
            Self::ReactionChanged(e) => e.topic_id,
            Self::NotificationCreated(e) => e.topic_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicCreatedEvent {
    pub topic_id: Snowflake,
    pub title: String,
    pub category: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDeletedEvent {
    pub topic_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicPinnedEvent {
    pub topic_id: Snowflake,
    pub pinned: bool,
    pub timestamp: DateTime<Utc>,
}

/// Carries the new tally of the option that changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteChangedEvent {
    pub topic_id: Snowflake,
    pub option_index: usize,
    pub vote_count: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreatedEvent {
    pub topic_id: Snowflake,
    pub comment_id: Snowflake,
    pub option_index: usize,
    pub parent_id: Option<Snowflake>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDeletedEvent {
    pub topic_id: Snowflake,
    pub comment_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentModeratedEvent {
    pub topic_id: Snowflake,
    pub comment_id: Snowflake,
    pub report_count: i32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionChangedEvent {
    pub topic_id: Snowflake,
    pub comment_id: Snowflake,
    pub score: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreatedEvent {
    pub notification_id: Snowflake,
    pub receiver_id: Snowflake,
    pub sender: Identity,
    pub topic_id: Snowflake,
    pub kind: String,
    pub timestamp: DateTime<Utc>,
}

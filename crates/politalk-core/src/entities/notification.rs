//! Notification entity - tells a signed-in author about a new comment or reply

use chrono::{DateTime, Utc};

use crate::value_objects::{Identity, Snowflake};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Someone commented on a topic the receiver wrote
    Comment,
    /// Someone replied to the receiver's comment
    Reply,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Reply => "reply",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "comment" => Some(Self::Comment),
            "reply" => Some(Self::Reply),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Snowflake,
    pub receiver_id: Snowflake,
    pub sender: Identity,
    pub topic_id: Snowflake,
    pub comment_id: Option<Snowflake>,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        id: Snowflake,
        receiver_id: Snowflake,
        sender: Identity,
        topic_id: Snowflake,
        comment_id: Option<Snowflake>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            id,
            receiver_id,
            sender,
            topic_id,
            comment_id,
            kind,
            read: false,
            created_at: Utc::now(),
        }
    }

    /// Notification for a new comment, if it should be sent at all.
    ///
    /// Only signed-in receivers are notified and nobody is notified about
    /// their own writing.
    pub fn for_recipient(
        id: Snowflake,
        receiver: Option<Identity>,
        sender: Identity,
        topic_id: Snowflake,
        comment_id: Snowflake,
        kind: NotificationKind,
    ) -> Option<Self> {
        let receiver = receiver?;
        if receiver == sender {
            return None;
        }
        let receiver_id = receiver.member_id()?;
        Some(Self::new(
            id,
            receiver_id,
            sender,
            topic_id,
            Some(comment_id),
            kind,
        ))
    }
}

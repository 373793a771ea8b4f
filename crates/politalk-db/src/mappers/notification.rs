//! Notification entity <-> model mapper

use chrono::{DateTime, Utc};
use politalk_core::entities::{Notification, NotificationKind};
use politalk_core::error::DomainError;
use politalk_core::value_objects::Snowflake;

use super::{corrupt, identity_from_key};
use crate::models::NotificationModel;

impl TryFrom<NotificationModel> for Notification {
    type Error = DomainError;

    fn try_from(model: NotificationModel) -> Result<Self, Self::Error> {
        let kind = NotificationKind::parse(&model.kind)
            .ok_or_else(|| corrupt("notifications.kind", &model.kind))?;

        Ok(Notification {
            id: Snowflake::new(model.id),
            receiver_id: Snowflake::new(model.receiver_id),
            sender: identity_from_key("notifications.sender_key", &model.sender_key)?,
            topic_id: Snowflake::new(model.topic_id),
            comment_id: model.comment_id.map(Snowflake::new),
            kind,
            read: model.read,
            created_at: model.created_at,
        })
    }
}

/// Convert Notification entity reference to values for database insertion
pub struct NotificationInsert {
    pub id: i64,
    pub receiver_id: i64,
    pub sender_key: String,
    pub topic_id: i64,
    pub comment_id: Option<i64>,
    pub kind: &'static str,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationInsert {
    pub fn new(notification: &Notification) -> Self {
        Self {
            id: notification.id.into_inner(),
            receiver_id: notification.receiver_id.into_inner(),
            sender_key: notification.sender.key(),
            topic_id: notification.topic_id.into_inner(),
            comment_id: notification.comment_id.map(Snowflake::into_inner),
            kind: notification.kind.as_str(),
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}

//! Notification database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for notifications table
#[derive(Debug, Clone, FromRow)]
pub struct NotificationModel {
    pub id: i64,
    pub receiver_id: i64,
    pub sender_key: String,
    pub topic_id: i64,
    pub comment_id: Option<i64>,
    pub kind: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

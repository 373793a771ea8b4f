//! Comment database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for comments table
#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: i64,
    pub topic_id: i64,
    pub option_index: i32,
    pub parent_id: Option<i64>,
    pub author_key: String,
    pub body: String,
    pub image_urls: Vec<String>,
    pub thumbs_up: i64,
    pub thumbs_down: i64,
    pub sad: i64,
    pub angry: i64,
    pub strong: i64,
    pub score: i64,
    pub report_count: i32,
    pub visibility: String,
    pub created_at: DateTime<Utc>,
}

/// Reaction counter columns of a locked comment row
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ReactionCountsModel {
    pub thumbs_up: i64,
    pub thumbs_down: i64,
    pub sad: i64,
    pub angry: i64,
    pub strong: i64,
}

/// Report state of a locked comment row
#[derive(Debug, Clone, FromRow)]
pub struct ReportStateModel {
    pub report_count: i32,
    pub visibility: String,
}

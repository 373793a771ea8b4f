//! Topic database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for topics table
#[derive(Debug, Clone, FromRow)]
pub struct TopicModel {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub category: String,
    pub image_urls: Vec<String>,
    pub thumbnail_url: Option<String>,
    pub pinned: bool,
    pub report_count: i32,
    pub view_count: i64,
    pub author_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Database model for topic_options table
#[derive(Debug, Clone, FromRow)]
pub struct TopicOptionModel {
    pub topic_id: i64,
    pub position: i32,
    pub label: String,
    pub image_url: Option<String>,
    pub vote_count: i64,
}

/// A topic row joined with its comment count
#[derive(Debug, Clone, FromRow)]
pub struct TopicActivityModel {
    #[sqlx(flatten)]
    pub topic: TopicModel,
    pub comment_count: i64,
}

//! Reaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for comment_reactions table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub comment_id: i64,
    pub reactor_key: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

//! Vote database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for votes table
#[derive(Debug, Clone, FromRow)]
pub struct VoteModel {
    pub topic_id: i64,
    pub voter_key: String,
    pub option_index: i32,
    pub voted_at: DateTime<Utc>,
}

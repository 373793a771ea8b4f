//! Anonymous alias database model

use sqlx::FromRow;

/// Database model for anonymous_aliases table
#[derive(Debug, Clone, FromRow)]
pub struct AnonymousAliasModel {
    pub topic_id: i64,
    pub anonymous_id: String,
    pub ordinal: i32,
}

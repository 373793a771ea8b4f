//! Anonymous alias - the per-topic display label of an anonymous commenter

use crate::value_objects::{AnonymousId, Snowflake};

/// Prefix of rendered labels: `Anonymous1`, `Anonymous2`, ...
pub const ANONYMOUS_LABEL_PREFIX: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymousAlias {
    pub topic_id: Snowflake,
    pub anonymous_id: AnonymousId,
    /// 1-based, unique within the topic
    pub ordinal: i32,
}

impl AnonymousAlias {
    pub fn new(topic_id: Snowflake, anonymous_id: AnonymousId, ordinal: i32) -> Self {
        Self {
            topic_id,
            anonymous_id,
            ordinal,
        }
    }

    pub fn label(&self) -> String {
        format!("{ANONYMOUS_LABEL_PREFIX}{}", self.ordinal)
    }
}

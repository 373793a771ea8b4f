//! Vote record - the single active choice an identity holds on a topic

use chrono::{DateTime, Utc};

use crate::value_objects::{Identity, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub topic_id: Snowflake,
    pub voter: Identity,
    pub option_index: usize,
    pub voted_at: DateTime<Utc>,
}

impl VoteRecord {
    pub fn new(topic_id: Snowflake, voter: Identity, option_index: usize) -> Self {
        Self {
            topic_id,
            voter,
            option_index,
            voted_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_for(&self, option_index: usize) -> bool {
        self.option_index == option_index
    }
}

/// Result of a successful cancellation: which option lost a vote and its new tally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteCancellation {
    pub option_index: usize,
    pub vote_count: i64,
}

//! Vote record <-> model mapper

use politalk_core::entities::VoteRecord;
use politalk_core::error::DomainError;
use politalk_core::value_objects::Snowflake;

use super::{identity_from_key, option_index};
use crate::models::VoteModel;

impl TryFrom<VoteModel> for VoteRecord {
    type Error = DomainError;

    fn try_from(model: VoteModel) -> Result<Self, Self::Error> {
        Ok(VoteRecord {
            topic_id: Snowflake::new(model.topic_id),
            voter: identity_from_key("votes.voter_key", &model.voter_key)?,
            option_index: option_index("votes.option_index", model.option_index)?,
            voted_at: model.voted_at,
        })
    }
}

//! Reaction entity <-> model mapper

use politalk_core::entities::{Reaction, ReactionKind};
use politalk_core::error::DomainError;
use politalk_core::value_objects::Snowflake;

use super::{corrupt, identity_from_key};
use crate::models::ReactionModel;

impl TryFrom<ReactionModel> for Reaction {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        let kind = ReactionKind::parse(&model.kind)
            .ok_or_else(|| corrupt("comment_reactions.kind", &model.kind))?;

        Ok(Reaction {
            comment_id: Snowflake::new(model.comment_id),
            reactor: identity_from_key("comment_reactions.reactor_key", &model.reactor_key)?,
            kind,
            created_at: model.created_at,
        })
    }
}

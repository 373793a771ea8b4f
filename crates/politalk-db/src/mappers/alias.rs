//! Anonymous alias <-> model mapper

use politalk_core::entities::AnonymousAlias;
use politalk_core::error::DomainError;
use politalk_core::value_objects::{AnonymousId, Snowflake};

use super::corrupt;
use crate::models::AnonymousAliasModel;

impl TryFrom<AnonymousAliasModel> for AnonymousAlias {
    type Error = DomainError;

    fn try_from(model: AnonymousAliasModel) -> Result<Self, Self::Error> {
        let anonymous_id = AnonymousId::parse(&model.anonymous_id)
            .map_err(|_| corrupt("anonymous_aliases.anonymous_id", &model.anonymous_id))?;

        Ok(AnonymousAlias::new(
            Snowflake::new(model.topic_id),
            anonymous_id,
            model.ordinal,
        ))
    }
}

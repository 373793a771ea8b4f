//! Comment entity <-> model mapper

use politalk_core::entities::{Comment, ReactionTally, Visibility};
use politalk_core::error::DomainError;
use politalk_core::value_objects::Snowflake;

use super::{corrupt, identity_from_key, option_index, option_position};
use crate::models::{CommentModel, ReactionCountsModel};

impl TryFrom<CommentModel> for Comment {
    type Error = DomainError;

    fn try_from(model: CommentModel) -> Result<Self, Self::Error> {
        let visibility = Visibility::parse(&model.visibility)
            .ok_or_else(|| corrupt("comments.visibility", &model.visibility))?;

        Ok(Comment {
            id: Snowflake::new(model.id),
            topic_id: Snowflake::new(model.topic_id),
            option_index: option_index("comments.option_index", model.option_index)?,
            parent_id: model.parent_id.map(Snowflake::new),
            author: identity_from_key("comments.author_key", &model.author_key)?,
            body: model.body,
            image_urls: model.image_urls,
            reactions: ReactionTally {
                thumbs_up: model.thumbs_up,
                thumbs_down: model.thumbs_down,
                sad: model.sad,
                angry: model.angry,
                strong: model.strong,
            },
            report_count: model.report_count,
            visibility,
            created_at: model.created_at,
        })
    }
}

impl From<ReactionCountsModel> for ReactionTally {
    fn from(model: ReactionCountsModel) -> Self {
        ReactionTally {
            thumbs_up: model.thumbs_up,
            thumbs_down: model.thumbs_down,
            sad: model.sad,
            angry: model.angry,
            strong: model.strong,
        }
    }
}

/// Convert Comment entity reference to values for database insertion
pub struct CommentInsert<'a> {
    pub id: i64,
    pub topic_id: i64,
    pub option_index: i32,
    pub parent_id: Option<i64>,
    pub author_key: String,
    pub body: &'a str,
    pub image_urls: &'a [String],
}

impl<'a> CommentInsert<'a> {
    pub fn new(comment: &'a Comment) -> Self {
        Self {
            id: comment.id.into_inner(),
            topic_id: comment.topic_id.into_inner(),
            option_index: option_position(comment.option_index),
            parent_id: comment.parent_id.map(Snowflake::into_inner),
            author_key: comment.author.key(),
            body: &comment.body,
            image_urls: &comment.image_urls,
        }
    }
}

//! Reaction service
//!
//! One emoji reaction per identity and comment. Reacting with the current
//! kind removes it, another kind replaces it.

use chrono::Utc;
use politalk_core::entities::ReactionKind;
use politalk_core::events::ReactionChangedEvent;
use politalk_core::policy::gate;
use politalk_core::{DomainEvent, Identity, Snowflake};
use tracing::{info, instrument};

use crate::dto::{ReactRequest, ReactionResponse};

use super::comment::CommentService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::topic::TopicService;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add, switch, or remove the caller's reaction on a comment.
    ///
    /// Only the topic author and voters of the comment's option may react.
    #[instrument(skip(self, request), fields(reactor = %reactor, reaction = %request.reaction))]
    pub async fn react(
        &self,
        comment_id: Snowflake,
        reactor: &Identity,
        request: ReactRequest,
    ) -> ServiceResult<ReactionResponse> {
        let kind = ReactionKind::parse(&request.reaction).ok_or_else(|| {
            ServiceError::validation(format!("Unknown reaction: {}", request.reaction))
        })?;

        let comment = CommentService::new(self.ctx)
            .require_comment(comment_id)
            .await?;
        let topic = TopicService::new(self.ctx)
            .require_topic(comment.topic_id)
            .await?;

        let vote = self.ctx.vote_repo().find(topic.id, reactor).await?;
        gate::ensure_can_react(reactor, &topic, vote.as_ref(), comment.option_index)?;

        let outcome = self
            .ctx
            .reaction_repo()
            .react(comment.id, reactor, kind)
            .await?;
        let score = outcome.score();

        info!(comment_id = %comment.id, change = ?outcome.change, score, "Reaction changed");

        self.ctx
            .publish(DomainEvent::ReactionChanged(ReactionChangedEvent {
                topic_id: topic.id,
                comment_id: comment.id,
                score,
                timestamp: Utc::now(),
            }))
            .await;

        Ok(ReactionResponse {
            comment_id: comment.id.to_string(),
            reaction: outcome.change.current().map(|k| k.as_str().to_string()),
            reactions: outcome.tally.into(),
            score,
        })
    }
}
